//! Applying and taking back moves.

use super::bitboard::Bitboard;
use super::board::{Board, CastlingRights, Piece, PieceType, Square};
use super::moves::{Move, MoveKind};

/// Everything `undo` needs to restore the board before `mv` was applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Undo {
    pub mv: Move,
    /// `None` for a null move or an empty origin; the move only passed the turn.
    pub moved: Option<Piece>,
    pub captured: Option<(Piece, Square)>,
    pub castling: CastlingRights,
    pub en_passant: [Bitboard; 2],
}

/// Rook origin and destination for a castle made by the king on `king_from`.
fn castle_rook_squares(kind: MoveKind, king_from: Square) -> Option<(Square, Square)> {
    match kind {
        MoveKind::CastleKingside => Some((Square(king_from.0 + 3), Square(king_from.0 + 1))),
        MoveKind::CastleQueenside => Some((Square(king_from.0 - 4), Square(king_from.0 - 1))),
        _ => None,
    }
}

impl Board {
    /// Play `mv` for the side to move. The move is trusted to come from the
    /// generator; king safety is the caller's concern.
    pub fn apply(&mut self, mv: Move) {
        let us = self.side_to_move;
        let (from, to, kind) = (mv.from(), mv.to(), mv.kind());
        let moved = if from == to { None } else { self.piece_at(from) };
        let mut undo = Undo {
            mv,
            moved,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
        };
        self.en_passant = [Bitboard::EMPTY; 2];

        if let Some(piece) = moved {
            let victim_sq = if kind == MoveKind::EnPassant {
                Square::from_file_rank(to.file(), from.rank())
            } else {
                to
            };
            undo.captured = self.remove_piece(victim_sq).map(|victim| (victim, victim_sq));

            self.remove_piece(from);
            let placed = if kind.is_promotion() {
                Piece::new(PieceType::Queen, us)
            } else {
                piece
            };
            self.put_piece(placed, to);

            if let Some((rook_from, rook_to)) = castle_rook_squares(kind, from) {
                if let Some(rook) = self.remove_piece(rook_from) {
                    self.put_piece(rook, rook_to);
                }
            }

            if piece.piece_type == PieceType::Pawn && from.0.abs_diff(to.0) == 16 {
                self.en_passant[us.index()] = Square((from.0 + to.0) / 2).bitboard();
            }

            self.castling.remove(
                CastlingRights::rights_for_square(from) | CastlingRights::rights_for_square(to),
            );
        }

        self.history.push(undo);
        self.side_to_move = us.opposite();
        self.update_aggregates();
    }

    /// Take back the last applied move, returning it. `None` on an empty history.
    pub fn undo(&mut self) -> Option<Move> {
        let undo = self.history.pop()?;
        let mv = undo.mv;
        self.side_to_move = self.side_to_move.opposite();

        if let Some(piece) = undo.moved {
            self.remove_piece(mv.to());
            self.put_piece(piece, mv.from());
            if let Some((rook_from, rook_to)) = castle_rook_squares(mv.kind(), mv.from()) {
                if let Some(rook) = self.remove_piece(rook_to) {
                    self.put_piece(rook, rook_from);
                }
            }
            if let Some((victim, sq)) = undo.captured {
                self.put_piece(victim, sq);
            }
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.update_aggregates();
        Some(mv)
    }

    /// The most recent move, if any.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|u| u.mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::Color;

    fn mv(from: &str, to: &str, kind: MoveKind) -> Move {
        Move::new(
            Square::from_algebraic(from).unwrap(),
            Square::from_algebraic(to).unwrap(),
            kind,
        )
    }

    #[test]
    fn test_double_push_sets_en_passant() {
        let mut board = Board::startpos();
        board.apply(mv("e2", "e4", MoveKind::Quiet));
        assert_eq!(board.en_passant(Color::White), Square::from_algebraic("e3").unwrap().bitboard());
        assert_eq!(board.side_to_move(), Color::Black);
        board.apply(mv("g8", "f6", MoveKind::Quiet));
        assert!(board.en_passant(Color::White).is_empty());
    }

    #[test]
    fn test_castle_moves_rook_and_revokes_rights() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -").unwrap();
        board.apply(mv("e1", "g1", MoveKind::CastleKingside));
        assert_eq!(board.piece_at(Square::F1), Some(Piece::new(PieceType::Rook, Color::White)));
        assert_eq!(board.piece_at(Square::H1), None);
        assert!(!board.castling().kingside(Color::White));
        assert!(!board.castling().queenside(Color::White));
        assert!(board.castling().kingside(Color::Black));
        board.undo();
        assert_eq!(board.piece_at(Square::H1), Some(Piece::new(PieceType::Rook, Color::White)));
        assert_eq!(board.castling(), CastlingRights::ALL);
    }

    #[test]
    fn test_capturing_home_rook_revokes_right() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -").unwrap();
        board.apply(mv("a1", "a8", MoveKind::Capture));
        assert!(!board.castling().queenside(Color::Black));
        assert!(board.castling().kingside(Color::Black));
    }

    #[test]
    fn test_promotion_places_queen_and_undo_restores_pawn() {
        let mut board = Board::from_fen("3r3k/4P3/8/8/8/8/8/K7 w - -").unwrap();
        let before = board.clone();
        board.apply(mv("e7", "d8", MoveKind::PromotionCapture));
        assert_eq!(board.piece_at(Square::D8), Some(Piece::new(PieceType::Queen, Color::White)));
        assert_eq!(board.undo(), Some(mv("e7", "d8", MoveKind::PromotionCapture)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_empty_origin_passes_turn() {
        let mut board = Board::startpos();
        board.apply(Move::NULL);
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.occupied().count(), 32);
        board.undo();
        assert_eq!(board, Board::startpos());
    }

    #[test]
    fn test_undo_on_fresh_board() {
        assert_eq!(Board::startpos().undo(), None);
    }
}
