//! Move generation
//!
//! Leaper attacks (knight, king, pawn captures) come from tables built once;
//! sliders walk the ray table and stop at the nearest blocker. Generation is
//! pseudo-legal: a move is kept or dropped after it has been applied, by
//! checking that the mover's king is not left attacked.

use std::sync::OnceLock;

use crate::core::bitboard::Bitboard;
use crate::core::board::{Board, Color, Piece, PieceType, Square};
use crate::core::moves::{Move, MoveKind, MoveList};
use crate::core::rays::{Direction, RayTable};
use crate::error::{EngineError, Result};

pub struct MoveGen {
    knight_attacks: [Bitboard; 64],
    king_attacks: [Bitboard; 64],
    pawn_attacks: [[Bitboard; 64]; 2],
}

static MOVEGEN: OnceLock<MoveGen> = OnceLock::new();

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

impl MoveGen {
    pub fn instance() -> &'static MoveGen {
        MOVEGEN.get_or_init(MoveGen::init)
    }

    fn init() -> Self {
        let mut mg = MoveGen {
            knight_attacks: [Bitboard::EMPTY; 64],
            king_attacks: [Bitboard::EMPTY; 64],
            pawn_attacks: [[Bitboard::EMPTY; 64]; 2],
        };

        let not_a = !Bitboard::FILE_A;
        let not_ab = !(Bitboard::FILE_A | Bitboard::FILE_B);
        let not_h = !Bitboard::FILE_H;
        let not_gh = !(Bitboard::FILE_G | Bitboard::FILE_H);

        for sq in 0..64u8 {
            let bb = Bitboard::from_square(sq);
            let b = bb.0;

            mg.knight_attacks[sq as usize] = (Bitboard(b << 17) & not_a)
                | (Bitboard(b << 15) & not_h)
                | (Bitboard(b << 10) & not_ab)
                | (Bitboard(b << 6) & not_gh)
                | (Bitboard(b >> 17) & not_h)
                | (Bitboard(b >> 15) & not_a)
                | (Bitboard(b >> 10) & not_gh)
                | (Bitboard(b >> 6) & not_ab);

            mg.king_attacks[sq as usize] = bb.north()
                | bb.south()
                | bb.east()
                | bb.west()
                | bb.north_east()
                | bb.north_west()
                | bb.south_east()
                | bb.south_west();

            mg.pawn_attacks[Color::White.index()][sq as usize] = bb.north_east() | bb.north_west();
            mg.pawn_attacks[Color::Black.index()][sq as usize] = bb.south_east() | bb.south_west();
        }
        mg
    }

    #[inline]
    pub fn knight_attacks(sq: Square) -> Bitboard {
        Self::instance().knight_attacks[sq.index()]
    }

    #[inline]
    pub fn king_attacks(sq: Square) -> Bitboard {
        Self::instance().king_attacks[sq.index()]
    }

    /// Squares a pawn of `color` on `sq` captures on.
    #[inline]
    pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
        Self::instance().pawn_attacks[color.index()][sq.index()]
    }

    #[inline]
    pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
        RayTable::get().slide_all(sq.0, &Direction::DIAGONAL, occupied)
    }

    #[inline]
    pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
        RayTable::get().slide_all(sq.0, &Direction::ORTHOGONAL, occupied)
    }

    #[inline]
    pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
        RayTable::get().slide_all(sq.0, &Direction::ALL, occupied)
    }

    /// Squares the piece on `sq` attacks: pawns only diagonally, kings
    /// without castling, own pieces included. Empty for an empty square.
    pub fn attacks_from(board: &Board, sq: Square) -> Bitboard {
        let Some(piece) = board.piece_at(sq) else {
            return Bitboard::EMPTY;
        };
        let occupied = board.occupied();
        match piece.piece_type {
            PieceType::Pawn => Self::pawn_attacks(sq, piece.color),
            PieceType::Knight => Self::knight_attacks(sq),
            PieceType::Bishop => Self::bishop_attacks(sq, occupied),
            PieceType::Rook => Self::rook_attacks(sq, occupied),
            PieceType::Queen => Self::queen_attacks(sq, occupied),
            PieceType::King => Self::king_attacks(sq),
        }
    }

    /// Union of every square `color` attacks.
    pub fn attacked_squares(board: &Board, color: Color) -> Bitboard {
        board
            .color(color)
            .iter()
            .fold(Bitboard::EMPTY, |acc, sq| acc | Self::attacks_from(board, Square(sq)))
    }

    pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
        let occupied = board.occupied();
        let diagonal = board.pieces_of(PieceType::Bishop, by) | board.pieces_of(PieceType::Queen, by);
        let straight = board.pieces_of(PieceType::Rook, by) | board.pieces_of(PieceType::Queen, by);

        (Self::pawn_attacks(sq, by.opposite()) & board.pieces_of(PieceType::Pawn, by)).is_not_empty()
            || (Self::knight_attacks(sq) & board.pieces_of(PieceType::Knight, by)).is_not_empty()
            || (Self::king_attacks(sq) & board.pieces_of(PieceType::King, by)).is_not_empty()
            || (Self::bishop_attacks(sq, occupied) & diagonal).is_not_empty()
            || (Self::rook_attacks(sq, occupied) & straight).is_not_empty()
    }

    /// Whether `color`'s king is attacked. A side without a king is never in check.
    pub fn in_check(board: &Board, color: Color) -> bool {
        board
            .king_square(color)
            .is_some_and(|king| Self::is_square_attacked(board, king, color.opposite()))
    }

    /// Pseudo-legal destinations for the piece on `sq`, ignoring own-king safety.
    pub fn destinations(board: &Board, sq: Square) -> Bitboard {
        let Some(piece) = board.piece_at(sq) else {
            return Bitboard::EMPTY;
        };
        let own = board.color(piece.color);
        let enemy = board.color(piece.color.opposite());
        match piece.piece_type {
            PieceType::Pawn => Self::pawn_destinations(board, sq, piece.color),
            PieceType::King => {
                (Self::king_attacks(sq) & !own) | Self::castle_destinations(board, sq, piece.color)
            }
            _ => Self::attacks_from(board, sq) & (enemy | board.empty_squares()),
        }
    }

    fn pawn_destinations(board: &Board, sq: Square, us: Color) -> Bitboard {
        let empty = board.empty_squares();
        let from = sq.bitboard();
        let (single, double) = match us {
            Color::White => {
                let single = from.north() & empty;
                (single, (single & Bitboard::RANK_2.north()).north() & empty)
            }
            Color::Black => {
                let single = from.south() & empty;
                (single, (single & Bitboard::RANK_7.south()).south() & empty)
            }
        };
        let targets = board.color(us.opposite()) | board.en_passant(us.opposite());
        single | double | (Self::pawn_attacks(sq, us) & targets)
    }

    fn castle_destinations(board: &Board, sq: Square, us: Color) -> Bitboard {
        let (home, kingside_path, queenside_path) = match us {
            Color::White => (Square::E1, Bitboard(0x60), Bitboard(0x0E)),
            Color::Black => (Square::E8, Bitboard(0x60 << 56), Bitboard(0x0E << 56)),
        };
        if sq != home {
            return Bitboard::EMPTY;
        }
        let rights = board.castling();
        let rooks = board.pieces_of(PieceType::Rook, us);
        let empty = board.empty_squares();
        let mut dests = Bitboard::EMPTY;
        if rights.kingside(us) && rooks.contains(home.0 + 3) && (kingside_path & !empty).is_empty() {
            dests.set(home.0 + 2);
        }
        if rights.queenside(us) && rooks.contains(home.0 - 4) && (queenside_path & !empty).is_empty() {
            dests.set(home.0 - 2);
        }
        dests
    }

    /// Tag a destination produced by `destinations`.
    fn classify(board: &Board, piece: Piece, from: Square, to: Square) -> MoveKind {
        let capture = board.color(piece.color.opposite()).contains(to.0);
        match piece.piece_type {
            PieceType::Pawn if piece.color.promotion_rank().contains(to.0) => {
                if capture {
                    MoveKind::PromotionCapture
                } else {
                    MoveKind::Promotion
                }
            }
            PieceType::Pawn if !capture && from.file() != to.file() => MoveKind::EnPassant,
            PieceType::King if to.0 == from.0 + 2 => MoveKind::CastleKingside,
            PieceType::King if from.0 >= 2 && to.0 == from.0 - 2 => MoveKind::CastleQueenside,
            _ if capture => MoveKind::Capture,
            _ => MoveKind::Quiet,
        }
    }

    /// Every pseudo-legal move for the side to move, origins scanned h8 to a1.
    pub fn generate_moves(board: &Board) -> MoveList {
        let mut moves = MoveList::new();
        Self::generate_into(board, &mut moves);
        moves
    }

    pub fn generate_into(board: &Board, moves: &mut MoveList) {
        moves.clear();
        let us = board.side_to_move();
        for from in board.color(us).iter_rev() {
            let from = Square(from);
            let Some(piece) = board.piece_at(from) else {
                continue;
            };
            for to in Self::destinations(board, from).iter() {
                let to = Square(to);
                moves.push(Move::new(from, to, Self::classify(board, piece, from, to)));
            }
        }
    }

    /// Captures only (en passant included), for quiescence.
    pub fn generate_captures(board: &Board, moves: &mut MoveList) {
        moves.clear();
        let us = board.side_to_move();
        let targets = board.color(us.opposite()) | board.en_passant(us.opposite());
        for from in board.color(us).iter_rev() {
            let from = Square(from);
            let Some(piece) = board.piece_at(from) else {
                continue;
            };
            let hits = match piece.piece_type {
                PieceType::Pawn => Self::pawn_attacks(from, us) & targets,
                _ => Self::attacks_from(board, from) & board.color(us.opposite()),
            };
            for to in hits.iter() {
                let to = Square(to);
                moves.push(Move::new(from, to, Self::classify(board, piece, from, to)));
            }
        }
    }

    /// Call straight after `board.apply(mv)`: did the move leave the mover safe?
    /// Castling also needs the king's origin and the square it crossed unattacked.
    pub fn was_legal(board: &Board, mv: Move) -> bool {
        let mover = board.side_to_move().opposite();
        let them = board.side_to_move();
        if Self::in_check(board, mover) {
            return false;
        }
        let transit = match mv.kind() {
            MoveKind::CastleKingside => Square(mv.from().0 + 1),
            MoveKind::CastleQueenside => Square(mv.from().0 - 1),
            _ => return true,
        };
        !Self::is_square_attacked(board, mv.from(), them)
            && !Self::is_square_attacked(board, transit, them)
    }

    pub fn legal_moves(board: &Board) -> MoveList {
        let mut scratch = board.clone();
        let mut legal = MoveList::new();
        for &mv in Self::generate_moves(board).iter() {
            scratch.apply(mv);
            if Self::was_legal(&scratch, mv) {
                legal.push(mv);
            }
            scratch.undo();
        }
        legal
    }

    pub fn has_legal_move(board: &mut Board) -> bool {
        let moves = Self::generate_moves(board);
        moves.iter().any(|&mv| {
            board.apply(mv);
            let ok = Self::was_legal(board, mv);
            board.undo();
            ok
        })
    }

    /// Either king is attacked with no escaping move.
    pub fn is_checkmate(board: &Board) -> bool {
        Self::checkmated_side(board).is_some()
    }

    /// The colour whose king is attacked and cannot escape, whoever is to move.
    /// A colour examined out of turn gets no en-passant captures.
    pub fn checkmated_side(board: &Board) -> Option<Color> {
        Color::BOTH.into_iter().find(|&color| {
            if !Self::in_check(board, color) {
                return false;
            }
            let mut defender = board.clone();
            if color != board.side_to_move() {
                defender.side_to_move = color;
                defender.en_passant = [Bitboard::EMPTY; 2];
            }
            !Self::has_legal_move(&mut defender)
        })
    }

    pub fn status(board: &Board) -> GameStatus {
        if board.is_insufficient_material() {
            return GameStatus::InsufficientMaterial;
        }
        if Self::has_legal_move(&mut board.clone()) {
            return GameStatus::Ongoing;
        }
        let us = board.side_to_move();
        if Self::in_check(board, us) {
            GameStatus::Checkmate { winner: us.opposite() }
        } else {
            GameStatus::Stalemate
        }
    }
}

/// Count leaf nodes of the legal move tree.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = MoveGen::generate_moves(board);
    let mut nodes = 0;
    for &mv in moves.iter() {
        board.apply(mv);
        if MoveGen::was_legal(board, mv) {
            nodes += perft(board, depth - 1);
        }
        board.undo();
    }
    nodes
}

impl Board {
    /// Resolve coordinates such as `e2e4` against the legal moves here.
    /// A fifth promotion character is tolerated; promotions are always to a queen.
    pub fn parse_move(&self, coords: &str) -> Result<Move> {
        let illegal = || EngineError::IllegalMove(coords.to_string());
        if !(4..=5).contains(&coords.len()) || !coords.is_ascii() {
            return Err(illegal());
        }
        let from = Square::from_algebraic(&coords[0..2]).ok_or_else(illegal)?;
        let to = Square::from_algebraic(&coords[2..4]).ok_or_else(illegal)?;
        MoveGen::legal_moves(self)
            .iter()
            .copied()
            .find(|mv| mv.from() == from && mv.to() == to)
            .ok_or_else(illegal)
    }
}
