//! Static evaluation: material, piece-square tables and mobility.
//!
//! Scores are from White's point of view. The search negates for Black.

use crate::core::board::{Board, Color, Piece, PieceType, Square};
use crate::engine::movegen::MoveGen;

/// Multiplier applied to the raw piece-square entries below.
pub const PST_WEIGHT: i32 = 5;
/// Centipawns per attacked square of difference between the sides.
pub const MOBILITY_WEIGHT: i32 = 5;
/// A king switches to its endgame table once the opponent has at most this
/// many knights, bishops, rooks and queens.
pub const ENDGAME_MINORS_AND_MAJORS: u32 = 4;

#[inline]
pub const fn piece_value(piece_type: PieceType) -> i32 {
    match piece_type {
        PieceType::Pawn => 100,
        PieceType::Knight => 300,
        PieceType::Bishop => 330,
        PieceType::Rook => 490,
        PieceType::Queen => 900,
        PieceType::King => 10_000,
    }
}

// Tables read like a diagram from White's side: first row is rank 8.
#[rustfmt::skip]
const PAWN_TABLE: [i8; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    10, 10, 10, 10, 10, 10, 10, 10,
     2,  2,  4,  6,  6,  4,  2,  2,
     1,  1,  2,  5,  5,  2,  1,  1,
     0,  0,  4,  4,  5,  0,  0,  0,
     1, -1, -2,  0,  0, -2, -1,  1,
     1,  2,  2, -5, -5,  2,  2,  1,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i8; 64] = [
    -10, -8, -6, -6, -6, -6, -8,-10,
     -8, -4,  0,  0,  0,  0, -4, -8,
     -6,  0,  2,  3,  3,  2,  0, -6,
     -6,  1,  3,  4,  4,  3,  1, -6,
     -6,  0,  3,  4,  4,  3,  0, -6,
     -6,  1,  2,  3,  3,  3,  1, -6,
     -8, -4,  0,  1,  1,  0, -4, -8,
    -10, -6, -4, -6, -6, -4, -6,-10,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i8; 64] = [
    -4, -2, -2, -2, -2, -2, -2, -4,
    -2,  0,  0,  0,  0,  0,  0, -2,
    -2,  0,  1,  2,  2,  1,  0, -2,
    -2,  1,  1,  2,  2,  1,  1, -2,
    -2,  0,  2,  2,  2,  2,  0, -2,
    -2,  2,  2,  2,  2,  2,  2, -2,
    -2,  5,  0,  0,  0,  0,  5, -2,
    -4, -2, -8, -2, -2, -8, -2, -4,
];

#[rustfmt::skip]
const ROOK_TABLE: [i8; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     1,  2,  2,  2,  2,  2,  2,  1,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -1,  0,  0,  0,  0,  0,  0, -1,
    -1,  0,  0,  0,  0,  0,  0, -1,
     0,  0,  0,  1,  1,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i8; 64] = [
    -4, -2, -2, -1, -1, -2, -2, -4,
    -2,  0,  0,  0,  0,  0,  0, -2,
    -2,  0,  1,  1,  1,  1,  0, -2,
    -1,  0,  1, -1, -1,  1,  0, -1,
     0,  0,  1,  0,  0,  1,  0, -1,
    -2,  1,  1,  1,  1,  1,  0, -2,
    -2,  0,  1,  0,  0,  0,  0, -2,
    -4, -2, -2,  5, -1, -2, -2, -4,
];

#[rustfmt::skip]
const KING_TABLE: [i8; 64] = [
    -6, -8, -8, -8,-10, -8, -8, -6,
    -6, -8, -8,-10,-10, -8, -8, -6,
    -6, -8, -8,-10,-10, -8, -8, -6,
    -6, -8, -8,-10,-10, -8, -8, -6,
    -4, -6, -6, -8, -8, -6, -6, -4,
    -2, -4, -4, -4, -4, -4, -4, -2,
     4,  4,  0,  0,  0,  0,  4,  4,
     4,  5,  6,  0,  0,  2,  8,  4,
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: [i8; 64] = [
    -10, -8, -6, -4, -4, -6, -8,-10,
     -6, -4, -2,  0,  0, -2, -4, -6,
     -6, -2,  4,  6,  6,  4, -2, -6,
     -6, -2,  6,  8,  8,  6, -2, -6,
     -6, -2,  6,  8,  8,  6, -2, -6,
     -6, -2,  4,  6,  6,  4, -2, -6,
     -6, -6,  0,  0,  0,  0, -6, -6,
    -10, -6, -6, -6, -6, -6, -6,-10,
];

fn table_for(piece_type: PieceType, endgame: bool) -> &'static [i8; 64] {
    match piece_type {
        PieceType::Pawn => &PAWN_TABLE,
        PieceType::Knight => &KNIGHT_TABLE,
        PieceType::Bishop => &BISHOP_TABLE,
        PieceType::Rook => &ROOK_TABLE,
        PieceType::Queen => &QUEEN_TABLE,
        PieceType::King if endgame => &KING_ENDGAME_TABLE,
        PieceType::King => &KING_TABLE,
    }
}

/// Scaled piece-square bonus for `piece` standing on `sq`.
pub fn pst_value(piece: Piece, sq: Square, endgame: bool) -> i32 {
    // rows run rank 8 -> 1 for White; Black reads the same table mirrored
    let row = match piece.color {
        Color::White => 7 - sq.rank(),
        Color::Black => sq.rank(),
    };
    let index = row as usize * 8 + sq.file() as usize;
    PST_WEIGHT * table_for(piece.piece_type, endgame)[index] as i32
}

/// Whether `color`'s king should use the endgame table.
fn king_in_endgame(board: &Board, color: Color) -> bool {
    let them = color.opposite();
    let officers = board.color(them)
        & !(board.pieces_of(PieceType::King, them) | board.pieces_of(PieceType::Pawn, them));
    officers.count() <= ENDGAME_MINORS_AND_MAJORS
}

/// White-centric static score of `board`.
pub fn evaluate(board: &Board) -> i32 {
    let mut score = 0;
    for color in Color::BOTH {
        let sign = if color == Color::White { 1 } else { -1 };
        let endgame = king_in_endgame(board, color);
        for piece_type in PieceType::ALL {
            let piece = Piece::new(piece_type, color);
            for sq in board.pieces_of(piece_type, color).iter() {
                score += sign * (piece_value(piece_type) + pst_value(piece, Square(sq), endgame));
            }
        }
    }

    let white_reach = MoveGen::attacked_squares(board, Color::White).count() as i32;
    let black_reach = MoveGen::attacked_squares(board, Color::Black).count() as i32;
    score + MOBILITY_WEIGHT * (white_reach - black_reach)
}

/// `evaluate` from the side to move's point of view.
#[inline]
pub fn evaluate_relative(board: &Board) -> i32 {
    match board.side_to_move() {
        Color::White => evaluate(board),
        Color::Black => -evaluate(board),
    }
}
