//! Board representation
//!
//! - Bitboards and the sliding-piece ray table
//! - Board state with apply/undo
//! - Move encoding
//! - Zobrist hashing

pub mod bitboard;
pub mod board;
pub mod makemove;
pub mod moves;
pub mod rays;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use board::{Board, CastlingRights, Color, Piece, PieceType, Square, START_FEN};
pub use makemove::Undo;
pub use moves::{Move, MoveKind, MoveList};
pub use rays::{Direction, RayTable};
pub use zobrist::ZobristKeys;
