//! Move encoding.
//!
//! A move packs into 16 bits:
//! - bits 0-5: origin square
//! - bits 6-11: destination square
//! - bits 12-14: [`MoveKind`] tag, fixed when the move is generated

use super::board::Square;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum MoveKind {
    Quiet = 0,
    Capture = 1,
    EnPassant = 2,
    CastleKingside = 3,
    CastleQueenside = 4,
    /// Always to a queen.
    Promotion = 5,
    PromotionCapture = 6,
}

impl MoveKind {
    const ALL: [MoveKind; 7] = [
        MoveKind::Quiet,
        MoveKind::Capture,
        MoveKind::EnPassant,
        MoveKind::CastleKingside,
        MoveKind::CastleQueenside,
        MoveKind::Promotion,
        MoveKind::PromotionCapture,
    ];

    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(self, MoveKind::Capture | MoveKind::EnPassant | MoveKind::PromotionCapture)
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self, MoveKind::Promotion | MoveKind::PromotionCapture)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self, MoveKind::CastleKingside | MoveKind::CastleQueenside)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// a1a1, never produced by the generator.
    pub const NULL: Move = Move(0);

    const SQ_MASK: u16 = 0x3F;
    const TO_SHIFT: u16 = 6;
    const KIND_SHIFT: u16 = 12;

    #[inline]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Move((from.0 as u16) | ((to.0 as u16) << Self::TO_SHIFT) | ((kind as u16) << Self::KIND_SHIFT))
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square((self.0 & Self::SQ_MASK) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square(((self.0 >> Self::TO_SHIFT) & Self::SQ_MASK) as u8)
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        let tag = ((self.0 >> Self::KIND_SHIFT) & 0x7) as usize;
        if tag < MoveKind::ALL.len() {
            MoveKind::ALL[tag]
        } else {
            MoveKind::Quiet
        }
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.kind().is_capture()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.kind().is_promotion()
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.kind().is_castle()
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Same origin and destination, whatever the tag.
    #[inline]
    pub const fn same_squares(self, other: Move) -> bool {
        (self.0 ^ other.0) & 0x0FFF == 0
    }

    /// Four-character coordinates such as `e2e4`. Promotions carry no suffix.
    pub fn to_coords(self) -> String {
        format!("{}{}", self.from(), self.to())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{:?}", self.from(), self.to(), self.kind())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())
    }
}

pub const MAX_MOVES: usize = 256;

/// Fixed-capacity move list living on the stack.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        if self.len < MAX_MOVES {
            self.moves[self.len] = mv;
            self.len += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Move> {
        (index < self.len).then(|| self.moves[index])
    }

    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.moves[..self.len].swap(a, b);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves[..self.len].iter()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;
    fn index(&self, index: usize) -> &Move {
        &self.moves[..self.len][index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves[..self.len].iter()
    }
}
