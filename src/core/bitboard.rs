//! 64-bit square sets.
//!
//! Bit `n` stands for square `n` with a1 = 0, b1 = 1, ..., h8 = 63. Every
//! piece placement, attack set and ray in the engine is one of these.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    /// No squares.
    pub const EMPTY: Bitboard = Bitboard(0);
    /// Every square.
    pub const ALL: Bitboard = Bitboard(!0u64);

    // File masks
    pub const FILE_A: Bitboard = Bitboard(0x0101010101010101);
    pub const FILE_B: Bitboard = Bitboard(0x0202020202020202);
    pub const FILE_G: Bitboard = Bitboard(0x4040404040404040);
    pub const FILE_H: Bitboard = Bitboard(0x8080808080808080);

    // Rank masks
    pub const RANK_1: Bitboard = Bitboard(0x00000000000000FF);
    pub const RANK_2: Bitboard = Bitboard(0x000000000000FF00);
    pub const RANK_4: Bitboard = Bitboard(0x00000000FF000000);
    pub const RANK_5: Bitboard = Bitboard(0x000000FF00000000);
    pub const RANK_7: Bitboard = Bitboard(0x00FF000000000000);
    pub const RANK_8: Bitboard = Bitboard(0xFF00000000000000);

    /// d4, e4, d5, e5.
    pub const CENTER: Bitboard = Bitboard(0x0000001818000000);
    /// The 4x4 block c3..f6 minus the centre.
    pub const EXTENDED_CENTER: Bitboard = Bitboard(0x00003C3C3C3C0000 & !0x0000001818000000);
    /// Outer ring of the board.
    pub const RIM: Bitboard = Bitboard(
        Self::FILE_A.0 | Self::FILE_H.0 | Self::RANK_1.0 | Self::RANK_8.0,
    );

    /// Wrap a raw mask.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Bitboard(value)
    }

    /// Single-square set for index `sq` (0-63).
    #[inline]
    pub const fn from_square(sq: u8) -> Self {
        Bitboard(1u64 << sq)
    }

    /// True when no square is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when at least one square is set.
    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Population count.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Lowest set square. Meaningless on an empty board.
    #[inline]
    pub const fn lsb(self) -> u8 {
        self.0.trailing_zeros() as u8
    }

    /// Highest set square. Meaningless on an empty board.
    #[inline]
    pub const fn msb(self) -> u8 {
        63 - self.0.leading_zeros() as u8
    }

    /// Remove the lowest set square and return its index.
    #[inline]
    pub fn pop_lsb(&mut self) -> u8 {
        let sq = self.lsb();
        self.0 &= self.0 - 1;
        sq
    }

    /// Whether square `sq` is in the set.
    #[inline]
    pub const fn contains(self, sq: u8) -> bool {
        (self.0 >> sq) & 1 != 0
    }

    /// Add square `sq`.
    #[inline]
    pub fn set(&mut self, sq: u8) {
        self.0 |= 1u64 << sq;
    }

    /// Remove square `sq`.
    #[inline]
    pub fn clear(&mut self, sq: u8) {
        self.0 &= !(1u64 << sq);
    }

    // Shifts drop whatever would wrap around a board edge.

    /// One rank towards rank 8.
    #[inline]
    pub const fn north(self) -> Self {
        Bitboard(self.0 << 8)
    }

    /// One rank towards rank 1.
    #[inline]
    pub const fn south(self) -> Self {
        Bitboard(self.0 >> 8)
    }

    /// One file towards the h-file.
    #[inline]
    pub const fn east(self) -> Self {
        Bitboard((self.0 << 1) & !Self::FILE_A.0)
    }

    /// One file towards the a-file.
    #[inline]
    pub const fn west(self) -> Self {
        Bitboard((self.0 >> 1) & !Self::FILE_H.0)
    }

    /// Diagonal step up and towards the h-file.
    #[inline]
    pub const fn north_east(self) -> Self {
        Bitboard((self.0 << 9) & !Self::FILE_A.0)
    }

    /// Diagonal step up and towards the a-file.
    #[inline]
    pub const fn north_west(self) -> Self {
        Bitboard((self.0 << 7) & !Self::FILE_H.0)
    }

    /// Diagonal step down and towards the h-file.
    #[inline]
    pub const fn south_east(self) -> Self {
        Bitboard((self.0 >> 7) & !Self::FILE_A.0)
    }

    /// Diagonal step down and towards the a-file.
    #[inline]
    pub const fn south_west(self) -> Self {
        Bitboard((self.0 >> 9) & !Self::FILE_H.0)
    }

    /// Mirror ranks (a1 <-> a8).
    #[inline]
    pub const fn flip_vertical(self) -> Self {
        Bitboard(self.0.swap_bytes())
    }

    /// Squares in ascending order.
    pub fn iter(self) -> BitboardIter {
        BitboardIter(self)
    }

    /// Squares in descending order (h8 first).
    pub fn iter_rev(self) -> BitboardRevIter {
        BitboardRevIter(self)
    }
}

pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.pop_lsb())
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

pub struct BitboardRevIter(Bitboard);

impl Iterator for BitboardRevIter {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.0.is_empty() {
            return None;
        }
        let sq = self.0.msb();
        self.0.clear(sq);
        Some(sq)
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for rank in (0..8u8).rev() {
            write!(f, "  {} ", rank + 1)?;
            for file in 0..8u8 {
                let mark = if self.contains(rank * 8 + file) { 'X' } else { '.' };
                write!(f, "{} ", mark)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "    a b c d e f g h")
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lsb_msb() {
        let bb = Bitboard::new(0b1010_0100);
        assert_eq!(bb.lsb(), 2);
        assert_eq!(bb.msb(), 7);
    }

    #[test]
    fn test_iter_orders() {
        let bb = Bitboard::new(0b10101);
        assert_eq!(bb.iter().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(bb.iter_rev().collect::<Vec<_>>(), vec![4, 2, 0]);
    }

    #[test]
    fn test_shifts_do_not_wrap() {
        let h1 = Bitboard::from_square(7);
        assert_eq!(h1.east(), Bitboard::EMPTY);
        assert_eq!(h1.north_east(), Bitboard::EMPTY);
        let a8 = Bitboard::from_square(56);
        assert_eq!(a8.north(), Bitboard::EMPTY);
        assert_eq!(a8.west(), Bitboard::EMPTY);
    }

    #[test]
    fn test_center_regions_are_disjoint() {
        assert_eq!(Bitboard::CENTER.count(), 4);
        assert_eq!(Bitboard::EXTENDED_CENTER.count(), 12);
        assert!((Bitboard::CENTER & Bitboard::EXTENDED_CENTER).is_empty());
        assert!((Bitboard::RIM & Bitboard::EXTENDED_CENTER).is_empty());
        assert_eq!(Bitboard::RIM.count(), 28);
    }

    #[test]
    fn test_flip_vertical() {
        assert_eq!(Bitboard::RANK_2.flip_vertical(), Bitboard::RANK_7);
        assert_eq!(Bitboard::from_square(4).flip_vertical(), Bitboard::from_square(60));
    }
}
