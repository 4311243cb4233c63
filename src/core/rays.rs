//! Ray table for sliding pieces.
//!
//! `ray(sq, dir)` holds every square from `sq` (exclusive) to the board edge
//! in direction `dir`. Built once from edge masks and shared by every search.

use std::sync::OnceLock;

use super::bitboard::Bitboard;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
    NorthEast = 4,
    NorthWest = 5,
    SouthEast = 6,
    SouthWest = 7,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Square index step and the edge a ray stops at.
    const fn step_and_edge(self) -> (i8, Bitboard) {
        match self {
            Direction::North => (8, Bitboard::RANK_8),
            Direction::South => (-8, Bitboard::RANK_1),
            Direction::East => (1, Bitboard::FILE_H),
            Direction::West => (-1, Bitboard::FILE_A),
            Direction::NorthEast => (9, Bitboard(Bitboard::FILE_H.0 | Bitboard::RANK_8.0)),
            Direction::NorthWest => (7, Bitboard(Bitboard::FILE_A.0 | Bitboard::RANK_8.0)),
            Direction::SouthEast => (-7, Bitboard(Bitboard::FILE_H.0 | Bitboard::RANK_1.0)),
            Direction::SouthWest => (-9, Bitboard(Bitboard::FILE_A.0 | Bitboard::RANK_1.0)),
        }
    }

    /// Rays heading towards higher square indices find their nearest blocker with `lsb`.
    #[inline]
    pub const fn is_increasing(self) -> bool {
        self.step_and_edge().0 > 0
    }
}

pub struct RayTable {
    rays: [[Bitboard; 8]; 64],
}

impl RayTable {
    pub fn get() -> &'static RayTable {
        static TABLE: OnceLock<RayTable> = OnceLock::new();
        TABLE.get_or_init(RayTable::build)
    }

    fn build() -> Self {
        let mut rays = [[Bitboard::EMPTY; 8]; 64];
        for sq in 0..64u8 {
            for dir in Direction::ALL {
                let (step, edge) = dir.step_and_edge();
                let mut ray = Bitboard::EMPTY;
                let mut cur = sq as i8;
                while !edge.contains(cur as u8) {
                    cur += step;
                    ray.set(cur as u8);
                }
                rays[sq as usize][dir as usize] = ray;
            }
        }
        RayTable { rays }
    }

    #[inline]
    pub fn ray(&self, sq: u8, dir: Direction) -> Bitboard {
        self.rays[sq as usize][dir as usize]
    }

    /// Ray cut after the first occupied square, which stays in the set.
    #[inline]
    pub fn slide(&self, sq: u8, dir: Direction, occupied: Bitboard) -> Bitboard {
        let ray = self.ray(sq, dir);
        let blockers = ray & occupied;
        if blockers.is_empty() {
            return ray;
        }
        let nearest = if dir.is_increasing() {
            blockers.lsb()
        } else {
            blockers.msb()
        };
        ray & !self.ray(nearest, dir)
    }

    pub fn slide_all(&self, sq: u8, dirs: &[Direction], occupied: Bitboard) -> Bitboard {
        dirs.iter()
            .fold(Bitboard::EMPTY, |acc, &dir| acc | self.slide(sq, dir, occupied))
    }
}
