//! Transposition table
//!
//! One entry per bucket, indexed by `key % len` with a prime length.
//! Stores always overwrite, whatever depth the old entry had.

use crate::core::moves::Move;

/// Default bucket count, prime.
pub const DEFAULT_ENTRIES: usize = 1_048_583;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum TTFlag {
    Exact = 0,
    /// Search failed high; the true score is at least `score`.
    LowerBound = 1,
    /// Search failed low; the true score is at most `score`.
    UpperBound = 2,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TTEntry {
    pub key: u64,
    pub score: i32,
    pub depth: i32,
    pub best_move: Move,
    pub flag: TTFlag,
}

pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
}

impl TranspositionTable {
    /// `len` buckets; zero is bumped to one.
    pub fn new(len: usize) -> Self {
        TranspositionTable {
            entries: vec![None; len.max(1)],
        }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// The bucket's entry if it was stored under exactly `key`.
    pub fn probe(&self, key: u64) -> Option<&TTEntry> {
        self.entries[self.index(key)]
            .as_ref()
            .filter(|entry| entry.key == key)
    }

    /// Write an entry into its bucket, replacing whatever was there.
    pub fn store(&mut self, key: u64, score: i32, depth: i32, best_move: Move, flag: TTFlag) {
        let idx = self.index(key);
        self.entries[idx] = Some(TTEntry {
            key,
            score,
            depth,
            best_move,
            flag,
        });
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no bucket holds an entry.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    /// Occupancy per mille, sampled over the first thousand buckets.
    pub fn hashfull(&self) -> usize {
        let sample = 1000.min(self.entries.len());
        let used = self.entries[..sample].iter().filter(|e| e.is_some()).count();
        used * 1000 / sample
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRIES)
    }
}
