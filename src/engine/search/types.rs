//! Search limits, configuration, statistics and constants.

use std::time::Duration;

use crate::core::moves::Move;
use crate::engine::movegen::GameStatus;
use crate::engine::tt::DEFAULT_ENTRIES;

pub const INFINITY: i32 = 1_000_000;
pub const MATE_SCORE: i32 = 100_000;
/// Score for the side whose king is already gone.
pub const KING_CAPTURE: i32 = MATE_SCORE + 1_000;
/// Dead draws are scored this much against the side the search plays for.
pub const DRAW_PENALTY: i32 = 100;
pub const DEFAULT_DEPTH: i32 = 5;
pub const MAX_DEPTH: i32 = 60;
/// Frames reserved per session; covers quiescence plies on top of `MAX_DEPTH`.
pub const MAX_PLY: usize = 256;

/// Per-search budget. Unset fields are unbounded, except depth which
/// falls back to [`SearchConfig::max_depth`].
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    pub depth: Option<i32>,
    pub nodes: Option<u64>,
    /// Milliseconds.
    pub movetime: Option<u64>,
}

impl SearchLimits {
    pub fn depth(depth: i32) -> Self {
        SearchLimits {
            depth: Some(depth),
            ..Default::default()
        }
    }
}

/// Per-session switches and tuning.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub hash_entries: usize,
    pub max_depth: i32,
    pub transposition_table: bool,
    pub quiescence: bool,
    pub late_move_reductions: bool,
    /// Re-search a reduced move at full depth when it beats alpha.
    pub lmr_research: bool,
    /// Quiescence may run this many times the iteration depth.
    pub q_expansion_factor: i32,
    /// A quiescence result replaces the static score only when it differs by more than this.
    pub stability_window: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            hash_entries: DEFAULT_ENTRIES,
            max_depth: DEFAULT_DEPTH,
            transposition_table: true,
            quiescence: true,
            late_move_reductions: true,
            lmr_research: true,
            q_expansion_factor: 3,
            stability_window: 30,
        }
    }
}

impl SearchConfig {
    /// Plain negamax with alpha-beta: no table, no reductions, no quiescence.
    pub fn plain() -> Self {
        SearchConfig {
            hash_entries: 1,
            transposition_table: false,
            quiescence: false,
            late_move_reductions: false,
            ..Default::default()
        }
    }
}

/// Counters for one iteration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub cutoffs: u64,
    pub reductions: u64,
    pub researches: u64,
    pub tt_hits: u64,
    pub max_qdepth: i32,
}

impl SearchStats {
    pub fn total_nodes(&self) -> u64 {
        self.nodes + self.qnodes
    }
}

#[derive(Clone, Debug)]
pub struct IterationReport {
    pub depth: i32,
    pub score: i32,
    pub best_move: Move,
    pub pv: Vec<Move>,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// `None` only when the root has no legal move.
    pub best_move: Option<Move>,
    /// Side-to-move relative score of the deepest completed iteration.
    pub score: i32,
    /// Depth of the deepest completed iteration, 0 if none completed.
    pub depth: i32,
    pub status: GameStatus,
    pub iterations: Vec<IterationReport>,
}

impl SearchOutcome {
    pub fn is_mate_score(&self) -> bool {
        is_mate_score(self.score)
    }
}

#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_SCORE - MAX_PLY as i32
}
