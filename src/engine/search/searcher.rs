//! Searcher: session state, limits and the iterative deepening driver.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::core::board::{Board, Color};
use crate::core::moves::Move;
use crate::core::zobrist::ZobristKeys;
use crate::engine::movegen::MoveGen;
use crate::engine::tt::TranspositionTable;

use super::ordering::{Frame, Heuristics};
use super::pv::format_score;
use super::types::{
    DRAW_PENALTY, INFINITY, IterationReport, MAX_DEPTH, MAX_PLY, SearchConfig, SearchLimits,
    SearchOutcome, SearchStats, is_mate_score,
};

/// One search session. Owns the board being searched together with every
/// table the search mutates, so independent sessions never share state.
pub struct Searcher {
    pub(super) board: Board,
    pub(super) keys: ZobristKeys,
    pub(super) tt: TranspositionTable,
    pub(super) config: SearchConfig,
    pub(super) frames: Vec<Frame>,
    pub(super) heuristics: Heuristics,
    pub(super) stats: SearchStats,
    pub(super) stop: Arc<AtomicBool>,
    pub(super) aborted: bool,
    pub(super) start_time: Instant,
    pub(super) time_limit: Option<Duration>,
    pub(super) node_limit: Option<u64>,
    pub(super) total_nodes: u64,
    pub(super) root_side: Color,
    pub(super) iteration_depth: i32,
}

impl Searcher {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self::with_keys(config, ZobristKeys::new())
    }

    /// Session with caller-supplied zobrist keys, e.g. [`ZobristKeys::seeded`].
    pub fn with_keys(config: SearchConfig, keys: ZobristKeys) -> Self {
        Searcher {
            board: Board::startpos(),
            keys,
            tt: TranspositionTable::new(config.hash_entries),
            frames: (0..MAX_PLY).map(|_| Frame::new()).collect(),
            heuristics: Heuristics::new(),
            stats: SearchStats::default(),
            stop: Arc::new(AtomicBool::new(false)),
            aborted: false,
            start_time: Instant::now(),
            time_limit: None,
            node_limit: None,
            total_nodes: 0,
            root_side: Color::White,
            iteration_depth: 0,
            config,
        }
    }

    /// Shared flag; storing `true` makes the running search return early.
    /// A flag raised before `search` is called stops that search at once.
    /// `search` lowers it again before returning.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn keys(&self) -> &ZobristKeys {
        &self.keys
    }

    /// Forget the table and ordering memory from earlier searches.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.heuristics.clear();
    }

    /// Score for a dead draw, from the side to move's point of view.
    pub(super) fn draw_score(&self) -> i32 {
        if self.board.side_to_move() == self.root_side {
            -DRAW_PENALTY
        } else {
            DRAW_PENALTY
        }
    }

    /// Polls the stop flag and the node/time budgets.
    pub(super) fn should_stop(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(limit) = self.node_limit {
            if self.total_nodes + self.stats.total_nodes() >= limit {
                return true;
            }
        }
        if let Some(limit) = self.time_limit {
            if self.start_time.elapsed() >= limit {
                return true;
            }
        }
        false
    }

    /// Counts a node and, every 1024 nodes, checks whether to abort.
    #[inline]
    pub(super) fn tick(&mut self) {
        if (self.stats.total_nodes() & 1023) == 0 && self.should_stop() {
            self.aborted = true;
        }
    }

    /// Search `board` within `limits` and return the chosen move with its
    /// per-iteration reports. The caller's board is left untouched.
    pub fn search(&mut self, board: &Board, limits: SearchLimits) -> SearchOutcome {
        self.board = board.clone();
        self.root_side = board.side_to_move();
        self.aborted = false;
        self.start_time = Instant::now();
        self.time_limit = limits.movetime.map(Duration::from_millis);
        self.node_limit = limits.nodes;
        self.total_nodes = 0;

        let status = MoveGen::status(board);
        let legal = MoveGen::legal_moves(board);
        let max_depth = limits.depth.unwrap_or(self.config.max_depth).clamp(1, MAX_DEPTH);

        let mut best_move: Option<Move> = None;
        let mut best_score = 0;
        let mut completed = 0;
        let mut iterations = Vec::new();

        if legal.is_empty() {
            info!(?status, "no legal moves at the root");
            self.stop.store(false, Ordering::Relaxed);
            return SearchOutcome {
                best_move: None,
                score: 0,
                depth: 0,
                status,
                iterations,
            };
        }

        for depth in 1..=max_depth {
            if self.should_stop() {
                break;
            }
            self.iteration_depth = depth;
            self.stats = SearchStats::default();
            let started = Instant::now();

            let score = self.negamax(depth, -INFINITY, INFINITY, 0);
            self.total_nodes += self.stats.total_nodes();
            if self.aborted {
                debug!(depth, "iteration interrupted, keeping depth {}", completed);
                break;
            }

            let mv = self.heuristics.layer_best[0];
            if !legal.contains(mv) {
                warn!(depth, %mv, "iteration produced no usable root move");
                break;
            }

            let pv = self.get_pv_from_tt(depth as usize);
            self.heuristics.set_pv(&pv);
            let report = IterationReport {
                depth,
                score,
                best_move: mv,
                pv,
                stats: self.stats.clone(),
                elapsed: started.elapsed(),
            };
            self.report_iteration(&report);
            iterations.push(report);

            best_move = Some(mv);
            best_score = score;
            completed = depth;

            if is_mate_score(score) {
                break;
            }
        }

        if best_move.is_none() {
            warn!("no iteration completed, falling back to the first legal move");
            best_move = legal.get(0);
        }

        if let Some(mv) = best_move {
            info!(
                best_move = %mv,
                score = %format_score(best_score),
                depth = completed,
                nodes = self.total_nodes,
                elapsed_ms = self.start_time.elapsed().as_millis() as u64,
                "search finished"
            );
        }

        self.stop.store(false, Ordering::Relaxed);
        SearchOutcome {
            best_move,
            score: best_score,
            depth: completed,
            status,
            iterations,
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}
