//! Search: iterative deepening, alpha-beta, quiescence.

mod alphabeta;
mod ordering;
mod pv;
mod searcher;
mod types;

pub use pv::format_score;
pub use searcher::Searcher;
pub use types::{
    DEFAULT_DEPTH, DRAW_PENALTY, INFINITY, IterationReport, MATE_SCORE, SearchConfig,
    SearchLimits, SearchOutcome, SearchStats, is_mate_score,
};
