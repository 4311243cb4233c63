//! Engine components
//!
//! - Pseudo-legal move generation and game status
//! - Static evaluation
//! - Transposition table
//! - Alpha-beta search

pub mod eval;
pub mod movegen;
pub mod search;
pub mod tt;

pub use eval::{evaluate, evaluate_relative};
pub use movegen::{GameStatus, MoveGen, perft};
pub use search::{SearchConfig, SearchLimits, SearchOutcome, SearchStats, Searcher};
pub use tt::{TTEntry, TTFlag, TranspositionTable};
