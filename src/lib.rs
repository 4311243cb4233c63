pub mod core;
pub mod engine;
pub mod error;

pub use crate::core::{Board, Color, Move, MoveKind};
pub use engine::eval::evaluate;
pub use engine::search::{SearchConfig, SearchLimits, SearchOutcome, Searcher};
pub use error::{EngineError, Result};
