//! Engine error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The position string could not be turned into a board.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// A coordinate move that is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
