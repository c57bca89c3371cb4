use crate::adapters::EngineError;
use crate::chess::Square;
use thiserror::Error;

/// Errors a caller of the game core can observe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Illegal move from {origin} to {destination}")]
    IllegalMove { origin: Square, destination: Square },

    #[error("Engine failed to move: {0}")]
    EngineFailure(#[from] EngineError),

    #[error("Invalid starting position: {0}")]
    InvalidFen(String),

    #[error("The game is already over")]
    GameOver,
}
