pub mod adapters;
pub mod chess;
pub mod cli;
pub mod game;
pub mod storage;

// Re-export key types for easy testing
pub use adapters::{EngineApi, FeedbackApi, LearningApi};
pub use chess::{Board, GameOutcome, Move};
pub use game::{GameController, GameError, GameEvent, GameSession};
pub use storage::Archive;
