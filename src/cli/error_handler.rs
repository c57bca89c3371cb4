use crate::cli::validation::ValidationError;
use crate::game::GameError;
use crate::storage::errors::StorageError;
use std::fmt;

/// Error shown to the player, with a hint on what to do next
#[derive(Debug)]
pub enum CliError {
    Game(GameError),
    Validation(ValidationError),
    Storage(StorageError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Game(e) => write!(f, "{}", format_game_error(e)),
            CliError::Validation(e) => write!(
                f,
                "⚠ {}\n   💡 Suggestion: Type 'help' to see the accepted input.",
                e
            ),
            CliError::Storage(e) => write!(
                f,
                "💾 {}\n   💡 Suggestion: Check file permissions and disk space for the data directory.",
                e
            ),
        }
    }
}

impl std::error::Error for CliError {}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        CliError::Game(error)
    }
}

impl From<ValidationError> for CliError {
    fn from(error: ValidationError) -> Self {
        CliError::Validation(error)
    }
}

impl From<StorageError> for CliError {
    fn from(error: StorageError) -> Self {
        CliError::Storage(error)
    }
}

fn format_game_error(error: &GameError) -> String {
    match error {
        GameError::IllegalMove {
            origin,
            destination,
        } => format!(
            "♟ Illegal move {}{}\n   💡 Suggestion: Select a piece (e.g. '{}') to list where it can go.",
            origin, destination, origin
        ),
        GameError::EngineFailure(e) => format!(
            "🤖 The engine could not move: {}\n   💡 Suggestion: Type 'retry' to ask again, or 'new' to start over.",
            e
        ),
        GameError::InvalidFen(reason) => format!(
            "📋 Invalid starting position: {}\n   💡 Suggestion: Check the FEN string; it needs six space-separated fields.",
            reason
        ),
        GameError::GameOver => {
            "🏁 The game is over\n   💡 Suggestion: Type 'new' to play again or 'pgn' to export it.".to_string()
        }
    }
}

/// Errors the player can recover from by typing something else
pub fn is_recoverable_error(error: &CliError) -> bool {
    !matches!(error, CliError::Storage(_))
}

/// Display an error without exiting
pub fn display_error(error: &CliError) {
    eprintln!("\n{}", error);
}
