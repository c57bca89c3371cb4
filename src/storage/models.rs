use crate::chess::GameOutcome;
use serde::{Deserialize, Serialize};

/// A finished game as stored in the archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedGame {
    pub id: String,
    pub pgn: String,
    pub outcome: GameOutcome,
    pub move_count: u32,
    pub recorded_at: i64,
    pub metadata: Option<serde_json::Value>,
}

/// Input for [`Archive::record_game`](super::Archive::record_game)
#[derive(Debug, Clone, PartialEq)]
pub struct NewArchivedGame {
    pub pgn: String,
    pub outcome: GameOutcome,
    pub move_count: u32,
    pub metadata: Option<serde_json::Value>,
}

/// A position reported while a game was being played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedPosition {
    pub id: i64,
    pub fen: String,
    pub outcome: Option<GameOutcome>,
    pub recorded_at: i64,
}
