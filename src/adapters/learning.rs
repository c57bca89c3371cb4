use crate::chess::GameOutcome;
use crate::storage::{Archive, NewArchivedGame, StorageError};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LearningError {
    #[error("Learning backend storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Learning backend unavailable: {0}")]
    Unavailable(String),
}

/// Sink for finished games and visited positions.
///
/// Failures are reported but never affect the game in progress.
#[async_trait]
pub trait LearningApi: Send + Sync {
    async fn record_game(
        &self,
        pgn: &str,
        outcome: GameOutcome,
        metadata: Option<Value>,
    ) -> Result<(), LearningError>;

    async fn record_position(
        &self,
        fen: &str,
        outcome: Option<GameOutcome>,
    ) -> Result<(), LearningError>;
}

/// Writes every report to the tracing log and keeps nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLearning;

#[async_trait]
impl LearningApi for TracingLearning {
    async fn record_game(
        &self,
        pgn: &str,
        outcome: GameOutcome,
        metadata: Option<Value>,
    ) -> Result<(), LearningError> {
        info!(%outcome, ?metadata, "Recording game");
        debug!("{}", pgn);
        Ok(())
    }

    async fn record_position(
        &self,
        fen: &str,
        outcome: Option<GameOutcome>,
    ) -> Result<(), LearningError> {
        debug!(fen, ?outcome, "Recording position");
        Ok(())
    }
}

/// Persists reports into the SQLite game archive
#[derive(Clone)]
pub struct ArchiveLearning {
    archive: Archive,
}

impl ArchiveLearning {
    pub fn new(archive: Archive) -> Self {
        Self { archive }
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }
}

#[async_trait]
impl LearningApi for ArchiveLearning {
    async fn record_game(
        &self,
        pgn: &str,
        outcome: GameOutcome,
        metadata: Option<Value>,
    ) -> Result<(), LearningError> {
        let move_count = metadata
            .as_ref()
            .and_then(|m| m.get("move_count"))
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32;
        let game = NewArchivedGame {
            pgn: pgn.to_string(),
            outcome,
            move_count,
            metadata,
        };

        let archive = self.archive.clone();
        let stored = tokio::task::spawn_blocking(move || archive.record_game(game))
            .await
            .map_err(|e| LearningError::Unavailable(e.to_string()))??;

        info!("Archived game {} ({})", stored.id, stored.outcome);
        Ok(())
    }

    async fn record_position(
        &self,
        fen: &str,
        outcome: Option<GameOutcome>,
    ) -> Result<(), LearningError> {
        let archive = self.archive.clone();
        let fen = fen.to_string();
        tokio::task::spawn_blocking(move || archive.record_position(&fen, outcome))
            .await
            .map_err(|e| LearningError::Unavailable(e.to_string()))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::STANDARD_FEN;

    #[tokio::test]
    async fn test_archive_learning_persists_reports() {
        let archive = Archive::open_in_memory().unwrap();
        let learning = ArchiveLearning::new(archive.clone());

        learning
            .record_position(STANDARD_FEN, None)
            .await
            .unwrap();
        learning
            .record_game(
                "1. e4 e5 1/2-1/2",
                GameOutcome::Draw,
                Some(serde_json::json!({ "move_count": 2 })),
            )
            .await
            .unwrap();

        assert_eq!(archive.position_count().unwrap(), 1);
        let games = archive.recent_games(10).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].move_count, 2);
        assert_eq!(games[0].outcome, GameOutcome::Draw);
    }

    #[test]
    fn test_tracing_learning_accepts_everything() {
        let learning = TracingLearning;
        assert!(tokio_test::block_on(learning.record_position("x", None)).is_ok());
        assert!(
            tokio_test::block_on(learning.record_game("*", GameOutcome::White, None)).is_ok()
        );
    }
}
