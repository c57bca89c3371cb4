use crate::chess::Board;
use crate::chess::Move;
use crate::game::TimeControl;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Default window for the placeholder engine's simulated thinking, in ms
pub const DEFAULT_THINK_TIME_MS: (u64, u64) = (500, 1500);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Move calculation aborted")]
    Aborted,

    #[error("Engine did not answer within {0} ms")]
    Timeout(u64),

    #[error("Engine proposed an illegal move: {0}")]
    IllegalReply(String),

    #[error("Engine error: {0}")]
    Internal(String),
}

/// Everything an engine needs to choose a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRequest {
    pub fen: String,
    /// SAN moves played since the start position
    pub history: Vec<String>,
    pub target_elo: Option<u32>,
    pub time_budget_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineReply {
    pub mv: Move,
    pub thinking_time_ms: Option<u64>,
    /// Centipawns from the engine's point of view
    pub evaluation_cp: Option<i32>,
    pub principal_variation: Vec<String>,
}

impl EngineReply {
    pub fn new(mv: Move) -> Self {
        Self {
            mv,
            thinking_time_ms: None,
            evaluation_cp: None,
            principal_variation: Vec::new(),
        }
    }
}

/// Sent to the engine whenever a game starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameOptions {
    pub human_white: bool,
    pub human_black: bool,
    pub start_fen: Option<String>,
    pub time_control: Option<TimeControl>,
    pub target_elo: Option<u32>,
}

/// A move-producing backend.
///
/// `abort` must make an in-flight `get_best_move` resolve with
/// [`EngineError::Aborted`] (or return early) rather than hang.
#[async_trait]
pub trait EngineApi: Send + Sync {
    async fn get_best_move(&self, request: EngineRequest) -> Result<EngineReply, EngineError>;

    async fn new_game(&self, options: NewGameOptions) -> Result<(), EngineError>;

    async fn abort(&self);
}

/// Placeholder engine that plays a uniformly random legal move after a
/// short simulated think.
#[derive(Debug)]
pub struct RandomEngine {
    aborted: AtomicBool,
    min_think_ms: u64,
    max_think_ms: u64,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self::with_think_time(DEFAULT_THINK_TIME_MS.0, DEFAULT_THINK_TIME_MS.1)
    }

    pub fn with_think_time(min_ms: u64, max_ms: u64) -> Self {
        Self {
            aborted: AtomicBool::new(false),
            min_think_ms: min_ms.min(max_ms),
            max_think_ms: min_ms.max(max_ms),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngineApi for RandomEngine {
    async fn get_best_move(&self, request: EngineRequest) -> Result<EngineReply, EngineError> {
        self.aborted.store(false, Ordering::SeqCst);

        let think_ms = rand::thread_rng().gen_range(self.min_think_ms..=self.max_think_ms);
        tokio::time::sleep(Duration::from_millis(think_ms)).await;

        if self.aborted.load(Ordering::SeqCst) {
            return Err(EngineError::Aborted);
        }

        let board =
            Board::from_fen(&request.fen).map_err(|e| EngineError::Internal(e.to_string()))?;

        let (mv, evaluation_cp) = {
            let mut rng = rand::thread_rng();
            let moves = board.legal_moves();
            let mv = *moves.choose(&mut rng).ok_or(EngineError::NoLegalMoves)?;
            (mv, rng.gen_range(-100..100))
        };

        let principal_variation = board
            .apply(&mv)
            .map(|(_, record)| vec![record.san])
            .unwrap_or_default();

        debug!(
            "RandomEngine picked {} after {} ms (history length {})",
            mv,
            think_ms,
            request.history.len()
        );

        Ok(EngineReply {
            mv,
            thinking_time_ms: Some(think_ms),
            evaluation_cp: Some(evaluation_cp),
            principal_variation,
        })
    }

    async fn new_game(&self, options: NewGameOptions) -> Result<(), EngineError> {
        self.aborted.store(false, Ordering::SeqCst);
        info!(
            "RandomEngine: new game (white human: {}, black human: {}, elo: {:?})",
            options.human_white, options.human_black, options.target_elo
        );
        Ok(())
    }

    async fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        info!("RandomEngine: move calculation aborted");
    }
}
