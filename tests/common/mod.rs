//! Test doubles for the adapter traits and helpers shared by the
//! integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use gambit::adapters::{
    EngineApi, EngineError, EngineReply, EngineRequest, FeedbackApi, FeedbackEvent, LearningApi,
    LearningError, NewGameOptions,
};
use gambit::chess::{GameOutcome, Move};
use gambit::game::{GameController, GameEvent, GameSession, Transition};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn mv(uci: &str) -> Move {
    uci.parse().expect("valid coordinate move")
}

/// Engine that answers from a fixed script, optionally after a delay
#[derive(Default)]
pub struct ScriptedEngine {
    replies: Mutex<VecDeque<Result<EngineReply, EngineError>>>,
    pub requests: Mutex<Vec<EngineRequest>>,
    pub new_games: Mutex<Vec<NewGameOptions>>,
    pub aborts: Mutex<u32>,
    delay: Option<Duration>,
}

impl ScriptedEngine {
    pub fn playing(moves: &[&str]) -> Self {
        let replies = moves.iter().map(|m| Ok(EngineReply::new(mv(m)))).collect();
        Self {
            replies: Mutex::new(replies),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn abort_count(&self) -> u32 {
        *self.aborts.lock().unwrap()
    }
}

#[async_trait]
impl EngineApi for ScriptedEngine {
    async fn get_best_move(&self, request: EngineRequest) -> Result<EngineReply, EngineError> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EngineError::Internal("script exhausted".to_string())))
    }

    async fn new_game(&self, options: NewGameOptions) -> Result<(), EngineError> {
        self.new_games.lock().unwrap().push(options);
        Ok(())
    }

    async fn abort(&self) {
        *self.aborts.lock().unwrap() += 1;
    }
}

/// Engine that fails every request
pub struct FailingEngine;

#[async_trait]
impl EngineApi for FailingEngine {
    async fn get_best_move(&self, _request: EngineRequest) -> Result<EngineReply, EngineError> {
        Err(EngineError::Internal("engine offline".to_string()))
    }

    async fn new_game(&self, _options: NewGameOptions) -> Result<(), EngineError> {
        Ok(())
    }

    async fn abort(&self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedGame {
    pub pgn: String,
    pub outcome: GameOutcome,
    pub metadata: Option<Value>,
}

/// Learning sink that remembers everything, or fails when asked to
#[derive(Default)]
pub struct RecordingLearning {
    pub games: Mutex<Vec<RecordedGame>>,
    pub positions: Mutex<Vec<(String, Option<GameOutcome>)>>,
    pub fail: bool,
}

impl RecordingLearning {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn games(&self) -> Vec<RecordedGame> {
        self.games.lock().unwrap().clone()
    }

    pub fn positions(&self) -> Vec<(String, Option<GameOutcome>)> {
        self.positions.lock().unwrap().clone()
    }
}

#[async_trait]
impl LearningApi for RecordingLearning {
    async fn record_game(
        &self,
        pgn: &str,
        outcome: GameOutcome,
        metadata: Option<Value>,
    ) -> Result<(), LearningError> {
        if self.fail {
            return Err(LearningError::Unavailable("backend down".to_string()));
        }
        self.games.lock().unwrap().push(RecordedGame {
            pgn: pgn.to_string(),
            outcome,
            metadata,
        });
        Ok(())
    }

    async fn record_position(
        &self,
        fen: &str,
        outcome: Option<GameOutcome>,
    ) -> Result<(), LearningError> {
        if self.fail {
            return Err(LearningError::Unavailable("backend down".to_string()));
        }
        self.positions
            .lock()
            .unwrap()
            .push((fen.to_string(), outcome));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingFeedback {
    pub events: Mutex<Vec<FeedbackEvent>>,
    pub volume: Mutex<Option<f32>>,
    pub enabled: Mutex<Option<bool>>,
}

impl RecordingFeedback {
    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl FeedbackApi for RecordingFeedback {
    fn play(&self, event: FeedbackEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn set_volume(&self, volume: f32) {
        *self.volume.lock().unwrap() = Some(volume);
    }

    fn set_enabled(&self, enabled: bool) {
        *self.enabled.lock().unwrap() = Some(enabled);
    }
}

pub struct Harness {
    pub controller: GameController,
    pub learning: Arc<RecordingLearning>,
    pub feedback: Arc<RecordingFeedback>,
}

pub fn harness(engine: Arc<dyn EngineApi>) -> Harness {
    harness_with_learning(engine, Arc::new(RecordingLearning::default()))
}

pub fn harness_with_learning(
    engine: Arc<dyn EngineApi>,
    learning: Arc<RecordingLearning>,
) -> Harness {
    let feedback = Arc::new(RecordingFeedback::default());
    let controller = GameController::new(engine, learning.clone(), feedback.clone());
    Harness {
        controller,
        learning,
        feedback,
    }
}

/// Apply `moves` through the reducer, feeding each one as the human's move
/// or as the engine's reply depending on who is on turn
pub fn play_both_sides(mut session: GameSession, moves: &[Move]) -> GameSession {
    for m in moves {
        session = step(session, *m).session;
    }
    session
}

pub fn step(session: GameSession, m: Move) -> Transition {
    match session.pending_request() {
        Some(request) => session.apply(GameEvent::EngineMoveReceived {
            request,
            reply: EngineReply::new(m),
        }),
        None => session.apply(GameEvent::ApplyMove(m)),
    }
}
