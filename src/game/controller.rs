use super::error::GameError;
use super::events::{Effect, GameConfig, GameEvent, Transition};
use super::session::GameSession;
use super::settings::SettingsPatch;
use crate::adapters::{EngineApi, EngineError, FeedbackApi, LearningApi};
use crate::chess::{Move, Square};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Drives a [`GameSession`] against injected adapters.
///
/// Every public method feeds one event to the reducer and then runs the
/// resulting effects in order. An engine request is awaited in place and its
/// answer is fed back as a follow-up event, so by the time a call returns the
/// engine turn it started has been resolved.
pub struct GameController {
    session: GameSession,
    engine: Arc<dyn EngineApi>,
    learning: Arc<dyn LearningApi>,
    feedback: Arc<dyn FeedbackApi>,
    engine_timeout: Option<Duration>,
    clock_origin: Option<Instant>,
}

impl GameController {
    pub fn new(
        engine: Arc<dyn EngineApi>,
        learning: Arc<dyn LearningApi>,
        feedback: Arc<dyn FeedbackApi>,
    ) -> Self {
        Self {
            session: GameSession::new(),
            engine,
            learning,
            feedback,
            engine_timeout: None,
            clock_origin: None,
        }
    }

    /// Start from an existing session (for example one carrying settings)
    pub fn with_session(mut self, session: GameSession) -> Self {
        self.session = session;
        self
    }

    /// Treat an engine that has not answered within `timeout` as failed
    pub fn with_engine_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.engine_timeout = timeout;
        self
    }

    /// Measure clock time from now; engine thinking is then charged to the
    /// engine before its move is applied
    pub fn with_wall_clock(mut self) -> Self {
        self.clock_origin = Some(Instant::now());
        self
    }

    /// Milliseconds since [`with_wall_clock`](Self::with_wall_clock)
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.clock_origin
            .map(|origin| origin.elapsed().as_millis() as u64)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn into_session(self) -> GameSession {
        self.session
    }

    /// Apply `event` and everything it sets in motion.
    ///
    /// Returns the first error produced along the way.
    pub async fn dispatch(&mut self, event: GameEvent) -> Result<(), GameError> {
        let mut queue = VecDeque::from([event]);
        let mut first_error = None;

        while let Some(event) = queue.pop_front() {
            let Transition {
                session,
                effects,
                error,
            } = std::mem::take(&mut self.session).apply(event);
            self.session = session;

            if let Some(error) = error {
                first_error.get_or_insert(error);
            }

            for effect in effects {
                queue.extend(self.run_effect(effect).await);
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn run_effect(&self, effect: Effect) -> Vec<GameEvent> {
        match effect {
            Effect::Feedback(event) => {
                self.feedback.play(event);
                Vec::new()
            }
            Effect::ConfigureFeedback { enabled, volume } => {
                self.feedback.set_enabled(enabled);
                self.feedback.set_volume(volume);
                Vec::new()
            }
            Effect::NotifyNewGame(options) => {
                if let Err(e) = self.engine.new_game(options).await {
                    warn!("Engine rejected new game notification: {}", e);
                }
                // Start the new game's clock at the moment it began
                self.elapsed_ms()
                    .map(|now_ms| GameEvent::Tick { now_ms })
                    .into_iter()
                    .collect()
            }
            Effect::AbortEngine => {
                self.engine.abort().await;
                Vec::new()
            }
            Effect::RequestEngineMove { request, query } => {
                debug!("Waiting for engine move {}", request);
                let result = match self.engine_timeout {
                    Some(limit) => {
                        match tokio::time::timeout(limit, self.engine.get_best_move(query)).await {
                            Ok(result) => result,
                            Err(_) => {
                                self.engine.abort().await;
                                Err(EngineError::Timeout(limit.as_millis() as u64))
                            }
                        }
                    }
                    None => self.engine.get_best_move(query).await,
                };

                let mut follow_ups = Vec::with_capacity(2);
                if let Some(now_ms) = self.elapsed_ms() {
                    follow_ups.push(GameEvent::Tick { now_ms });
                }
                follow_ups.push(match result {
                    Ok(reply) => GameEvent::EngineMoveReceived { request, reply },
                    Err(error) => GameEvent::EngineMoveFailed { request, error },
                });
                follow_ups
            }
            Effect::RecordPosition { fen, outcome } => {
                if let Err(e) = self.learning.record_position(&fen, outcome).await {
                    warn!("Failed to record position: {}", e);
                }
                Vec::new()
            }
            Effect::RecordGame {
                pgn,
                outcome,
                metadata,
            } => {
                if let Err(e) = self.learning.record_game(&pgn, outcome, Some(metadata)).await {
                    warn!("Failed to record game: {}", e);
                }
                Vec::new()
            }
        }
    }

    pub async fn select_square(&mut self, square: Square) -> Result<(), GameError> {
        self.dispatch(GameEvent::SelectSquare(square)).await
    }

    pub async fn apply_move(&mut self, mv: Move) -> Result<(), GameError> {
        self.dispatch(GameEvent::ApplyMove(mv)).await
    }

    pub async fn new_game(&mut self, config: GameConfig) -> Result<(), GameError> {
        self.dispatch(GameEvent::NewGame(config)).await
    }

    pub async fn resign(&mut self) -> Result<(), GameError> {
        self.dispatch(GameEvent::Resign).await
    }

    pub async fn offer_draw(&mut self) -> Result<(), GameError> {
        self.dispatch(GameEvent::OfferDraw).await
    }

    pub async fn flip_board(&mut self) -> Result<(), GameError> {
        self.dispatch(GameEvent::FlipBoard).await
    }

    pub async fn go_to_move(&mut self, index: isize) -> Result<(), GameError> {
        self.dispatch(GameEvent::GoToMove(index)).await
    }

    pub async fn reset_game(&mut self) -> Result<(), GameError> {
        self.dispatch(GameEvent::ResetGame).await
    }

    pub async fn update_settings(&mut self, patch: SettingsPatch) -> Result<(), GameError> {
        self.dispatch(GameEvent::UpdateSettings(patch)).await
    }

    pub async fn tick(&mut self, now_ms: u64) -> Result<(), GameError> {
        self.dispatch(GameEvent::Tick { now_ms }).await
    }

    /// Tick with the wall clock, if one is attached
    pub async fn tick_now(&mut self) -> Result<(), GameError> {
        match self.elapsed_ms() {
            Some(now_ms) => self.tick(now_ms).await,
            None => Ok(()),
        }
    }

    pub async fn retry_engine(&mut self) -> Result<(), GameError> {
        self.dispatch(GameEvent::RetryEngine).await
    }
}
