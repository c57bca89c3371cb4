use super::clock::Clock;
use super::error::GameError;
use super::events::{Effect, GameConfig, GameEvent, RequestId, Transition};
use super::selection::{Selection, SelectionIntent};
use super::session::{EngineTurn, GameSession, LastMove};
use super::settings::{DrawPolicy, SettingsPatch, DEFAULT_TARGET_ELO};
use crate::adapters::{EngineError, EngineReply, EngineRequest, FeedbackEvent, NewGameOptions};
use crate::chess::{color_name, Board, Color, GameOutcome, Move, MoveRecord, Square};
use tracing::{debug, info, warn};

// Share of the remaining clock handed to the engine for one move
const CLOCK_FRACTION_PER_MOVE: u64 = 40;

impl GameSession {
    /// Advance the session by one event.
    ///
    /// This is pure: nothing outside the returned [`Transition`] is touched.
    /// A rejected event leaves every part of the session except the
    /// selection as it was.
    pub fn apply(mut self, event: GameEvent) -> Transition {
        let mut effects = Vec::new();
        let error = match event {
            GameEvent::SelectSquare(square) => self.select_square(square, &mut effects),
            GameEvent::ApplyMove(mv) => self.apply_move(mv, &mut effects),
            GameEvent::NewGame(config) => self.new_game(config, &mut effects),
            GameEvent::Resign => self.resign(&mut effects),
            GameEvent::OfferDraw => self.offer_draw(&mut effects),
            GameEvent::FlipBoard => {
                self.player_color = self.player_color.other();
                self.selection.clear();
                None
            }
            GameEvent::GoToMove(index) => {
                self.navigate(index);
                None
            }
            GameEvent::ResetGame => self.reset_game(&mut effects),
            GameEvent::UpdateSettings(patch) => self.update_settings(patch, &mut effects),
            GameEvent::Tick { now_ms } => self.tick(now_ms, &mut effects),
            GameEvent::EngineMoveReceived { request, reply } => {
                self.engine_move_received(request, reply, &mut effects)
            }
            GameEvent::EngineMoveFailed { request, error } => {
                self.engine_move_failed(request, error)
            }
            GameEvent::RetryEngine => self.retry_engine(&mut effects),
        };

        Transition {
            session: self,
            effects,
            error,
        }
    }

    fn accepts_input(&self) -> bool {
        !self.game_over && !self.engine_thinking()
    }

    fn select_square(&mut self, square: Square, effects: &mut Vec<Effect>) -> Option<GameError> {
        if !self.accepts_input() {
            return None;
        }

        match self.selection.interpret(&self.live, self.player_color, square) {
            SelectionIntent::Select(origin) => {
                self.selection = Selection::pick(origin, &self.live);
                None
            }
            SelectionIntent::Attempt {
                origin,
                destination,
            } => {
                self.selection.clear();
                match Move::simple(origin, destination) {
                    Ok(mv) => self.apply_move(mv, effects),
                    Err(e) => {
                        debug!("Ignoring click {}: {}", destination, e);
                        None
                    }
                }
            }
            SelectionIntent::Deselect => {
                self.selection.clear();
                None
            }
            SelectionIntent::Ignore => None,
        }
    }

    fn apply_move(&mut self, mv: Move, effects: &mut Vec<Effect>) -> Option<GameError> {
        if self.game_over {
            return Some(GameError::GameOver);
        }
        if self.engine_thinking() {
            debug!("Ignoring move {} while the engine is thinking", mv);
            return None;
        }

        self.selection.clear();
        match self.live.apply(&mv) {
            Ok((board, record)) => {
                self.commit_move(board, record, effects);
                self.maybe_start_engine_turn(effects);
                None
            }
            Err(e) => {
                debug!("Rejected move {}: {}", mv, e);
                effects.push(Effect::Feedback(FeedbackEvent::Illegal));
                Some(GameError::IllegalMove {
                    origin: mv.origin,
                    destination: mv.destination,
                })
            }
        }
    }

    /// Make `board` the live position and settle everything that follows
    /// from the move: history, clock, feedback and termination
    fn commit_move(&mut self, board: Board, record: MoveRecord, effects: &mut Vec<Effect>) {
        let mover = self.live.turn();

        let cue = if record.is_checkmate {
            FeedbackEvent::Checkmate
        } else if record.is_check {
            FeedbackEvent::Check
        } else if record.is_capture {
            FeedbackEvent::Capture
        } else {
            FeedbackEvent::Move
        };
        effects.push(Effect::Feedback(cue));

        self.history.push(record.san);
        self.live = board;
        self.displayed = self.live.clone();
        self.current_move_index = self.history.len() as isize - 1;
        self.last_move = Some(LastMove {
            origin: record.mv.origin,
            destination: record.mv.destination,
        });
        self.selection.clear();

        if let (Some(clock), Some(time_control)) = (self.clock.as_mut(), self.time_control) {
            clock.add_increment(mover, time_control.increment_ms());
        }

        if !self.live.is_game_over() {
            effects.push(Effect::RecordPosition {
                fen: self.live.to_fen(),
                outcome: None,
            });
            return;
        }

        let (result, outcome) = if self.live.is_checkmate() {
            (
                format!("{} wins by checkmate", color_name(mover)),
                GameOutcome::winner(mover),
            )
        } else if self.live.is_draw() {
            ("Draw".to_string(), GameOutcome::Draw)
        } else {
            ("Game over".to_string(), GameOutcome::Draw)
        };

        effects.push(Effect::RecordPosition {
            fen: self.live.to_fen(),
            outcome: Some(outcome),
        });
        self.finish(result, outcome, effects);
    }

    fn finish(&mut self, result: String, outcome: GameOutcome, effects: &mut Vec<Effect>) {
        self.cancel_engine_turn(effects);
        self.selection.clear();
        self.game_over = true;
        info!("Game over: {}", result);
        self.game_result = Some(result);
        self.outcome = Some(outcome);

        effects.push(Effect::Feedback(FeedbackEvent::GameEnd));
        effects.push(Effect::RecordGame {
            pgn: self.pgn(),
            outcome,
            metadata: self.game_metadata(),
        });
    }

    fn maybe_start_engine_turn(&mut self, effects: &mut Vec<Effect>) {
        if self.game_over || self.live.turn() == self.player_color {
            return;
        }
        self.start_engine_turn(effects);
    }

    fn start_engine_turn(&mut self, effects: &mut Vec<Effect>) {
        self.next_request += 1;
        let request = RequestId(self.next_request);
        self.engine_turn = EngineTurn::AwaitingEngine { request };
        self.engine_error = None;
        self.selection.clear();

        let engine_color = self.live.turn();
        let time_budget_ms = match (&self.clock, self.time_control) {
            (Some(clock), Some(time_control)) => Some(
                clock.remaining(engine_color) / CLOCK_FRACTION_PER_MOVE
                    + time_control.increment_ms(),
            ),
            _ => None,
        };

        debug!("Requesting engine move {}", request);
        effects.push(Effect::RequestEngineMove {
            request,
            query: EngineRequest {
                fen: self.live.to_fen(),
                history: self.history.clone(),
                target_elo: Some(self.target_elo),
                time_budget_ms,
            },
        });
    }

    /// Drop any outstanding engine request so its answer is discarded
    fn cancel_engine_turn(&mut self, effects: &mut Vec<Effect>) {
        if let EngineTurn::AwaitingEngine { request } = self.engine_turn {
            debug!("Cancelling engine request {}", request);
            self.engine_turn = EngineTurn::Idle;
            effects.push(Effect::AbortEngine);
        }
    }

    fn is_pending(&self, request: RequestId) -> bool {
        self.pending_request() == Some(request)
    }

    fn engine_move_received(
        &mut self,
        request: RequestId,
        reply: EngineReply,
        effects: &mut Vec<Effect>,
    ) -> Option<GameError> {
        if !self.is_pending(request) {
            debug!("Discarding stale engine reply {} ({})", request, reply.mv);
            return None;
        }
        self.engine_turn = EngineTurn::Idle;

        match self.live.apply(&reply.mv) {
            Ok((board, record)) => {
                debug!(
                    "Engine played {} (eval {:?}, {:?} ms)",
                    record.san, reply.evaluation_cp, reply.thinking_time_ms
                );
                self.commit_move(board, record, effects);
                self.maybe_start_engine_turn(effects);
                None
            }
            Err(_) => {
                let error = EngineError::IllegalReply(reply.mv.to_string());
                warn!("{}", error);
                self.engine_error = Some(error.clone());
                Some(GameError::EngineFailure(error))
            }
        }
    }

    fn engine_move_failed(&mut self, request: RequestId, error: EngineError) -> Option<GameError> {
        if !self.is_pending(request) {
            debug!("Discarding stale engine failure {}: {}", request, error);
            return None;
        }
        warn!("Engine failed to move: {}", error);
        self.engine_turn = EngineTurn::Idle;
        self.engine_error = Some(error.clone());
        Some(GameError::EngineFailure(error))
    }

    fn retry_engine(&mut self, effects: &mut Vec<Effect>) -> Option<GameError> {
        if self.game_over {
            return Some(GameError::GameOver);
        }
        if self.engine_thinking() || self.live.turn() == self.player_color {
            debug!("Nothing for the engine to retry");
            return None;
        }
        self.start_engine_turn(effects);
        None
    }

    fn new_game(&mut self, config: GameConfig, effects: &mut Vec<Effect>) -> Option<GameError> {
        let start = match config.start_fen.as_deref() {
            Some(fen) => match Board::from_fen(fen) {
                Ok(board) => board,
                Err(e) => return Some(GameError::InvalidFen(e.to_string())),
            },
            None => Board::new(),
        };

        self.cancel_engine_turn(effects);

        self.live = start.clone();
        self.displayed = start.clone();
        self.start = start;
        self.selection.clear();
        self.history.clear();
        self.current_move_index = -1;
        self.last_move = None;
        self.player_color = config.player_color;
        self.game_started = true;
        self.game_over = false;
        self.game_result = None;
        self.outcome = None;
        self.time_control = config.time_control;
        self.clock = config.time_control.as_ref().map(Clock::new);
        self.target_elo = config.target_elo.unwrap_or(DEFAULT_TARGET_ELO);
        self.engine_error = None;

        info!(
            "New game: player {}, target elo {}",
            color_name(self.player_color),
            self.target_elo
        );
        effects.push(Effect::Feedback(FeedbackEvent::GameStart));
        effects.push(Effect::NotifyNewGame(NewGameOptions {
            human_white: self.player_color == Color::White,
            human_black: self.player_color == Color::Black,
            start_fen: config.start_fen,
            time_control: self.time_control,
            target_elo: Some(self.target_elo),
        }));

        // A custom start may already be finished
        if self.live.is_game_over() {
            let (result, outcome) = if self.live.is_checkmate() {
                let winner = self.live.turn().other();
                (
                    format!("{} wins by checkmate", color_name(winner)),
                    GameOutcome::winner(winner),
                )
            } else {
                ("Draw".to_string(), GameOutcome::Draw)
            };
            self.finish(result, outcome, effects);
            return None;
        }

        self.maybe_start_engine_turn(effects);
        None
    }

    fn resign(&mut self, effects: &mut Vec<Effect>) -> Option<GameError> {
        if self.game_over {
            return None;
        }
        let winner = self.player_color.other();
        self.finish(
            format!("{} wins by resignation", color_name(winner)),
            GameOutcome::winner(winner),
            effects,
        );
        None
    }

    fn offer_draw(&mut self, effects: &mut Vec<Effect>) -> Option<GameError> {
        if self.game_over {
            return None;
        }
        match self.draw_policy {
            DrawPolicy::AutoAccept => {
                self.finish("Draw by agreement".to_string(), GameOutcome::Draw, effects);
            }
            DrawPolicy::Decline => {
                info!("Draw offer declined, play continues");
            }
        }
        None
    }

    fn reset_game(&mut self, effects: &mut Vec<Effect>) -> Option<GameError> {
        self.cancel_engine_turn(effects);

        let board = Board::new();
        self.live = board.clone();
        self.displayed = board.clone();
        self.start = board;
        self.selection.clear();
        self.history.clear();
        self.current_move_index = -1;
        self.last_move = None;
        self.game_started = false;
        self.game_over = false;
        self.game_result = None;
        self.outcome = None;
        self.clock = None;
        self.engine_error = None;
        None
    }

    fn update_settings(
        &mut self,
        patch: SettingsPatch,
        effects: &mut Vec<Effect>,
    ) -> Option<GameError> {
        self.settings.merge(&patch);
        if patch.touches_sound() {
            effects.push(Effect::ConfigureFeedback {
                enabled: self.settings.sound_enabled,
                volume: self.settings.sound_volume,
            });
        }
        None
    }

    fn tick(&mut self, now_ms: u64, effects: &mut Vec<Effect>) -> Option<GameError> {
        if !self.game_started || self.game_over {
            return None;
        }
        let to_move = self.live.turn();
        let flagged = match self.clock.as_mut() {
            Some(clock) => clock.tick(to_move, now_ms),
            None => false,
        };

        if flagged {
            let winner = to_move.other();
            self.finish(
                format!("{} wins on time", color_name(winner)),
                GameOutcome::winner(winner),
                effects,
            );
        }
        None
    }
}
