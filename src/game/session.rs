use super::clock::{Clock, TimeControl};
use super::events::RequestId;
use super::selection::Selection;
use super::settings::{DrawPolicy, GameSettings, DEFAULT_TARGET_ELO};
use crate::adapters::EngineError;
use crate::chess::{Board, Color, GameOutcome, Square};

/// Whether the session is waiting on the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineTurn {
    Idle,
    AwaitingEngine { request: RequestId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub origin: Square,
    pub destination: Square,
}

/// Complete state of one game against the engine.
///
/// A session is a plain value. It changes only through
/// [`GameSession::apply`](GameSession::apply), which consumes it and returns
/// the successor together with the effects to run.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub(crate) live: Board,
    pub(crate) displayed: Board,
    pub(crate) start: Board,
    pub(crate) selection: Selection,
    pub(crate) history: Vec<String>,
    pub(crate) current_move_index: isize,
    pub(crate) last_move: Option<LastMove>,
    pub(crate) player_color: Color,
    pub(crate) engine_turn: EngineTurn,
    pub(crate) game_started: bool,
    pub(crate) game_over: bool,
    pub(crate) game_result: Option<String>,
    pub(crate) outcome: Option<GameOutcome>,
    pub(crate) time_control: Option<TimeControl>,
    pub(crate) clock: Option<Clock>,
    pub(crate) target_elo: u32,
    pub(crate) settings: GameSettings,
    pub(crate) draw_policy: DrawPolicy,
    pub(crate) next_request: u64,
    pub(crate) engine_error: Option<EngineError>,
}

impl GameSession {
    /// A session that has not started, standard position, player is White
    pub fn new() -> Self {
        Self::with_settings(GameSettings::default(), DrawPolicy::default())
    }

    pub fn with_settings(settings: GameSettings, draw_policy: DrawPolicy) -> Self {
        let board = Board::new();
        Self {
            live: board.clone(),
            displayed: board.clone(),
            start: board,
            selection: Selection::default(),
            history: Vec::new(),
            current_move_index: -1,
            last_move: None,
            player_color: Color::White,
            engine_turn: EngineTurn::Idle,
            game_started: false,
            game_over: false,
            game_result: None,
            outcome: None,
            time_control: None,
            clock: None,
            target_elo: DEFAULT_TARGET_ELO,
            settings,
            draw_policy,
            next_request: 0,
            engine_error: None,
        }
    }

    /// Position the game is actually at
    pub fn live_board(&self) -> &Board {
        &self.live
    }

    /// Position being looked at; differs from the live board while
    /// reviewing history
    pub fn displayed_board(&self) -> &Board {
        &self.displayed
    }

    pub fn start_board(&self) -> &Board {
        &self.start
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn current_move_index(&self) -> isize {
        self.current_move_index
    }

    pub fn is_reviewing(&self) -> bool {
        self.current_move_index != self.history.len() as isize - 1
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn player_color(&self) -> Color {
        self.player_color
    }

    pub fn engine_turn(&self) -> EngineTurn {
        self.engine_turn
    }

    pub fn engine_thinking(&self) -> bool {
        matches!(self.engine_turn, EngineTurn::AwaitingEngine { .. })
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        match self.engine_turn {
            EngineTurn::AwaitingEngine { request } => Some(request),
            EngineTurn::Idle => None,
        }
    }

    pub fn game_started(&self) -> bool {
        self.game_started
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn game_result(&self) -> Option<&str> {
        self.game_result.as_deref()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn time_control(&self) -> Option<TimeControl> {
        self.time_control
    }

    pub fn clock(&self) -> Option<&Clock> {
        self.clock.as_ref()
    }

    pub fn target_elo(&self) -> u32 {
        self.target_elo
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn draw_policy(&self) -> DrawPolicy {
        self.draw_policy
    }

    /// Failure from the most recent engine turn, cleared when a new one starts
    pub fn last_engine_error(&self) -> Option<&EngineError> {
        self.engine_error.as_ref()
    }

    /// Side the engine plays
    pub fn engine_color(&self) -> Color {
        self.player_color.other()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
