use super::clock::TimeControl;
use super::error::GameError;
use super::session::GameSession;
use super::settings::SettingsPatch;
use crate::adapters::{EngineError, EngineReply, EngineRequest, FeedbackEvent, NewGameOptions};
use crate::chess::{Color, GameOutcome, Move, Square};
use std::fmt;

/// Identifies one engine request; replies carrying an older id are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub(crate) u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Options for starting a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub player_color: Color,
    pub start_fen: Option<String>,
    pub time_control: Option<TimeControl>,
    pub target_elo: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_color: Color::White,
            start_fen: None,
            time_control: None,
            target_elo: None,
        }
    }
}

/// Input to [`GameSession::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    SelectSquare(Square),
    ApplyMove(Move),
    NewGame(GameConfig),
    Resign,
    OfferDraw,
    FlipBoard,
    /// `-1` is the start position
    GoToMove(isize),
    ResetGame,
    UpdateSettings(SettingsPatch),
    Tick { now_ms: u64 },
    EngineMoveReceived { request: RequestId, reply: EngineReply },
    EngineMoveFailed { request: RequestId, error: EngineError },
    RetryEngine,
}

/// Side effect requested by a transition, executed by the controller in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Feedback(FeedbackEvent),
    ConfigureFeedback {
        enabled: bool,
        volume: f32,
    },
    NotifyNewGame(NewGameOptions),
    RequestEngineMove {
        request: RequestId,
        query: EngineRequest,
    },
    AbortEngine,
    RecordPosition {
        fen: String,
        outcome: Option<GameOutcome>,
    },
    RecordGame {
        pgn: String,
        outcome: GameOutcome,
        metadata: serde_json::Value,
    },
}

/// Result of applying one event
#[derive(Debug, Clone)]
pub struct Transition {
    pub session: GameSession,
    pub effects: Vec<Effect>,
    pub error: Option<GameError>,
}

impl Transition {
    /// The engine request among the effects, if the transition started one
    pub fn engine_request(&self) -> Option<(RequestId, &EngineRequest)> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::RequestEngineMove { request, query } => Some((*request, query)),
            _ => None,
        })
    }

    pub fn feedback(&self) -> Vec<FeedbackEvent> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Feedback(event) => Some(*event),
                _ => None,
            })
            .collect()
    }
}
