//! Game session state machine and the controller that runs it.

mod clock;
mod controller;
mod error;
mod events;
mod history;
mod reducer;
mod selection;
mod session;
mod settings;

pub use clock::{format_clock, Clock, TimeControl};
pub use controller::GameController;
pub use error::GameError;
pub use events::{Effect, GameConfig, GameEvent, RequestId, Transition};
pub use selection::{Selection, SelectionIntent};
pub use session::{EngineTurn, GameSession, LastMove};
pub use settings::{DrawPolicy, GameSettings, SettingsPatch, DEFAULT_TARGET_ELO};
