//! Capability interfaces the game core talks to, and the implementations
//! shipped with the crate.
//!
//! The core only ever holds `Arc<dyn EngineApi>`, `Arc<dyn LearningApi>` and
//! `Arc<dyn FeedbackApi>`; tests substitute their own doubles.

pub mod engine;
pub mod feedback;
pub mod learning;

pub use engine::{
    EngineApi, EngineError, EngineReply, EngineRequest, NewGameOptions, RandomEngine,
    DEFAULT_THINK_TIME_MS,
};
pub use feedback::{clamp_volume, FeedbackApi, FeedbackEvent, SoundManager};
pub use learning::{ArchiveLearning, LearningApi, LearningError, TracingLearning};
