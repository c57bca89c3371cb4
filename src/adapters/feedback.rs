use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use tracing::{debug, trace};

/// Audible or visual cue emitted by the game core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackEvent {
    Move,
    Capture,
    Check,
    Checkmate,
    Illegal,
    GameStart,
    GameEnd,
}

impl FeedbackEvent {
    pub fn sound_file(&self) -> &'static str {
        match self {
            FeedbackEvent::Move => "sounds/move.mp3",
            FeedbackEvent::Capture => "sounds/capture.mp3",
            FeedbackEvent::Check => "sounds/check.mp3",
            FeedbackEvent::Checkmate => "sounds/checkmate.mp3",
            FeedbackEvent::Illegal => "sounds/illegal.mp3",
            FeedbackEvent::GameStart => "sounds/game-start.mp3",
            FeedbackEvent::GameEnd => "sounds/game-end.mp3",
        }
    }
}

/// Fire-and-forget feedback sink. Implementations must never block the
/// caller for long and never fail.
pub trait FeedbackApi: Send + Sync {
    fn play(&self, event: FeedbackEvent);

    fn set_volume(&self, volume: f32);

    fn set_enabled(&self, enabled: bool);
}

/// Clamp a volume into `0.0..=1.0`; NaN becomes silence
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Terminal stand-in for an audio backend.
///
/// Every cue is traced with the sound file it maps to. With `bell` set the
/// attention-worthy cues also ring the terminal bell.
#[derive(Debug)]
pub struct SoundManager {
    enabled: AtomicBool,
    volume_bits: AtomicU32,
    bell: bool,
    played: AtomicU64,
}

impl SoundManager {
    pub fn new(enabled: bool, volume: f32) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            volume_bits: AtomicU32::new(clamp_volume(volume).to_bits()),
            bell: false,
            played: AtomicU64::new(0),
        }
    }

    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }

    /// Number of cues actually played (not suppressed)
    pub fn played_count(&self) -> u64 {
        self.played.load(Ordering::Relaxed)
    }
}

impl Default for SoundManager {
    fn default() -> Self {
        Self::new(true, 0.5)
    }
}

impl FeedbackApi for SoundManager {
    fn play(&self, event: FeedbackEvent) {
        if !self.is_enabled() {
            trace!("Sound disabled, skipping {:?}", event);
            return;
        }

        self.played.fetch_add(1, Ordering::Relaxed);
        debug!(
            "Playing {} at volume {:.2}",
            event.sound_file(),
            self.volume()
        );

        let attention = matches!(
            event,
            FeedbackEvent::Illegal | FeedbackEvent::Checkmate | FeedbackEvent::GameEnd
        );
        if self.bell && attention && self.volume() > 0.0 {
            let mut stderr = std::io::stderr();
            // A missing terminal is not worth reporting
            let _ = stderr.write_all(b"\x07").and_then(|_| stderr.flush());
        }
    }

    fn set_volume(&self, volume: f32) {
        self.volume_bits
            .store(clamp_volume(volume).to_bits(), Ordering::Relaxed);
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_is_clamped() {
        let sounds = SoundManager::new(true, 3.0);
        assert_eq!(sounds.volume(), 1.0);

        sounds.set_volume(-0.5);
        assert_eq!(sounds.volume(), 0.0);

        sounds.set_volume(f32::NAN);
        assert_eq!(sounds.volume(), 0.0);

        sounds.set_volume(0.25);
        assert_eq!(sounds.volume(), 0.25);
    }

    #[test]
    fn test_disabled_manager_plays_nothing() {
        let sounds = SoundManager::default();
        sounds.play(FeedbackEvent::Move);
        sounds.set_enabled(false);
        sounds.play(FeedbackEvent::Capture);
        assert_eq!(sounds.played_count(), 1);
        assert!(!sounds.is_enabled());
    }

    #[test]
    fn test_event_serializes_snake_case() {
        let json = serde_json::to_string(&FeedbackEvent::GameStart).unwrap();
        assert_eq!(json, "\"game_start\"");
    }
}
