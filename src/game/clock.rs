use crate::chess::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base time plus per-move increment, written `5+3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeControl {
    pub base_minutes: u32,
    pub increment_seconds: u32,
}

impl TimeControl {
    pub fn new(base_minutes: u32, increment_seconds: u32) -> Self {
        Self {
            base_minutes,
            increment_seconds,
        }
    }

    pub fn base_ms(&self) -> u64 {
        u64::from(self.base_minutes) * 60_000
    }

    pub fn increment_ms(&self) -> u64 {
        u64::from(self.increment_seconds) * 1_000
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.base_minutes, self.increment_seconds)
    }
}

impl FromStr for TimeControl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (base, increment) = s.split_once('+').unwrap_or((s, "0"));
        let base_minutes = base
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("'{s}' is not a time control like 5+3"))?;
        let increment_seconds = increment
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("'{s}' is not a time control like 5+3"))?;
        if base_minutes == 0 {
            return Err("Base time must be at least one minute".to_string());
        }
        Ok(Self::new(base_minutes, increment_seconds))
    }
}

/// Remaining time for both sides.
///
/// Values are unsigned and saturate at zero, so a clock can never show
/// negative time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    pub white_ms: u64,
    pub black_ms: u64,
    /// Timestamp of the last tick; `None` until the clock first runs
    pub last_update_ms: Option<u64>,
}

impl Clock {
    pub fn new(time_control: &TimeControl) -> Self {
        Self {
            white_ms: time_control.base_ms(),
            black_ms: time_control.base_ms(),
            last_update_ms: None,
        }
    }

    pub fn remaining(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white_ms,
            Color::Black => self.black_ms,
        }
    }

    fn slot_mut(&mut self, color: Color) -> &mut u64 {
        match color {
            Color::White => &mut self.white_ms,
            Color::Black => &mut self.black_ms,
        }
    }

    /// Charge the time since the previous tick to `to_move`.
    ///
    /// Returns `true` when that side has run out of time.
    pub fn tick(&mut self, to_move: Color, now_ms: u64) -> bool {
        if let Some(last) = self.last_update_ms {
            let elapsed = now_ms.saturating_sub(last);
            let slot = self.slot_mut(to_move);
            *slot = slot.saturating_sub(elapsed);
        }
        self.last_update_ms = Some(now_ms);
        self.is_flagged(to_move)
    }

    pub fn add_increment(&mut self, color: Color, increment_ms: u64) {
        let slot = self.slot_mut(color);
        *slot = slot.saturating_add(increment_ms);
    }

    pub fn is_flagged(&self, color: Color) -> bool {
        self.remaining(color) == 0
    }
}

/// `m:ss`, or `h:mm:ss` past an hour
pub fn format_clock(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
