use crate::adapters::clamp_volume;
use serde::{Deserialize, Serialize};

/// Default engine strength when a game does not ask for one
pub const DEFAULT_TARGET_ELO: u32 = 2600;

/// Presentation and sound preferences that survive across games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub show_coordinates: bool,
    pub sound_enabled: bool,
    /// `0.0..=1.0`
    pub sound_volume: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            show_coordinates: true,
            sound_enabled: true,
            sound_volume: 0.5,
        }
    }
}

/// Partial update for [`GameSettings`]; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub show_coordinates: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub sound_volume: Option<f32>,
}

impl SettingsPatch {
    pub fn touches_sound(&self) -> bool {
        self.sound_enabled.is_some() || self.sound_volume.is_some()
    }
}

impl GameSettings {
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(show) = patch.show_coordinates {
            self.show_coordinates = show;
        }
        if let Some(enabled) = patch.sound_enabled {
            self.sound_enabled = enabled;
        }
        if let Some(volume) = patch.sound_volume {
            self.sound_volume = clamp_volume(volume);
        }
    }
}

/// How a draw offer from the player is answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    #[default]
    AutoAccept,
    Decline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_touches_given_fields() {
        let mut settings = GameSettings::default();
        settings.merge(&SettingsPatch {
            sound_volume: Some(4.0),
            ..SettingsPatch::default()
        });
        assert_eq!(settings.sound_volume, 1.0);
        assert!(settings.sound_enabled);
        assert!(settings.show_coordinates);
    }

    #[test]
    fn test_draw_policy_toml_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            policy: DrawPolicy,
        }
        let text = toml::to_string(&Wrapper {
            policy: DrawPolicy::AutoAccept,
        })
        .unwrap();
        assert_eq!(text.trim(), "policy = \"auto_accept\"");
        let back: Wrapper = toml::from_str("policy = \"decline\"").unwrap();
        assert_eq!(back.policy, DrawPolicy::Decline);
    }
}
