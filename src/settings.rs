//! Round settings and difficulty presets
//!
//! Loaded from JSON on native, passed in by the host on the web.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    #[default]
    Easy,
    Normal,
    Hard,
}

/// Per-preset balance numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresetParams {
    /// Defender cruising speed before difficulty scaling (px/s)
    pub base_speed: f32,
    /// Defender population cap before difficulty bonus
    pub max_defenders: usize,
    /// Seconds between pickup spawns before difficulty scaling
    pub spawn_every: f32,
    /// Defenders closer than this to the player slow down
    pub slow_radius: f32,
    /// Defender hitbox shrink factor (forgiveness)
    pub hitbox_scale: f32,
    /// Pickup radius inflation for collection
    pub pickup_magnet: f32,
    /// Defender top speed as a multiple of base speed
    pub max_speed_mul: f32,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "med" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    pub fn params(&self) -> PresetParams {
        match self {
            DifficultyPreset::Easy => PresetParams {
                base_speed: 100.0,
                max_defenders: 7,
                spawn_every: 1.8,
                slow_radius: 140.0,
                hitbox_scale: 0.82,
                pickup_magnet: 1.6,
                max_speed_mul: 1.25,
            },
            DifficultyPreset::Normal => PresetParams {
                base_speed: 120.0,
                max_defenders: 10,
                spawn_every: 1.6,
                slow_radius: 110.0,
                hitbox_scale: 0.88,
                pickup_magnet: 1.45,
                max_speed_mul: 1.40,
            },
            DifficultyPreset::Hard => PresetParams {
                base_speed: 140.0,
                max_defenders: 12,
                spawn_every: 1.4,
                slow_radius: 90.0,
                hitbox_scale: 0.95,
                pickup_magnet: 1.30,
                max_speed_mul: 1.55,
            },
        }
    }
}

/// Round configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub preset: DifficultyPreset,

    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Round ===
    /// Timed mode length
    pub round_duration_secs: f32,
    /// Survival mode lives (also the medkit ceiling)
    pub max_lives: u8,
    /// Player speed multiplier
    pub move_speed: f32,
    /// Defenders placed at round start
    pub starting_defenders: usize,

    // === Timers ===
    pub combo_window_secs: f32,
    pub ice_cooldown_min_secs: f32,
    pub ice_cooldown_var_secs: f32,
    pub dynamite_cooldown_min_secs: f32,
    pub dynamite_cooldown_var_secs: f32,
    pub medkit_cooldown_min_secs: f32,
    pub medkit_cooldown_var_secs: f32,
    /// Defender respawn suppression after a dynamite clear
    pub dynamite_respawn_delay_secs: f32,

    /// Fixed RNG seed (host picks one when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: DifficultyPreset::Easy,

            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            round_duration_secs: ROUND_DURATION_SECS,
            max_lives: MAX_LIVES,
            move_speed: 1.0,
            starting_defenders: 6,

            combo_window_secs: 2.4,
            ice_cooldown_min_secs: 8.0,
            ice_cooldown_var_secs: 6.0,
            dynamite_cooldown_min_secs: 10.0,
            dynamite_cooldown_var_secs: 8.0,
            medkit_cooldown_min_secs: 12.0,
            medkit_cooldown_var_secs: 10.0,
            dynamite_respawn_delay_secs: 5.0,

            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        Self {
            preset,
            ..Self::default()
        }
    }

    pub fn params(&self) -> PresetParams {
        self.preset.params()
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width >= MIN_FIELD_WIDTH) || !self.field_width.is_finite() {
            return Err(ConfigError::InvalidDimension {
                name: "field_width",
                value: self.field_width,
            });
        }
        if !(self.field_height >= MIN_FIELD_HEIGHT) || !self.field_height.is_finite() {
            return Err(ConfigError::InvalidDimension {
                name: "field_height",
                value: self.field_height,
            });
        }

        let durations = [
            ("round_duration_secs", self.round_duration_secs),
            ("combo_window_secs", self.combo_window_secs),
            ("ice_cooldown_min_secs", self.ice_cooldown_min_secs),
            ("dynamite_cooldown_min_secs", self.dynamite_cooldown_min_secs),
            ("medkit_cooldown_min_secs", self.medkit_cooldown_min_secs),
            ("dynamite_respawn_delay_secs", self.dynamite_respawn_delay_secs),
        ];
        for (name, value) in durations {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }
        // Jitter ranges may be zero, never negative
        let jitters = [
            ("ice_cooldown_var_secs", self.ice_cooldown_var_secs),
            ("dynamite_cooldown_var_secs", self.dynamite_cooldown_var_secs),
            ("medkit_cooldown_var_secs", self.medkit_cooldown_var_secs),
        ];
        for (name, value) in jitters {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositiveDuration { name, value });
            }
        }

        if self.max_lives == 0 || self.max_lives > 99 {
            return Err(ConfigError::InvalidLives(self.max_lives));
        }
        if !(0.25..=3.0).contains(&self.move_speed) {
            return Err(ConfigError::InvalidMoveSpeed(self.move_speed));
        }
        let cap = self.params().max_defenders;
        if self.starting_defenders > cap {
            return Err(ConfigError::TooManyStartingDefenders {
                starting: self.starting_defenders,
                cap,
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} ({} preset)",
            path.as_ref().display(),
            settings.preset.as_str()
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
        for preset in [DifficultyPreset::Easy, DifficultyPreset::Normal, DifficultyPreset::Hard] {
            assert!(Settings::from_preset(preset).validate().is_ok());
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(DifficultyPreset::from_str("HARD"), Some(DifficultyPreset::Hard));
        assert_eq!(DifficultyPreset::from_str("normal"), Some(DifficultyPreset::Normal));
        assert_eq!(DifficultyPreset::from_str("nightmare"), None);
    }

    #[test]
    fn test_rejects_negative_dimensions() {
        let settings = Settings {
            field_width: -960.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidDimension { name: "field_width", .. })
        ));
    }

    #[test]
    fn test_rejects_nan_dimensions() {
        let settings = Settings {
            field_height: f32::NAN,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_cooldown() {
        let settings = Settings {
            ice_cooldown_min_secs: 0.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonPositiveDuration { name: "ice_cooldown_min_secs", .. })
        ));
    }

    #[test]
    fn test_rejects_too_many_starting_defenders() {
        let settings = Settings {
            starting_defenders: 8,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::TooManyStartingDefenders { starting: 8, cap: 7 })
        ));
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let settings = Settings::from_json(r#"{ "preset": "Hard", "max_lives": 3 }"#).unwrap();
        assert_eq!(settings.preset, DifficultyPreset::Hard);
        assert_eq!(settings.max_lives, 3);
        assert_eq!(settings.field_width, FIELD_WIDTH);
    }

    #[test]
    fn test_json_invalid_is_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "max_lives": 0 }"#),
            Err(ConfigError::InvalidLives(0))
        ));
        assert!(matches!(Settings::from_json("not json"), Err(ConfigError::Parse(_))));
    }
}
