//! Error types for configuration and simulation integrity

use thiserror::Error;

/// Rejected round configuration. A round never starts with one of these.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name}: {value} (field must be at least 320x240)")]
    InvalidDimension { name: &'static str, value: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositiveDuration { name: &'static str, value: f32 },

    #[error("max lives must be between 1 and 99, got {0}")]
    InvalidLives(u8),

    #[error("move speed must be within 0.25..=3.0, got {0}")]
    InvalidMoveSpeed(f32),

    #[error("{starting} starting defenders exceeds the preset cap of {cap}")]
    TooManyStartingDefenders { starting: usize, cap: usize },

    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inconsistent world state detected after a tick
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("non-finite value in {what}")]
    NonFinite { what: &'static str },
}
