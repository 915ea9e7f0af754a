//! Reaction Rush - a dodge-and-score arcade mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, defender AI, pickups, goals, round lifecycle)
//! - `settings`: Data-driven game balance and round configuration
//! - `highscores`: Session leaderboard fed by finished rounds
//! - `platform`: Browser bridge for the simulation

pub mod error;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SimError};
pub use highscores::{HighScores, SummarySink};
pub use settings::{DifficultyPreset, PresetParams, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest elapsed time a single tick may consume (ms)
    pub const MAX_STEP_MS: f32 = 32.0;
    /// Nominal host frame time, used by the headless runner (ms)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Default field dimensions
    pub const FIELD_WIDTH: f32 = 960.0;
    pub const FIELD_HEIGHT: f32 = 560.0;
    /// Smallest field the simulation accepts
    pub const MIN_FIELD_WIDTH: f32 = 320.0;
    pub const MIN_FIELD_HEIGHT: f32 = 240.0;

    /// Vertical gap of each goal mouth, centered on the side edges
    pub const GOAL_OPENING: f32 = 160.0;
    /// How close to a side edge counts as "in" the goal
    pub const GOAL_EDGE_MARGIN: f32 = 22.0;
    /// Points for a goal
    pub const GOAL_SCORE: u64 = 10;
    /// Extra points for a goal while the shot-zone bonus is live
    pub const GOAL_SHOT_BONUS: u64 = 5;

    /// Timed round length (seconds)
    pub const ROUND_DURATION_SECS: f32 = 60.0;
    /// Survival mode lives
    pub const MAX_LIVES: u8 = 5;
}

/// Squared distance check between two circles
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Clamp a vector's length to `max` (no-op when shorter)
#[inline]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > max * max && len_sq > 0.0 {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}

/// Frame-rate independent exponential approach factor for `rate` per second
#[inline]
pub fn approach_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Sign of a float, treating zero as zero (unlike `f32::signum`)
#[inline]
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_clamp_length() {
        let v = clamp_length(Vec2::new(30.0, 40.0), 5.0);
        assert!((v.length() - 5.0).abs() < 1e-4);
        assert_eq!(clamp_length(Vec2::new(1.0, 0.0), 5.0), Vec2::new(1.0, 0.0));
        assert_eq!(clamp_length(Vec2::ZERO, 5.0), Vec2::ZERO);
    }

    #[test]
    fn test_sign_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(0.1), 1.0);
    }
}
