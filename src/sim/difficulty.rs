//! Score-driven difficulty curve
//!
//! One speed step at 100 points, a second at 200 (plus an extra defender),
//! then another step and another defender every 50 points after that.

use serde::{Deserialize, Serialize};

/// Speed multiplier gained per difficulty step
pub const SPEED_STEP: f32 = 0.06;
/// Score of the first speed step
pub const FIRST_STEP_SCORE: u64 = 100;
/// Score where defenders start being added
pub const CAP_STEP_SCORE: u64 = 200;
/// Points between further steps beyond `CAP_STEP_SCORE`
pub const STEP_INTERVAL: u64 = 50;

/// Difficulty derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub steps: u32,
    pub speed_multiplier: f32,
    /// Defenders added on top of the preset cap
    pub defender_bonus: usize,
    /// Pickup spawn interval is divided by this
    pub spawn_interval_divisor: f32,
}

impl Difficulty {
    pub fn defender_cap(&self, base_cap: usize) -> usize {
        base_cap + self.defender_bonus
    }

    /// Spawn interval for a preset's base interval (seconds)
    pub fn spawn_interval(&self, base_interval: f32) -> f32 {
        base_interval / self.spawn_interval_divisor.max(1.0)
    }
}

/// Difficulty for a cumulative score
pub fn difficulty(score: u64) -> Difficulty {
    let beyond = if score >= CAP_STEP_SCORE {
        1 + (score - CAP_STEP_SCORE) / STEP_INTERVAL
    } else {
        0
    };
    let mut steps = beyond;
    if score >= FIRST_STEP_SCORE {
        steps += 1;
    }

    let steps = steps.min(u32::MAX as u64) as u32;
    let speed_multiplier = 1.0 + steps as f32 * SPEED_STEP;
    Difficulty {
        steps,
        speed_multiplier,
        defender_bonus: beyond as usize,
        spawn_interval_divisor: speed_multiplier,
    }
}
