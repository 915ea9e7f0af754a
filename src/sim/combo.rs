//! Pickup streaks
//!
//! Every eligible pickup inside the window extends the streak. Crossing a
//! tier pays the difference between the new and previous tier bonus, so a
//! tier is only ever paid once per streak.

use serde::{Deserialize, Serialize};

/// (streak length, cumulative bonus, label)
pub const COMBO_TIERS: [(u32, u64, &str); 4] = [
    (3, 1, "Streak"),
    (5, 2, "Heated"),
    (8, 4, "On Fire"),
    (12, 8, "Unstoppable"),
];

/// Tier bonus for a streak length (step function)
pub fn tier_bonus(count: u32) -> u64 {
    COMBO_TIERS
        .iter()
        .filter(|(n, _, _)| count >= *n)
        .map(|(_, bonus, _)| *bonus)
        .last()
        .unwrap_or(0)
}

/// Label of the highest tier reached, if any
pub fn tier_label(count: u32) -> Option<&'static str> {
    COMBO_TIERS
        .iter()
        .filter(|(n, _, _)| count >= *n)
        .map(|(_, _, label)| *label)
        .last()
}

/// Streak state. `window > 0` exactly when `count > 0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComboTracker {
    pub count: u32,
    /// Seconds left to extend the streak
    pub window: f32,
    /// Longest streak this round
    pub best: u32,
}

impl ComboTracker {
    /// Register an eligible pickup; returns the bonus points earned
    pub fn register(&mut self, window_secs: f32) -> u64 {
        let prev = self.count;
        self.count += 1;
        self.window = window_secs;
        self.best = self.best.max(self.count);
        tier_bonus(self.count).saturating_sub(tier_bonus(prev))
    }

    /// Count the window down; returns true when a streak just lapsed
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.count == 0 {
            self.window = 0.0;
            return false;
        }
        self.window = (self.window - dt).max(0.0);
        if self.window == 0.0 {
            self.count = 0;
            return true;
        }
        false
    }

    /// Drop the streak immediately (player was hit)
    pub fn reset(&mut self) {
        self.count = 0;
        self.window = 0.0;
    }
}
