//! Input aggregation
//!
//! Merges keyboard, virtual joystick and on-screen buttons into one
//! normalized intent. Dash and shoot are edge-triggered: a press is reported
//! by exactly one `sample` call.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_length;

/// Joystick deflection below this fraction of full travel is ignored
pub const JOYSTICK_DEADZONE: f32 = 0.22;

/// Per-tick movement and action intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub move_x: f32,
    pub move_y: f32,
    pub dash_requested: bool,
    pub shoot_requested: bool,
}

impl Intent {
    /// Movement as a vector with length <= 1
    pub fn movement(&self) -> Vec2 {
        Vec2::new(self.move_x, self.move_y)
    }

    /// Replace missing/NaN axes with neutral values and clamp the rest
    pub fn sanitized(self) -> Self {
        let mut intent = self;
        if !intent.move_x.is_finite() || !intent.move_y.is_finite() {
            log::warn!(
                "Discarding non-finite move intent ({}, {})",
                intent.move_x,
                intent.move_y
            );
            intent.move_x = 0.0;
            intent.move_y = 0.0;
        }
        let v = clamp_length(
            Vec2::new(intent.move_x.clamp(-1.0, 1.0), intent.move_y.clamp(-1.0, 1.0)),
            1.0,
        );
        intent.move_x = v.x;
        intent.move_y = v.y;
        intent
    }
}

/// Raw device state read once at the start of a frame
#[derive(Debug, Clone, Copy, Default)]
pub struct RawInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Held dash key (shift)
    pub dash_key: bool,
    /// Held shoot key (space)
    pub shoot_key: bool,
    /// Virtual joystick deflection, each axis in [-1, 1]; None when untouched
    pub joystick: Option<Vec2>,
}

/// Turns raw device state into intents
#[derive(Debug, Clone, Default)]
pub struct InputAggregator {
    dash_latched: bool,
    shoot_latched: bool,
    prev_dash_key: bool,
    prev_shoot_key: bool,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// On-screen dash button pressed
    pub fn press_dash(&mut self) {
        self.dash_latched = true;
    }

    /// On-screen shoot button pressed
    pub fn press_shoot(&mut self) {
        self.shoot_latched = true;
    }

    /// Build this tick's intent, consuming any pending action presses
    pub fn sample(&mut self, raw: &RawInput) -> Intent {
        let mut axis = Vec2::new(
            (raw.right as i32 - raw.left as i32) as f32,
            (raw.down as i32 - raw.up as i32) as f32,
        );

        if let Some(stick) = raw.joystick {
            if stick.is_finite() {
                let stick = clamp_length(stick, 1.0);
                if stick.length() > JOYSTICK_DEADZONE {
                    axis += stick;
                }
            } else {
                log::warn!("Ignoring non-finite joystick input");
            }
        }

        let dash_edge = raw.dash_key && !self.prev_dash_key;
        let shoot_edge = raw.shoot_key && !self.prev_shoot_key;
        self.prev_dash_key = raw.dash_key;
        self.prev_shoot_key = raw.shoot_key;

        let intent = Intent {
            move_x: axis.x,
            move_y: axis.y,
            dash_requested: dash_edge || self.dash_latched,
            shoot_requested: shoot_edge || self.shoot_latched,
        };
        self.dash_latched = false;
        self.shoot_latched = false;

        intent.sanitized()
    }
}
