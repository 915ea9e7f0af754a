//! Player kinematics and dash state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::input::Intent;
use crate::{clamp_length, sign};

pub const PLAYER_RADIUS: f32 = 11.0;
/// Top speed (px/s) at move speed 1.0
pub const PLAYER_MAX_SPEED: f32 = 180.0;
/// Top speed while dashing (px/s)
pub const DASH_MAX_SPEED: f32 = 277.0;
/// Acceleration along each input axis (px/s²)
pub const PLAYER_ACCEL: f32 = 950.0;
/// Base friction rate (1/s)
pub const PLAYER_FRICTION: f32 = 0.96;
/// Friction multiplier with no input
pub const FRICTION_IDLE: f32 = 1.35;
/// Friction multiplier when input opposes the current velocity
pub const FRICTION_REVERSE: f32 = 1.9;
/// Instant velocity multiplier when a dash fires
pub const DASH_BOOST: f32 = 1.2;
pub const DASH_DURATION: f32 = 0.42;
pub const DASH_COOLDOWN: f32 = 2.4;
/// Invulnerability granted by a dash
pub const DASH_INVULN: f32 = 0.25;

/// Dash state machine: Ready -> Dashing -> Cooling -> Ready
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DashState {
    Ready,
    Dashing { remaining: f32 },
    Cooling { remaining: f32 },
}

/// The player-controlled runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds of invulnerability left
    pub invuln: f32,
    pub dash: DashState,
}

/// Movement scaling for the current tick
#[derive(Debug, Clone, Copy)]
pub struct MoveScale {
    /// Player speed setting
    pub move_speed: f32,
    /// Slow-motion multiplier (1.0 when inactive)
    pub time_scale: f32,
    /// Speed-zone multiplier (1.0 when inactive)
    pub boost: f32,
}

impl Default for MoveScale {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            time_scale: 1.0,
            boost: 1.0,
        }
    }
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            invuln: 0.0,
            dash: DashState::Ready,
        }
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self.dash, DashState::Dashing { .. })
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln > 0.0
    }

    /// Grant invulnerability without shortening an existing window
    pub fn grant_invuln(&mut self, secs: f32) {
        self.invuln = self.invuln.max(secs);
    }

    /// Advance one tick. Returns true when a dash fired this tick.
    pub fn update(&mut self, intent: &Intent, dt: f32, scale: MoveScale, field: Vec2) -> bool {
        let dt_move = dt * scale.time_scale * scale.boost;
        let input = intent.movement();

        self.vel += input * PLAYER_ACCEL * scale.move_speed * dt_move;

        let has_input = input != Vec2::ZERO;
        let reversing_x = input.x != 0.0 && self.vel.x != 0.0 && sign(input.x) != sign(self.vel.x);
        let reversing_y = input.y != 0.0 && self.vel.y != 0.0 && sign(input.y) != sign(self.vel.y);
        let friction_mul = if reversing_x || reversing_y {
            FRICTION_REVERSE
        } else if !has_input {
            FRICTION_IDLE
        } else {
            1.0
        };
        let decay = (1.0 - PLAYER_FRICTION * friction_mul * dt_move).max(0.0);
        self.vel *= decay;

        let top = if self.is_dashing() {
            DASH_MAX_SPEED
        } else {
            PLAYER_MAX_SPEED
        } * scale.move_speed
            * scale.time_scale
            * scale.boost;
        self.vel = clamp_length(self.vel, top);

        let mut dashed = false;
        if intent.dash_requested && self.dash == DashState::Ready {
            self.vel *= DASH_BOOST;
            self.grant_invuln(DASH_INVULN);
            self.dash = DashState::Dashing {
                remaining: DASH_DURATION,
            };
            dashed = true;
        }

        self.tick_timers(dt);

        self.pos += self.vel * dt_move;
        self.clamp_to_field(field);
        dashed
    }

    fn tick_timers(&mut self, dt: f32) {
        self.invuln = (self.invuln - dt).max(0.0);
        self.dash = match self.dash {
            DashState::Ready => DashState::Ready,
            DashState::Dashing { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    DashState::Cooling {
                        remaining: DASH_COOLDOWN,
                    }
                } else {
                    DashState::Dashing { remaining }
                }
            }
            DashState::Cooling { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    DashState::Ready
                } else {
                    DashState::Cooling { remaining }
                }
            }
        };
    }

    /// Keep the whole body inside the field
    pub fn clamp_to_field(&mut self, field: Vec2) {
        self.pos.x = self.pos.x.clamp(self.radius, field.x - self.radius);
        self.pos.y = self.pos.y.clamp(self.radius, field.y - self.radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    const DT: f32 = 1.0 / 60.0;

    fn field() -> Vec2 {
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT)
    }

    fn right() -> Intent {
        Intent {
            move_x: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_accelerates_and_caps() {
        let mut p = Player::new(Vec2::new(200.0, 200.0));
        for _ in 0..120 {
            p.update(&right(), DT, MoveScale::default(), field());
        }
        assert!(p.vel.x > 0.0);
        assert!(p.vel.length() <= PLAYER_MAX_SPEED + 1e-3);
        assert!(p.pos.x > 200.0);
    }

    #[test]
    fn test_friction_without_input_is_gradual() {
        let mut p = Player::new(Vec2::new(400.0, 200.0));
        p.vel = Vec2::new(150.0, 0.0);
        p.update(&Intent::default(), DT, MoveScale::default(), field());
        assert!(p.vel.x > 0.0 && p.vel.x < 150.0);
    }

    #[test]
    fn test_reverse_input_brakes_harder_than_idle() {
        let mut idle = Player::new(Vec2::new(400.0, 200.0));
        idle.vel = Vec2::new(150.0, 0.0);
        let mut reverse = idle.clone();
        idle.update(&Intent::default(), DT, MoveScale::default(), field());
        let left = Intent {
            move_x: -1.0,
            ..Default::default()
        };
        reverse.update(&left, DT, MoveScale::default(), field());
        assert!(reverse.vel.x < idle.vel.x);
    }

    #[test]
    fn test_dash_cycle() {
        let mut p = Player::new(Vec2::new(400.0, 200.0));
        p.vel = Vec2::new(100.0, 0.0);
        let dash = Intent {
            move_x: 1.0,
            dash_requested: true,
            ..Default::default()
        };
        assert!(p.update(&dash, DT, MoveScale::default(), field()));
        assert!(p.is_dashing());
        assert!(p.is_invulnerable());

        // A second request mid-dash does nothing
        assert!(!p.update(&dash, DT, MoveScale::default(), field()));

        let mut t = 0.0;
        while p.is_dashing() {
            p.update(&right(), DT, MoveScale::default(), field());
            t += DT;
        }
        assert!(t <= DASH_DURATION + DT);
        assert!(matches!(p.dash, DashState::Cooling { .. }));

        for _ in 0..((DASH_COOLDOWN / DT) as usize + 2) {
            p.update(&right(), DT, MoveScale::default(), field());
        }
        assert_eq!(p.dash, DashState::Ready);
    }

    #[test]
    fn test_clamped_to_field() {
        let mut p = Player::new(Vec2::new(15.0, 15.0));
        let up_left = Intent {
            move_x: -1.0,
            move_y: -1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            p.update(&up_left, DT, MoveScale::default(), field());
        }
        assert_eq!(p.pos, Vec2::splat(PLAYER_RADIUS));
    }

    #[test]
    fn test_slow_motion_moves_less() {
        let mut normal = Player::new(Vec2::new(400.0, 200.0));
        normal.vel = Vec2::new(150.0, 0.0);
        let mut slow = normal.clone();
        normal.update(&right(), DT, MoveScale::default(), field());
        let scale = MoveScale {
            time_scale: 0.45,
            ..Default::default()
        };
        slow.update(&right(), DT, scale, field());
        assert!(slow.pos.x - 400.0 < normal.pos.x - 400.0);
    }

    #[test]
    fn test_speed_zone_boost_moves_further() {
        use crate::sim::zone::SPEED_BOOST;

        let mut normal = Player::new(Vec2::new(400.0, 200.0));
        normal.vel = Vec2::new(150.0, 0.0);
        let mut boosted = normal.clone();
        let scale = MoveScale {
            boost: SPEED_BOOST,
            ..Default::default()
        };
        for _ in 0..30 {
            normal.update(&right(), DT, MoveScale::default(), field());
            boosted.update(&right(), DT, scale, field());
        }
        assert!(boosted.pos.x - 400.0 > normal.pos.x - 400.0);
        assert!(boosted.vel.x > PLAYER_MAX_SPEED);
        assert!(boosted.vel.length() <= PLAYER_MAX_SPEED * SPEED_BOOST + 1e-3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the player never leaves the field
            #[test]
            fn prop_stays_in_bounds(
                moves in prop::collection::vec((-1.0f32..=1.0, -1.0f32..=1.0, any::<bool>()), 1..300),
                dt in 0.001f32..0.032,
            ) {
                let mut p = Player::new(Vec2::new(480.0, 280.0));
                for (x, y, dash) in moves {
                    let intent = Intent { move_x: x, move_y: y, dash_requested: dash, shoot_requested: false }.sanitized();
                    p.update(&intent, dt, MoveScale::default(), field());
                    prop_assert!(p.pos.x >= p.radius && p.pos.x <= FIELD_WIDTH - p.radius);
                    prop_assert!(p.pos.y >= p.radius && p.pos.y <= FIELD_HEIGHT - p.radius);
                    prop_assert!(p.invuln >= 0.0);
                }
            }
        }
    }
}
