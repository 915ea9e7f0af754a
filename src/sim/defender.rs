//! Defender AI
//!
//! Each defender runs one of six movement behaviors and periodically
//! re-rolls it. Behavior parameters live inside the variant so a re-roll
//! replaces the whole strategy at once.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{approach_factor, clamp_length};

pub const DEFENDER_RADIUS: f32 = 16.0;
/// Defenders turn around when this close to an edge
pub const TURN_MARGIN: f32 = 40.0;
/// Hard clamp distance from edges
pub const CLAMP_MARGIN: f32 = 20.0;
/// Speed multiplier inside the player's proximity radius
pub const PROXIMITY_SLOW: f32 = 0.7;
/// Rate at which speed approaches the difficulty baseline (1/s)
pub const SPEED_SMOOTHING: f32 = 1.2;
/// Orbit angular rate (rad/s)
pub const ORBIT_RATE: f32 = 2.0;
/// Seeking steering acceleration (px/s²)
pub const SEEK_ACCEL: f32 = 1000.0;
/// Wandering random perturbation (px/s²)
pub const WANDER_JITTER: f32 = 500.0;
/// Diagonal/wander speed cap relative to the normal cap
pub const LOOSE_CAP_MUL: f32 = 1.1;
/// Behavior re-roll interval range (s)
pub const REROLL_MIN: f32 = 0.9;
pub const REROLL_VAR: f32 = 1.3;
/// Minimum horizontal gap from the player when spawning
pub const SPAWN_CLEARANCE: f32 = 180.0;

/// Behavior tag, for renderers and re-roll draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorKind {
    Horizontal,
    Vertical,
    Diagonal,
    Orbit,
    Seeking,
    Wandering,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 6] = [
        BehaviorKind::Horizontal,
        BehaviorKind::Vertical,
        BehaviorKind::Diagonal,
        BehaviorKind::Orbit,
        BehaviorKind::Seeking,
        BehaviorKind::Wandering,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Movement strategy with its own parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Horizontal { dir: f32 },
    Vertical { dir: f32 },
    Diagonal,
    Orbit { center: Vec2, radius: f32, theta: f32, dir: f32 },
    Seeking,
    Wandering,
}

impl Behavior {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Horizontal { .. } => BehaviorKind::Horizontal,
            Behavior::Vertical { .. } => BehaviorKind::Vertical,
            Behavior::Diagonal => BehaviorKind::Diagonal,
            Behavior::Orbit { .. } => BehaviorKind::Orbit,
            Behavior::Seeking => BehaviorKind::Seeking,
            Behavior::Wandering => BehaviorKind::Wandering,
        }
    }

    /// Fresh parameters for `kind`, starting from the defender's current position
    pub fn generate(kind: BehaviorKind, pos: Vec2, rng: &mut impl Rng) -> Self {
        let dir = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        match kind {
            BehaviorKind::Horizontal => Behavior::Horizontal { dir },
            BehaviorKind::Vertical => Behavior::Vertical { dir },
            BehaviorKind::Diagonal => Behavior::Diagonal,
            BehaviorKind::Orbit => {
                let radius = rng.random_range(60.0..140.0);
                let theta = rng.random_range(0.0..std::f32::consts::TAU);
                // Center chosen so the current position lies on the circle
                let center = pos - Vec2::new(theta.cos(), theta.sin()) * radius;
                Behavior::Orbit {
                    center,
                    radius,
                    theta,
                    dir,
                }
            }
            BehaviorKind::Seeking => Behavior::Seeking,
            BehaviorKind::Wandering => Behavior::Wandering,
        }
    }
}

/// Per-tick context shared by all defenders
#[derive(Debug, Clone, Copy)]
pub struct DefenderEnv {
    pub player_pos: Vec2,
    pub field: Vec2,
    /// Difficulty-scaled cruising speed
    pub base_speed: f32,
    /// Hard cap multiplier over `base_speed`
    pub max_speed_mul: f32,
    pub slow_radius: f32,
    /// Global ice freeze active
    pub frozen_world: bool,
}

/// A pursuit/patrol entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defender {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Current cruising speed (smoothed toward the difficulty baseline)
    pub speed: f32,
    pub behavior: Behavior,
    /// Seconds until the next behavior re-roll
    pub next_decision: f32,
    /// Seconds this defender stays frozen (powerplay web)
    pub frozen: f32,
}

impl Defender {
    /// Spawn a defender away from the player
    pub fn spawn(id: u32, player_pos: Vec2, field: Vec2, base_speed: f32, rng: &mut impl Rng) -> Self {
        let y = rng.random_range(60.0..field.y - 60.0);
        let mut x = rng.random_range(field.x * 0.3..field.x * 0.9);
        if (x - player_pos.x).abs() < SPAWN_CLEARANCE {
            x = player_pos.x + if x < player_pos.x { -SPAWN_CLEARANCE } else { SPAWN_CLEARANCE };
        }
        let pos = Vec2::new(x.clamp(TURN_MARGIN, field.x - TURN_MARGIN), y);
        let kind = BehaviorKind::random(rng);

        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: DEFENDER_RADIUS,
            speed: base_speed * rng.random_range(0.85..1.15),
            behavior: Behavior::generate(kind, pos, rng),
            next_decision: rng.random_range(1.2..2.2),
            frozen: 0.0,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen > 0.0
    }

    /// Freeze in place (powerplay hit)
    pub fn freeze(&mut self, secs: f32) {
        self.frozen = self.frozen.max(secs);
        self.vel = Vec2::ZERO;
    }

    /// Re-roll the behavior: half the time keep the current kind with new parameters
    pub fn reroll(&mut self, rng: &mut impl Rng) {
        let kind = if rng.random_bool(0.5) {
            BehaviorKind::random(rng)
        } else {
            self.behavior.kind()
        };
        self.behavior = Behavior::generate(kind, self.pos, rng);
        self.next_decision = REROLL_MIN + rng.random::<f32>() * REROLL_VAR;
        log::debug!("Defender {} re-rolled to {:?}", self.id, kind);
    }

    /// Advance one tick
    pub fn update(&mut self, env: &DefenderEnv, dt: f32, rng: &mut impl Rng) {
        if self.is_frozen() {
            self.frozen = (self.frozen - dt).max(0.0);
            return;
        }
        if env.frozen_world {
            self.vel = Vec2::ZERO;
            return;
        }

        self.speed += (env.base_speed - self.speed) * approach_factor(SPEED_SMOOTHING, dt);
        let cap = env.base_speed * env.max_speed_mul;

        self.next_decision -= dt;
        if self.next_decision <= 0.0 {
            self.reroll(rng);
        }

        let near = self.pos.distance(env.player_pos) < env.slow_radius;
        let proximity = if near { PROXIMITY_SLOW } else { 1.0 };
        let s = self.speed.min(cap) * proximity;
        let prev = self.pos;
        let field = env.field;

        match &mut self.behavior {
            Behavior::Horizontal { dir } => {
                self.vel = Vec2::new(*dir * s, 0.0);
                self.pos += self.vel * dt;
                if (self.pos.x < TURN_MARGIN && *dir < 0.0) || (self.pos.x > field.x - TURN_MARGIN && *dir > 0.0) {
                    *dir = -*dir;
                }
            }
            Behavior::Vertical { dir } => {
                self.vel = Vec2::new(0.0, *dir * s);
                self.pos += self.vel * dt;
                if (self.pos.y < TURN_MARGIN && *dir < 0.0) || (self.pos.y > field.y - TURN_MARGIN && *dir > 0.0) {
                    *dir = -*dir;
                }
            }
            Behavior::Diagonal => {
                if self.vel.x == 0.0 || self.vel.y == 0.0 {
                    let sx = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
                    let sy = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
                    self.vel = Vec2::new(sx * s, sy * s);
                }
                self.vel = clamp_length(self.vel, cap * LOOSE_CAP_MUL * proximity);
                self.pos += self.vel * dt;
                reflect(&mut self.pos, &mut self.vel, field);
            }
            Behavior::Orbit {
                center,
                radius,
                theta,
                dir,
            } => {
                *theta += ORBIT_RATE * *dir * proximity * dt;
                self.pos = *center + Vec2::new(theta.cos(), theta.sin()) * *radius;
            }
            Behavior::Seeking => {
                let to_player = (env.player_pos - self.pos).normalize_or_zero();
                self.vel += to_player * SEEK_ACCEL * dt;
                self.vel = clamp_length(self.vel, cap * proximity);
                self.pos += self.vel * dt;
            }
            Behavior::Wandering => {
                if self.vel == Vec2::ZERO {
                    self.vel = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)) * s;
                }
                let jitter = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
                self.vel += jitter * WANDER_JITTER * dt;
                self.vel = clamp_length(self.vel, cap * LOOSE_CAP_MUL * proximity);
                self.pos += self.vel * dt;
                reflect(&mut self.pos, &mut self.vel, field);
            }
        }

        self.pos.x = self.pos.x.clamp(CLAMP_MARGIN, field.x - CLAMP_MARGIN);
        self.pos.y = self.pos.y.clamp(CLAMP_MARGIN, field.y - CLAMP_MARGIN);

        if matches!(self.behavior, Behavior::Orbit { .. }) && dt > 0.0 {
            // Derived position: report the effective velocity
            self.vel = (self.pos - prev) / dt;
        }
    }
}

/// Flip velocity components heading out of the turn margin
fn reflect(pos: &mut Vec2, vel: &mut Vec2, field: Vec2) {
    if (pos.x < TURN_MARGIN && vel.x < 0.0) || (pos.x > field.x - TURN_MARGIN && vel.x > 0.0) {
        vel.x = -vel.x;
    }
    if (pos.y < TURN_MARGIN && vel.y < 0.0) || (pos.y > field.y - TURN_MARGIN && vel.y > 0.0) {
        vel.y = -vel.y;
    }
}
