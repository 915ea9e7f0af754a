//! Read-only world snapshot for renderers and HUDs

use glam::Vec2;
use serde::Serialize;

use super::collision::goal_span;
use super::combo::{ComboTracker, tier_label};
use super::defender::Defender;
use super::difficulty::{Difficulty, difficulty};
use super::pickup::Pickup;
use super::player::Player;
use super::possession::CarriedBall;
use super::round::RoundPhase;
use super::state::{Effects, GameEvent, GameMode, Particle, World};
use super::zone::Zone;

/// HUD view of the round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundView {
    pub mode: GameMode,
    pub phase: RoundPhase,
    pub score: u64,
    pub best_score: u64,
    pub lives: u8,
    pub max_lives: u8,
    pub time_remaining: f32,
    pub running: bool,
    pub paused: bool,
    pub ended: bool,
}

/// Everything a renderer needs for one frame. Owns its data.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub field: Vec2,
    /// Goal mouth (top, bottom) on both edges
    pub goal_span: (f32, f32),
    pub player: Player,
    pub defenders: Vec<Defender>,
    pub pickups: Vec<Pickup>,
    pub zones: Vec<Zone>,
    pub ball: Option<CarriedBall>,
    pub combo: ComboTracker,
    pub combo_label: Option<&'static str>,
    pub effects: Effects,
    pub difficulty: Difficulty,
    pub round: RoundView,
    pub events: Vec<GameEvent>,
    pub particles: Vec<Particle>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Copy the world into a snapshot
pub fn capture(world: &World, phase: RoundPhase, best_score: u64) -> WorldSnapshot {
    let r = &world.round;
    WorldSnapshot {
        tick: world.time_ticks,
        field: world.field,
        goal_span: goal_span(world.field),
        player: world.player.clone(),
        defenders: world.defenders.clone(),
        pickups: world.pickups.clone(),
        zones: world.zones.clone(),
        ball: world.ball.clone(),
        combo: world.combo.clone(),
        combo_label: tier_label(world.combo.count),
        effects: world.effects.clone(),
        difficulty: difficulty(r.peak_score),
        round: RoundView {
            mode: r.mode,
            phase,
            score: r.score,
            best_score: best_score.max(r.score),
            lives: r.lives,
            max_lives: r.max_lives,
            time_remaining: r.time_remaining,
            running: phase == RoundPhase::Running,
            paused: phase == RoundPhase::Paused,
            ended: phase == RoundPhase::Ended,
        },
        events: world.events.clone(),
        particles: world.particles.clone(),
    }
}
