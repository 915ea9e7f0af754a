//! Fixed-order simulation step
//!
//! Advances the world by one already-clamped timestep. The order matters:
//! movement first, then spawning, then overlap resolution against the
//! updated positions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_hit;
use super::defender::DefenderEnv;
use super::difficulty::difficulty;
use super::input::Intent;
use super::pickup::collect_pickups;
use super::player::MoveScale;
use super::possession::{shoot, update_ball};
use super::spawn::spawn_step;
use super::state::{GameEvent, GameMode, MAX_PARTICLES, Particle, ParticleKind, World};
use super::zone::{SPEED_BOOST, tick_zones, use_zones};
use crate::error::SimError;

/// Time scale while slow motion is active
pub const SLOWMO_SCALE: f32 = 0.45;

/// Input for a single tick as supplied by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Wall time since the previous tick (ms, clamped before use)
    pub elapsed_ms: f32,
    pub intent: Intent,
    /// Mode the host believes is running
    pub mode: GameMode,
}

/// Advance the world by `dt` seconds
pub fn tick(world: &mut World, intent: &Intent, dt: f32) -> Result<(), SimError> {
    world.events.clear();
    world.time_ticks += 1;

    world.round.elapsed += dt;
    if !world.is_survival() {
        world.round.time_remaining = (world.round.time_remaining - dt).max(0.0);
    }

    world.effects.decay(dt);
    if world.combo.tick(dt) {
        world.push_event(GameEvent::ComboLost);
    }
    tick_zones(world, dt);

    let diff = difficulty(world.round.peak_score);

    let time_scale = if world.effects.slowmo > 0.0 { SLOWMO_SCALE } else { 1.0 };
    let scale = MoveScale {
        move_speed: world.settings.move_speed,
        time_scale,
        boost: if world.effects.speed_boost > 0.0 { SPEED_BOOST } else { 1.0 },
    };
    let field = world.field;
    if world.player.update(intent, dt, scale, field) {
        world.push_event(GameEvent::Dash);
    }

    let env = DefenderEnv {
        player_pos: world.player.pos,
        field,
        base_speed: world.params.base_speed * diff.speed_multiplier,
        max_speed_mul: world.params.max_speed_mul,
        slow_radius: world.params.slow_radius,
        frozen_world: world.effects.freeze > 0.0,
    };
    let defender_dt = dt * time_scale;
    for defender in &mut world.defenders {
        defender.update(&env, defender_dt, &mut world.rng);
    }

    spawn_step(world, dt, &diff);
    update_particles(world, dt);

    collect_pickups(world);
    use_zones(world);
    if intent.shoot_requested {
        shoot(world);
    }
    update_ball(world, dt);
    resolve_hit(world);

    check_integrity(world)
}

/// Verify the world is still sane after a step
fn check_integrity(world: &mut World) -> Result<(), SimError> {
    if !world.player.pos.is_finite() || !world.player.vel.is_finite() {
        return Err(SimError::NonFinite { what: "player" });
    }
    if world.defenders.iter().any(|d| !d.pos.is_finite()) {
        return Err(SimError::NonFinite { what: "defender" });
    }
    if world.ball.as_ref().is_some_and(|b| !b.pos.is_finite()) {
        return Err(SimError::NonFinite { what: "ball" });
    }
    if !world.round.time_remaining.is_finite() {
        return Err(SimError::NonFinite { what: "clock" });
    }

    let cap = difficulty(world.round.peak_score).defender_cap(world.params.max_defenders);
    if world.defenders.len() > cap {
        log::warn!(
            "Defender pool over cap ({} > {}); discarding extras",
            world.defenders.len(),
            cap
        );
        world.defenders.truncate(cap);
    }
    Ok(())
}

fn update_particles(world: &mut World, dt: f32) {
    let drag = (-2.0 * dt).exp();
    for p in &mut world.particles {
        p.life -= dt;
        match p.kind {
            ParticleKind::Ring => p.size += 160.0 * dt,
            ParticleKind::Confetti => {
                p.vel.y += 220.0 * dt;
                p.pos += p.vel * dt;
            }
            _ => {
                p.vel *= drag;
                p.pos += p.vel * dt;
            }
        }
    }
    world.particles.retain(|p| p.life > 0.0);
}

/// Emit a burst of cosmetic particles. Spread comes from a hash of the tick
/// and particle index so gameplay RNG is never touched.
pub fn spawn_burst(world: &mut World, pos: Vec2, kind: ParticleKind, color: u32, count: usize) {
    let seed = (world.time_ticks as u32)
        .wrapping_mul(2654435761)
        .wrapping_add(world.particles.len() as u32 * 31);

    for i in 0..count {
        if world.particles.len() >= MAX_PARTICLES {
            // Remove oldest particles to make room
            world.particles.remove(0);
        }

        if kind == ParticleKind::Ring {
            world.particles.push(Particle {
                kind,
                pos,
                vel: Vec2::ZERO,
                color,
                life: 0.5,
                max_life: 0.5,
                size: 8.0,
            });
            continue;
        }

        let hash = seed.wrapping_add(i as u32 * 7919).wrapping_mul(2246822519);
        let angle = (hash % 1000) as f32 / 1000.0 * std::f32::consts::TAU;
        let (speed, life, size) = match kind {
            ParticleKind::Spark => (60.0 + (hash / 1000 % 140) as f32, 0.5, 2.0),
            ParticleKind::Coin => (80.0 + (hash / 1000 % 100) as f32, 0.7, 4.0),
            ParticleKind::Gib => (100.0 + (hash / 1000 % 180) as f32, 0.9, 3.0 + (hash / 100000 % 3) as f32),
            ParticleKind::Confetti => (120.0 + (hash / 1000 % 200) as f32, 1.2, 3.0),
            ParticleKind::Ring => (0.0, 0.5, 8.0),
        };
        let mut vel = Vec2::from_angle(angle) * speed;
        if kind == ParticleKind::Confetti {
            vel.y -= 150.0;
        }
        world.particles.push(Particle {
            kind,
            pos,
            vel,
            color,
            life,
            max_life: life,
            size,
        });
    }
}
