//! Spawn director
//!
//! Cooldown-gated pickup generation and defender population upkeep, both
//! scaled by the difficulty curve.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::pickup::PickupKind;
use super::state::World;
use crate::approach_factor;
use crate::settings::Settings;

/// Chance a medkit actually appears when its cooldown fires
pub const MEDKIT_CHANCE: f64 = 0.9;
/// Chance ice is offered when its cooldown has elapsed
pub const ICE_CHANCE: f64 = 0.5;
/// Rate of random defender top-ups while below cap (per second)
pub const TOP_UP_RATE: f32 = 0.18;

/// Spawn timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnDirector {
    /// Seconds since the last pickup spawn
    pub since_last: f32,
    pub ice_cooldown: f32,
    pub dynamite_cooldown: f32,
    pub medkit_cooldown: f32,
    /// Difficulty defender bonus already applied
    pub applied_bonus: usize,
}

fn jittered(min: f32, var: f32, rng: &mut impl Rng) -> f32 {
    min + rng.random::<f32>() * var
}

impl SpawnDirector {
    pub fn new(settings: &Settings, rng: &mut impl Rng) -> Self {
        Self {
            since_last: 0.0,
            ice_cooldown: jittered(settings.ice_cooldown_min_secs, settings.ice_cooldown_var_secs, rng),
            dynamite_cooldown: jittered(
                settings.dynamite_cooldown_min_secs,
                settings.dynamite_cooldown_var_secs,
                rng,
            ),
            medkit_cooldown: jittered(
                settings.medkit_cooldown_min_secs,
                settings.medkit_cooldown_var_secs,
                rng,
            ),
            applied_bonus: 0,
        }
    }
}

/// Weighted draw for a regular spawn
pub fn draw_pickup(dynamite_ready: bool, rng: &mut impl Rng) -> PickupKind {
    let roll: f32 = rng.random();
    match roll {
        r if r < 0.10 => PickupKind::Gold,
        r if r < 0.18 => PickupKind::Powerplay,
        r if r < 0.24 && dynamite_ready => PickupKind::Dynamite,
        r if (0.24..0.40).contains(&r) => PickupKind::Dribble,
        _ => {
            let size: f32 = rng.random();
            if size < 0.55 {
                PickupKind::NormalSmall
            } else if size < 0.85 {
                PickupKind::NormalMedium
            } else {
                PickupKind::NormalLarge
            }
        }
    }
}

/// Run the spawn director for one tick
pub fn spawn_step(world: &mut World, dt: f32, diff: &Difficulty) {
    let settings = &world.settings;
    let (ice_min, ice_var) = (settings.ice_cooldown_min_secs, settings.ice_cooldown_var_secs);
    let (dyn_min, dyn_var) = (
        settings.dynamite_cooldown_min_secs,
        settings.dynamite_cooldown_var_secs,
    );
    let (med_min, med_var) = (settings.medkit_cooldown_min_secs, settings.medkit_cooldown_var_secs);
    let field = world.field;

    let spawner = &mut world.spawner;
    spawner.ice_cooldown = (spawner.ice_cooldown - dt).max(0.0);
    spawner.dynamite_cooldown = (spawner.dynamite_cooldown - dt).max(0.0);
    spawner.medkit_cooldown = (spawner.medkit_cooldown - dt).max(0.0);
    spawner.since_last += dt;

    let interval = diff.spawn_interval(world.params.spawn_every);
    if spawner.since_last > interval {
        spawner.since_last = 0.0;
        let rng = &mut world.rng;
        let pos = Vec2::new(
            rng.random_range(field.x * 0.2..field.x * 0.95),
            rng.random_range(50.0..field.y - 50.0),
        );

        let kind = if spawner.ice_cooldown <= 0.0 && rng.random_bool(ICE_CHANCE) {
            spawner.ice_cooldown = jittered(ice_min, ice_var, rng);
            PickupKind::Ice
        } else {
            let kind = draw_pickup(spawner.dynamite_cooldown <= 0.0, rng);
            if kind == PickupKind::Dynamite {
                spawner.dynamite_cooldown = jittered(dyn_min, dyn_var, rng);
            }
            kind
        };
        log::debug!("Spawned {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
        world.spawn_pickup(kind, pos);
    }

    if world.is_survival() && world.spawner.medkit_cooldown <= 0.0 {
        let rng = &mut world.rng;
        world.spawner.medkit_cooldown = jittered(med_min, med_var, rng);
        if world.round.lives < world.round.max_lives && rng.random_bool(MEDKIT_CHANCE) {
            let pos = Vec2::new(
                rng.random_range(field.x * 0.15..field.x * 0.85),
                rng.random_range(60.0..field.y - 60.0),
            );
            log::debug!("Spawned medkit at ({:.0}, {:.0})", pos.x, pos.y);
            world.spawn_pickup(PickupKind::Medkit, pos);
        }
    }

    maintain_defenders(world, dt, diff);
}

/// Keep the defender pool topped up toward the difficulty cap
pub fn maintain_defenders(world: &mut World, dt: f32, diff: &Difficulty) {
    let cap = diff.defender_cap(world.params.max_defenders);
    let base_speed = world.params.base_speed * diff.speed_multiplier;
    let suppressed = world.effects.dynamite_suppress > 0.0;

    if diff.defender_bonus > world.spawner.applied_bonus {
        let added = diff.defender_bonus - world.spawner.applied_bonus;
        if !suppressed {
            for _ in 0..added {
                if world.defenders.len() < cap {
                    world.spawn_defender(base_speed);
                }
            }
        }
        world.spawner.applied_bonus = diff.defender_bonus;
    }

    if suppressed {
        return;
    }

    if world.defenders.is_empty() {
        log::debug!("Defender pool empty; repopulating to {}", cap);
        while world.defenders.len() < cap {
            world.spawn_defender(base_speed);
        }
        return;
    }

    if world.defenders.len() < cap && world.rng.random_bool(approach_factor(TOP_UP_RATE, dt) as f64) {
        world.spawn_defender(base_speed);
    }
}
