//! Pickups and the economy resolver

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combo::tier_label;
use super::possession;
use super::state::{GameEvent, ParticleKind, World};
use super::tick::spawn_burst;
use crate::circles_overlap;

/// Extra points for a gold pickup on top of its value
pub const GOLD_BONUS: u64 = 5;
pub const GOLD_GLOW: f32 = 1.0;
/// Ice freeze duration
pub const FREEZE_DURATION: f32 = 3.5;
pub const POWERPLAY_DURATION: f32 = 5.0;
pub const POWERPLAY_SLOWMO: f32 = 0.5;

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    NormalSmall,
    NormalMedium,
    NormalLarge,
    Gold,
    Ice,
    Powerplay,
    Dynamite,
    Dribble,
    Medkit,
}

impl PickupKind {
    pub fn radius(&self) -> f32 {
        match self {
            PickupKind::NormalSmall => 7.0,
            PickupKind::NormalMedium => 10.0,
            PickupKind::NormalLarge => 13.0,
            PickupKind::Gold => 12.0,
            PickupKind::Ice => 11.0,
            PickupKind::Powerplay => 12.0,
            PickupKind::Dynamite => 13.0,
            PickupKind::Dribble => 9.0,
            PickupKind::Medkit => 13.0,
        }
    }

    /// Score granted on collection (0 for effect-only kinds)
    pub fn value(&self) -> u64 {
        match self {
            PickupKind::NormalSmall => 1,
            PickupKind::NormalMedium => 2,
            PickupKind::NormalLarge => 3,
            PickupKind::Gold => 1,
            _ => 0,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(
            self,
            PickupKind::NormalSmall | PickupKind::NormalMedium | PickupKind::NormalLarge
        )
    }
}

/// A collectible on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub value: u64,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            radius: kind.radius(),
            value: kind.value(),
        }
    }
}

/// Collect every pickup the player touches and apply its effect
pub fn collect_pickups(world: &mut World) {
    let magnet = world.params.pickup_magnet;
    let (player_pos, player_r) = (world.player.pos, world.player.radius);
    // A dribble waits on the field until the live ball resolves
    let ball_live = world.ball.is_some();

    let (taken, kept): (Vec<Pickup>, Vec<Pickup>) = std::mem::take(&mut world.pickups)
        .into_iter()
        .partition(|p| {
            let blocked = ball_live && p.kind == PickupKind::Dribble;
            !blocked && circles_overlap(p.pos, p.radius * magnet, player_pos, player_r)
        });
    world.pickups = kept;

    for pickup in taken {
        advance_combo(world, pickup.pos);
        apply_effect(world, &pickup);
    }
}

fn advance_combo(world: &mut World, pos: Vec2) {
    let bonus = world.combo.register(world.settings.combo_window_secs);
    let count = world.combo.count;
    if bonus > 0 {
        world.add_score(bonus);
        let label = tier_label(count).unwrap_or("Combo").to_string();
        world.push_event(GameEvent::ComboTier { label, bonus, pos });
    } else {
        world.push_event(GameEvent::ComboStep { count, pos });
    }
}

fn apply_effect(world: &mut World, pickup: &Pickup) {
    let pos = pickup.pos;
    let mut points = 0;

    match pickup.kind {
        PickupKind::NormalSmall | PickupKind::NormalMedium | PickupKind::NormalLarge => {
            points = pickup.value;
            spawn_burst(world, pos, ParticleKind::Spark, 0xffcc00, 28);
        }
        PickupKind::Gold => {
            points = pickup.value + GOLD_BONUS;
            world.effects.glow = GOLD_GLOW;
            spawn_burst(world, pos, ParticleKind::Coin, 0xfbbf24, 16);
        }
        PickupKind::Ice => {
            world.effects.freeze = FREEZE_DURATION;
            spawn_burst(world, pos, ParticleKind::Spark, 0x93c5fd, 28);
            world.push_event(GameEvent::Freeze { pos });
        }
        PickupKind::Powerplay => {
            world.effects.powerplay = POWERPLAY_DURATION;
            world.effects.slowmo = POWERPLAY_SLOWMO;
            spawn_burst(world, pos, ParticleKind::Ring, 0xf472b6, 1);
            world.push_event(GameEvent::Powerplay { pos });
        }
        PickupKind::Dynamite => {
            world.effects.dynamite_suppress = world.settings.dynamite_respawn_delay_secs;
            let defenders = std::mem::take(&mut world.defenders);
            for defender in &defenders {
                spawn_burst(world, defender.pos, ParticleKind::Gib, 0xe11d48, 12);
            }
            spawn_burst(world, pos, ParticleKind::Ring, 0xf87171, 1);
            log::debug!("Dynamite cleared {} defenders", defenders.len());
            world.push_event(GameEvent::Boom {
                pos,
                cleared: defenders.len(),
            });
        }
        PickupKind::Dribble => {
            possession::take_possession(world, pos);
        }
        PickupKind::Medkit => {
            if world.is_survival() {
                world.round.lives = (world.round.lives + 1).min(world.round.max_lives);
                spawn_burst(world, pos, ParticleKind::Spark, 0x34d399, 28);
                world.push_event(GameEvent::LifeGained {
                    pos,
                    lives: world.round.lives,
                });
            }
        }
    }

    if points > 0 {
        world.add_score(points);
    }
    world.push_event(GameEvent::PickupCollected {
        kind: pickup.kind,
        pos,
        points,
    });
}
