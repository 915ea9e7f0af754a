//! Bonus zones
//!
//! Two short-lived one-shot zones appear on the far half of the field when
//! the player takes possession.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, World};
use crate::circles_overlap;

pub const ZONE_RADIUS: f32 = 50.0;
pub const ZONE_LIFE: f32 = 10.0;
/// Speed zone multiplier and duration
pub const SPEED_BOOST: f32 = 1.6;
pub const SPEED_BOOST_DURATION: f32 = 3.0;
pub const INVINCIBLE_DURATION: f32 = 3.0;
/// Shot zone instant points and next-goal bonus window
pub const SHOT_ZONE_POINTS: u64 = 3;
pub const SHOT_BONUS_DURATION: f32 = 3.0;

/// Zone types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    SpeedBoost,
    Invincibility,
    ShotBonus,
}

impl ZoneKind {
    pub const ALL: [ZoneKind; 3] = [ZoneKind::SpeedBoost, ZoneKind::Invincibility, ZoneKind::ShotBonus];
}

/// A one-shot bonus area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub kind: ZoneKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds left
    pub life: f32,
    pub used: bool,
}

/// Place two zones of distinct kinds on the half away from the player
pub fn spawn_zone_pair(world: &mut World) {
    let field = world.field;
    let x_base = if world.player.pos.x < field.x / 2.0 {
        field.x * 0.76
    } else {
        field.x * 0.24
    };

    let rng = &mut world.rng;
    let skip = rng.random_range(0..ZoneKind::ALL.len());
    let mut kinds: Vec<ZoneKind> = ZoneKind::ALL
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != skip)
        .map(|(_, k)| *k)
        .collect();
    if rng.random_bool(0.5) {
        kinds.swap(0, 1);
    }

    for kind in kinds {
        let x = (x_base + rng.random_range(-80.0..80.0)).clamp(60.0, field.x - 60.0);
        let y = (field.y * 0.3 + rng.random_range(-90.0..90.0)).clamp(60.0, field.y - 60.0);
        world.zones.push(Zone {
            kind,
            pos: Vec2::new(x, y),
            radius: ZONE_RADIUS,
            life: ZONE_LIFE,
            used: false,
        });
    }
    log::debug!("Spawned zone pair near x={:.0}", x_base);
}

/// Age zones and drop expired or used ones
pub fn tick_zones(world: &mut World, dt: f32) {
    for zone in &mut world.zones {
        zone.life -= dt;
    }
    world.zones.retain(|z| z.life > 0.0 && !z.used);
}

/// Apply the first-touch effect of any zone the player is standing in
pub fn use_zones(world: &mut World) {
    let (pos, radius) = (world.player.pos, world.player.radius);
    let mut triggered = Vec::new();
    for zone in &mut world.zones {
        if !zone.used && circles_overlap(zone.pos, zone.radius, pos, radius) {
            zone.used = true;
            triggered.push((zone.kind, zone.pos));
        }
    }

    for (kind, at) in triggered {
        match kind {
            ZoneKind::SpeedBoost => world.effects.speed_boost = SPEED_BOOST_DURATION,
            ZoneKind::Invincibility => world.player.grant_invuln(INVINCIBLE_DURATION),
            ZoneKind::ShotBonus => {
                world.add_score(SHOT_ZONE_POINTS);
                world.effects.shot_bonus = SHOT_BONUS_DURATION;
            }
        }
        world.push_event(GameEvent::ZoneUsed { kind, pos: at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::GameMode;

    fn world() -> World {
        World::new(&Settings::default(), GameMode::Timed, 21).unwrap()
    }

    #[test]
    fn test_pair_is_distinct_and_opposite() {
        for seed in 0..50 {
            let mut w = World::new(&Settings::default(), GameMode::Timed, seed).unwrap();
            w.player.pos = Vec2::new(100.0, 280.0);
            spawn_zone_pair(&mut w);
            assert_eq!(w.zones.len(), 2);
            assert_ne!(w.zones[0].kind, w.zones[1].kind);
            assert!(w.zones.iter().all(|z| z.pos.x > w.field.x / 2.0));
            assert!(w.zones.iter().all(|z| z.pos.y >= 60.0 && z.pos.y <= w.field.y - 60.0));
        }

        let mut w = world();
        w.player.pos = Vec2::new(900.0, 280.0);
        spawn_zone_pair(&mut w);
        assert!(w.zones.iter().all(|z| z.pos.x < w.field.x / 2.0));
    }

    #[test]
    fn test_zones_expire() {
        let mut w = world();
        spawn_zone_pair(&mut w);
        tick_zones(&mut w, ZONE_LIFE - 0.1);
        assert_eq!(w.zones.len(), 2);
        tick_zones(&mut w, 0.2);
        assert!(w.zones.is_empty());
    }

    #[test]
    fn test_zone_is_one_shot() {
        let mut w = world();
        w.zones.push(Zone {
            kind: ZoneKind::ShotBonus,
            pos: w.player.pos,
            radius: ZONE_RADIUS,
            life: ZONE_LIFE,
            used: false,
        });
        use_zones(&mut w);
        use_zones(&mut w);
        assert_eq!(w.round.score, SHOT_ZONE_POINTS);
        assert!(w.effects.shot_bonus > 0.0);
        tick_zones(&mut w, 0.01);
        assert!(w.zones.is_empty());
    }

    #[test]
    fn test_speed_and_invincibility_zones() {
        let mut w = world();
        for kind in [ZoneKind::SpeedBoost, ZoneKind::Invincibility] {
            w.zones.push(Zone {
                kind,
                pos: w.player.pos,
                radius: ZONE_RADIUS,
                life: ZONE_LIFE,
                used: false,
            });
        }
        use_zones(&mut w);
        assert_eq!(w.effects.speed_boost, SPEED_BOOST_DURATION);
        assert_eq!(w.player.invuln, INVINCIBLE_DURATION);
    }
}
