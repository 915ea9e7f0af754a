//! Overlap tests and the player-vs-defender hit resolver
//!
//! Defender hitboxes are shrunk by the preset's forgiveness factor; goal
//! mouths are vertical gaps centered on the left and right edges.

use glam::Vec2;

use super::defender::Defender;
use super::state::{GameEvent, ParticleKind, World};
use super::tick::spawn_burst;
use crate::circles_overlap;
use crate::consts::*;

/// Invulnerability after taking a hit
pub const HIT_INVULN: f32 = 0.8;
/// How long a webbed defender stays frozen
pub const WEB_FREEZE: f32 = 5.0;
/// Score lost per hit in timed mode
pub const HIT_PENALTY: u64 = 1;

/// Outcome of a processed hit
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    pub defender_id: u32,
    /// Powerplay was active: the defender got frozen instead
    pub webbed: bool,
    pub pos: Vec2,
}

/// Circle test against a defender's forgiving hitbox
#[inline]
pub fn hitbox_overlap(defender: &Defender, hitbox_scale: f32, pos: Vec2, radius: f32) -> bool {
    circles_overlap(defender.pos, defender.radius * hitbox_scale, pos, radius)
}

/// Vertical extent (top, bottom) of the goal mouths
pub fn goal_span(field: Vec2) -> (f32, f32) {
    let mid = field.y / 2.0;
    (mid - GOAL_OPENING / 2.0, mid + GOAL_OPENING / 2.0)
}

/// True when `pos` is inside either goal mouth at its edge
pub fn in_goal_mouth(pos: Vec2, field: Vec2) -> bool {
    let (top, bottom) = goal_span(field);
    let in_gap = pos.y > top && pos.y < bottom;
    let at_edge = pos.x <= GOAL_EDGE_MARGIN || pos.x >= field.x - GOAL_EDGE_MARGIN;
    in_gap && at_edge
}

/// Resolve at most one player hit this tick
pub fn resolve_hit(world: &mut World) -> Option<HitResult> {
    if world.player.is_invulnerable() {
        return None;
    }

    let scale = world.params.hitbox_scale;
    let (pos, radius) = (world.player.pos, world.player.radius);
    let idx = world
        .defenders
        .iter()
        .position(|d| !d.is_frozen() && hitbox_overlap(d, scale, pos, radius))?;

    world.player.grant_invuln(HIT_INVULN);
    world.combo.reset();

    let defender_id = world.defenders[idx].id;
    if world.effects.powerplay > 0.0 {
        world.defenders[idx].freeze(WEB_FREEZE);
        let at = world.defenders[idx].pos;
        spawn_burst(world, at, ParticleKind::Spark, 0xa78bfa, 20);
        log::debug!("Defender {} webbed", defender_id);
        world.push_event(GameEvent::Webbed { defender_id, pos: at });
        return Some(HitResult {
            defender_id,
            webbed: true,
            pos: at,
        });
    }

    let penalty = if world.is_survival() {
        world.round.lives = world.round.lives.saturating_sub(1);
        0
    } else {
        world.deduct_score(HIT_PENALTY)
    };
    log::debug!(
        "Player hit by defender {} (lives {}, -{} pts)",
        defender_id,
        world.round.lives,
        penalty
    );
    world.push_event(GameEvent::Hit {
        pos,
        lives: world.round.lives,
        penalty,
    });

    Some(HitResult {
        defender_id,
        webbed: false,
        pos,
    })
}
