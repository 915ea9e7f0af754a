//! Ball possession and goals
//!
//! absent -> carried -> shot -> absent. The ball talks to the rest of the
//! world only through these transitions: collect, tackle, shoot, goal and
//! expiry. A tackled or expired ball drops back as a dribble pickup.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{hitbox_overlap, in_goal_mouth};
use super::pickup::PickupKind;
use super::state::{GameEvent, ParticleKind, World};
use super::tick::spawn_burst;
use super::zone;
use crate::consts::*;

pub const BALL_RADIUS: f32 = 7.0;
/// Distance the carried ball leads the player on each axis
pub const CARRY_LEAD: f32 = 10.0;
/// Shot speed (px/s)
pub const SHOT_SPEED: f32 = 700.0;
/// Shot flight time (s)
pub const SHOT_LIFE: f32 = 2.2;
/// Exponential speed decay of a shot (1/s)
pub const SHOT_DECAY: f32 = 1.0;

/// Ball state while it exists
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Pinned next to the player
    Carried,
    /// Flying on its own
    Shot { vel: Vec2, life: f32 },
}

/// The single possessable ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarriedBall {
    pub pos: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl CarriedBall {
    pub fn is_carried(&self) -> bool {
        self.state == BallState::Carried
    }

    pub fn is_shot(&self) -> bool {
        matches!(self.state, BallState::Shot { .. })
    }
}

/// Enter possession from a collected dribble pickup.
/// Returns false when a ball already exists (the pickup is simply consumed).
pub fn take_possession(world: &mut World, at: Vec2) -> bool {
    if world.ball.is_some() {
        log::warn!("Dribble collected while a ball is live; no second ball created");
        return false;
    }
    world.ball = Some(CarriedBall {
        pos: at,
        radius: BALL_RADIUS,
        state: BallState::Carried,
    });
    log::debug!("Possession at ({:.0}, {:.0})", at.x, at.y);
    world.push_event(GameEvent::Possession { pos: at });

    if world.zones.is_empty() {
        zone::spawn_zone_pair(world);
    }
    true
}

/// Direction of a shot from the player's movement, falling back to "toward the far goal"
pub fn shot_direction(player_pos: Vec2, player_vel: Vec2, field: Vec2) -> Vec2 {
    if player_vel != Vec2::ZERO {
        return player_vel.normalize_or_zero();
    }
    if player_pos.x < field.x / 2.0 {
        Vec2::X
    } else {
        Vec2::NEG_X
    }
}

/// carried -> shot
pub fn shoot(world: &mut World) -> bool {
    let Some(ball) = world.ball.as_mut() else {
        return false;
    };
    if !ball.is_carried() {
        return false;
    }
    let dir = shot_direction(world.player.pos, world.player.vel, world.field);
    ball.pos = world.player.pos;
    ball.state = BallState::Shot {
        vel: dir * SHOT_SPEED,
        life: SHOT_LIFE,
    };
    let pos = ball.pos;
    log::debug!("Shot toward ({:.2}, {:.2})", dir.x, dir.y);
    world.push_event(GameEvent::Shot { pos });
    true
}

/// Advance the ball: pin/tackle/goal when carried, fly/goal/expire when shot
pub fn update_ball(world: &mut World, dt: f32) {
    let Some(mut ball) = world.ball.take() else {
        return;
    };

    match ball.state {
        BallState::Carried => {
            let p = world.player.clone();
            let lead = Vec2::new(lead_sign(p.vel.x), lead_sign(p.vel.y)) * CARRY_LEAD;
            ball.pos = p.pos + lead;

            if !p.is_invulnerable() && world.effects.powerplay <= 0.0 {
                let scale = world.params.hitbox_scale;
                let tackled = world
                    .defenders
                    .iter()
                    .any(|d| hitbox_overlap(d, scale, p.pos, p.radius));
                if tackled {
                    log::debug!("Tackled; ball dropped");
                    world.spawn_pickup(PickupKind::Dribble, ball.pos);
                    world.push_event(GameEvent::Tackled { pos: p.pos });
                    return;
                }
            }

            if in_goal_mouth(p.pos, world.field) {
                score_goal(world, p.pos);
                return;
            }
        }
        BallState::Shot { mut vel, mut life } => {
            life -= dt;
            ball.pos += vel * dt;
            vel *= (-SHOT_DECAY * dt).exp();

            if in_goal_mouth(ball.pos, world.field) {
                score_goal(world, ball.pos);
                return;
            }
            bounce_off_walls(&mut ball.pos, &mut vel, ball.radius, world.field);

            if life <= 0.0 {
                world.spawn_pickup(PickupKind::Dribble, ball.pos);
                world.push_event(GameEvent::ShotExpired { pos: ball.pos });
                return;
            }
            ball.state = BallState::Shot { vel, life };
        }
    }

    world.ball = Some(ball);
}

fn lead_sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

fn score_goal(world: &mut World, pos: Vec2) {
    let bonus = if world.effects.shot_bonus > 0.0 {
        GOAL_SHOT_BONUS
    } else {
        0
    };
    let points = GOAL_SCORE + bonus;
    world.add_score(points);
    world.effects.shot_bonus = 0.0;
    world.effects.goal_flash = 1.2;
    spawn_burst(world, pos, ParticleKind::Confetti, 0x22c55e, 50);
    log::debug!("Goal! +{}", points);
    world.push_event(GameEvent::Goal { pos, points });
}

/// Keep a shot inside the field, reflecting off walls outside the goal mouths
fn bounce_off_walls(pos: &mut Vec2, vel: &mut Vec2, radius: f32, field: Vec2) {
    if pos.y < radius {
        pos.y = radius;
        vel.y = vel.y.abs();
    } else if pos.y > field.y - radius {
        pos.y = field.y - radius;
        vel.y = -vel.y.abs();
    }
    if pos.x < radius {
        pos.x = radius;
        vel.x = vel.x.abs();
    } else if pos.x > field.x - radius {
        pos.x = field.x - radius;
        vel.x = -vel.x.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::GameMode;

    const PLAYER_START: Vec2 = Vec2::new(300.0, 280.0);

    fn world() -> World {
        let mut world = World::new(&Settings::default(), GameMode::Timed, 5).unwrap();
        world.defenders.clear();
        world.player.pos = PLAYER_START;
        world
    }

    #[test]
    fn test_only_one_ball() {
        let mut w = world();
        assert!(take_possession(&mut w, PLAYER_START));
        assert!(!take_possession(&mut w, PLAYER_START));
        assert!(w.ball.is_some());
    }

    #[test]
    fn test_shoot_stationary_uses_fallback() {
        let mut w = world();
        take_possession(&mut w, PLAYER_START);
        w.player.vel = Vec2::ZERO;
        assert!(shoot(&mut w));
        match w.ball.as_ref().map(|b| b.state) {
            Some(BallState::Shot { vel, .. }) => {
                assert!(vel.length() > 0.0);
                // Left half shoots right
                assert!(vel.x > 0.0 && vel.y == 0.0);
            }
            other => panic!("expected shot, got {:?}", other),
        }
    }

    #[test]
    fn test_shot_follows_movement() {
        let dir = shot_direction(Vec2::new(100.0, 100.0), Vec2::new(0.0, -50.0), Vec2::new(960.0, 560.0));
        assert_eq!(dir, Vec2::NEG_Y);
        let fallback = shot_direction(Vec2::new(800.0, 100.0), Vec2::ZERO, Vec2::new(960.0, 560.0));
        assert_eq!(fallback, Vec2::NEG_X);
    }

    #[test]
    fn test_shoot_without_ball_is_noop() {
        let mut w = world();
        assert!(!shoot(&mut w));
        assert!(w.ball.is_none());
    }

    #[test]
    fn test_tackle_drops_ball() {
        let mut w = world();
        take_possession(&mut w, PLAYER_START);
        let pos = w.player.pos;
        w.spawn_defender(100.0);
        w.defenders[0].pos = pos;
        update_ball(&mut w, 1.0 / 60.0);
        assert!(w.ball.is_none());
        assert!(w.pickups.iter().any(|p| p.kind == PickupKind::Dribble));
    }

    #[test]
    fn test_no_tackle_during_powerplay() {
        let mut w = world();
        take_possession(&mut w, PLAYER_START);
        let pos = w.player.pos;
        w.spawn_defender(100.0);
        w.defenders[0].pos = pos;
        w.effects.powerplay = 2.0;
        update_ball(&mut w, 1.0 / 60.0);
        assert!(w.ball.as_ref().is_some_and(|b| b.is_carried()));
    }

    #[test]
    fn test_carried_goal() {
        let mut w = world();
        take_possession(&mut w, PLAYER_START);
        w.player.pos = Vec2::new(w.player.radius, w.field.y / 2.0);
        update_ball(&mut w, 1.0 / 60.0);
        assert!(w.ball.is_none());
        assert_eq!(w.round.score, GOAL_SCORE);
        assert!(w.pickups.is_empty());
    }

    #[test]
    fn test_live_zones_are_not_doubled() {
        let mut w = world();
        take_possession(&mut w, PLAYER_START);
        assert_eq!(w.zones.len(), 2);

        // Score, then pick the ball up again while the pair is still alive
        w.player.pos = Vec2::new(w.player.radius, w.field.y / 2.0);
        update_ball(&mut w, 1.0 / 60.0);
        assert!(w.ball.is_none());
        assert!(take_possession(&mut w, PLAYER_START));
        assert_eq!(w.zones.len(), 2);
    }

    #[test]
    fn test_shot_goal_with_bonus() {
        let mut w = world();
        take_possession(&mut w, PLAYER_START);
        w.effects.shot_bonus = 3.0;
        w.player.pos = Vec2::new(w.field.x - 120.0, w.field.y / 2.0);
        w.player.vel = Vec2::new(50.0, 0.0);
        shoot(&mut w);
        for _ in 0..60 {
            update_ball(&mut w, 1.0 / 60.0);
        }
        assert!(w.ball.is_none());
        assert_eq!(w.round.score, GOAL_SCORE + GOAL_SHOT_BONUS);
        assert_eq!(w.effects.shot_bonus, 0.0);
    }

    #[test]
    fn test_shot_expiry_drops_pickup() {
        let mut w = world();
        take_possession(&mut w, PLAYER_START);
        // Straight up: bounces on the top wall, never reaches a goal mouth
        w.player.vel = Vec2::new(0.0, -10.0);
        shoot(&mut w);
        for _ in 0..200 {
            update_ball(&mut w, 1.0 / 60.0);
            if let Some(ball) = &w.ball {
                assert!(ball.pos.y >= 0.0 && ball.pos.y <= w.field.y);
            }
        }
        assert!(w.ball.is_none());
        assert_eq!(w.round.score, 0);
        assert_eq!(w.pickups.iter().filter(|p| p.kind == PickupKind::Dribble).count(), 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Collect,
            Shoot,
            Tick,
            Teleport(f32, f32),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::Collect),
                Just(Op::Shoot),
                Just(Op::Tick),
                (0.0f32..960.0, 0.0f32..560.0).prop_map(|(x, y)| Op::Teleport(x, y)),
            ]
        }

        proptest! {
            /// Property: no sequence of collect/shoot/goal/expiry ever yields two balls
            #[test]
            fn prop_at_most_one_ball(ops in prop::collection::vec(op(), 1..200)) {
                let mut w = world();
                for op in ops {
                    match op {
                        Op::Collect => { take_possession(&mut w, PLAYER_START); }
                        Op::Shoot => { shoot(&mut w); }
                        Op::Tick => update_ball(&mut w, 0.1),
                        Op::Teleport(x, y) => {
                            w.player.pos = Vec2::new(x, y);
                            w.player.clamp_to_field(w.field);
                        }
                    }
                    prop_assert!(w.ball.iter().count() <= 1);
                    if let Some(ball) = &w.ball {
                        prop_assert!(ball.pos.is_finite());
                    }
                }
            }
        }
    }
}
