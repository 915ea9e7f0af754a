//! World state and core simulation types
//!
//! The `World` is the single mutable aggregate every resolver works on.
//! Only the round manager owns one; renderers get snapshots.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboTracker;
use super::defender::Defender;
use super::pickup::{Pickup, PickupKind};
use super::player::Player;
use super::possession::CarriedBall;
use super::spawn::SpawnDirector;
use super::zone::{Zone, ZoneKind};
use crate::error::ConfigError;
use crate::settings::{PresetParams, Settings};

/// Round flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Score as much as possible before the clock runs out
    #[default]
    Timed,
    /// Play until lives run out
    Survival,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Timed => "timed",
            GameMode::Survival => "survival",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "timed" => Some(GameMode::Timed),
            "survival" => Some(GameMode::Survival),
            _ => None,
        }
    }
}

/// Global effect timers (seconds remaining, 0 = inactive)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    /// Ice: defenders hold position
    pub freeze: f32,
    /// Powerplay: hits web defenders instead of costing the player
    pub powerplay: f32,
    /// Brief slow motion after a powerplay pickup
    pub slowmo: f32,
    /// No defender respawns after a dynamite clear
    pub dynamite_suppress: f32,
    /// Cosmetic glow after a gold pickup
    pub glow: f32,
    /// Speed zone boost
    pub speed_boost: f32,
    /// Shot zone: next goal pays extra
    pub shot_bonus: f32,
    /// Cosmetic goal celebration
    pub goal_flash: f32,
}

impl Effects {
    pub fn decay(&mut self, dt: f32) {
        for timer in [
            &mut self.freeze,
            &mut self.powerplay,
            &mut self.slowmo,
            &mut self.dynamite_suppress,
            &mut self.glow,
            &mut self.speed_boost,
            &mut self.shot_bonus,
            &mut self.goal_flash,
        ] {
            *timer = (*timer - dt).max(0.0);
        }
    }
}

/// Something worth telling the renderer, audio or haptics about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PickupCollected { kind: PickupKind, pos: Vec2, points: u64 },
    ComboStep { count: u32, pos: Vec2 },
    ComboTier { label: String, bonus: u64, pos: Vec2 },
    ComboLost,
    Dash,
    Freeze { pos: Vec2 },
    Powerplay { pos: Vec2 },
    Boom { pos: Vec2, cleared: usize },
    LifeGained { pos: Vec2, lives: u8 },
    Possession { pos: Vec2 },
    Shot { pos: Vec2 },
    Tackled { pos: Vec2 },
    ShotExpired { pos: Vec2 },
    Goal { pos: Vec2, points: u64 },
    ZoneUsed { kind: ZoneKind, pos: Vec2 },
    Webbed { defender_id: u32, pos: Vec2 },
    Hit { pos: Vec2, lives: u8, penalty: u64 },
    RoundEnded { score: u64 },
}

/// Cosmetic particle flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    Coin,
    Gib,
    Confetti,
    Ring,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Score, clock and lives for the current round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub mode: GameMode,
    pub score: u64,
    /// Highest score reached this round (drives difficulty)
    pub peak_score: u64,
    pub lives: u8,
    pub max_lives: u8,
    /// Seconds left in timed mode
    pub time_remaining: f32,
    /// Seconds played
    pub elapsed: f32,
}

/// Complete simulation state for one round
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub params: PresetParams,
    /// Field width/height
    pub field: Vec2,
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub round: RoundState,
    pub player: Player,
    pub defenders: Vec<Defender>,
    pub pickups: Vec<Pickup>,
    pub zones: Vec<Zone>,
    /// At most one ball exists; `None` is the absent state
    pub ball: Option<CarriedBall>,
    pub combo: ComboTracker,
    pub spawner: SpawnDirector,
    pub effects: Effects,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    next_id: u32,
}

impl World {
    /// Fresh round state: player on the left, starting defenders, empty field
    pub fn new(settings: &Settings, mode: GameMode, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;

        let field = Vec2::new(settings.field_width, settings.field_height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawner = SpawnDirector::new(settings, &mut rng);

        let mut world = Self {
            settings: settings.clone(),
            params: settings.params(),
            field,
            seed,
            rng,
            time_ticks: 0,
            round: RoundState {
                mode,
                score: 0,
                peak_score: 0,
                lives: settings.max_lives,
                max_lives: settings.max_lives,
                time_remaining: settings.round_duration_secs,
                elapsed: 0.0,
            },
            player: Player::new(Vec2::new(field.x * 0.2, field.y * 0.5)),
            defenders: Vec::new(),
            pickups: Vec::new(),
            zones: Vec::new(),
            ball: None,
            combo: ComboTracker::default(),
            spawner,
            effects: Effects::default(),
            events: Vec::new(),
            particles: Vec::new(),
            next_id: 1,
        };

        for _ in 0..settings.starting_defenders {
            world.spawn_defender(world.params.base_speed);
        }

        Ok(world)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add one defender away from the player
    pub fn spawn_defender(&mut self, base_speed: f32) {
        let id = self.next_entity_id();
        let defender = Defender::spawn(id, self.player.pos, self.field, base_speed, &mut self.rng);
        log::debug!("Spawned defender {} ({:?})", id, defender.behavior.kind());
        self.defenders.push(defender);
    }

    pub fn spawn_pickup(&mut self, kind: PickupKind, pos: Vec2) {
        let id = self.next_entity_id();
        self.pickups.push(Pickup::new(id, kind, pos));
    }

    pub fn add_score(&mut self, points: u64) {
        self.round.score = self.round.score.saturating_add(points);
        self.round.peak_score = self.round.peak_score.max(self.round.score);
    }

    /// Subtract points, never going below zero
    pub fn deduct_score(&mut self, points: u64) -> u64 {
        let taken = points.min(self.round.score);
        self.round.score -= taken;
        taken
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn is_survival(&self) -> bool {
        self.round.mode == GameMode::Survival
    }
}
