//! Round lifecycle
//!
//! `Idle -> Running <-> Paused -> Ended`. The round owns the only `World`;
//! hosts drive it with [`Round::tick`] and get read-only snapshots back.

use serde::{Deserialize, Serialize};

use super::snapshot::{WorldSnapshot, capture};
use super::state::{GameEvent, GameMode, World};
use super::tick::{TickInput, tick};
use crate::consts::MAX_STEP_MS;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    #[default]
    Idle,
    Running,
    Paused,
    Ended,
}

/// Terminal result handed to persistence collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub score: u64,
    pub best_streak: u32,
    pub mode: GameMode,
    pub duration_secs: f32,
}

/// Clamp a host-supplied elapsed time to a usable step in seconds
pub fn step_secs(elapsed_ms: f32) -> f32 {
    if elapsed_ms.is_nan() {
        log::warn!("NaN elapsed time; treating as zero");
        return 0.0;
    }
    if elapsed_ms <= 0.0 {
        return 0.0;
    }
    elapsed_ms.min(MAX_STEP_MS) / 1000.0
}

/// Owner of the world and the round state machine
#[derive(Debug)]
pub struct Round {
    settings: Settings,
    world: Option<World>,
    phase: RoundPhase,
    /// Best score across rounds this session
    best_score: u64,
    summary: Option<RoundSummary>,
    rounds_started: u64,
}

impl Round {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            world: None,
            phase: RoundPhase::Idle,
            best_score: 0,
            summary: None,
            rounds_started: 0,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace settings; takes effect on the next start/reset
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Begin a round unless one is already in progress
    pub fn start(&mut self, mode: GameMode) -> Result<(), ConfigError> {
        match self.phase {
            RoundPhase::Running | RoundPhase::Paused => Ok(()),
            RoundPhase::Idle | RoundPhase::Ended => self.reset(mode),
        }
    }

    /// Throw away the current round and begin a fresh one
    pub fn reset(&mut self, mode: GameMode) -> Result<(), ConfigError> {
        let seed = self.next_seed();
        let world = World::new(&self.settings, mode, seed)?;
        log::info!(
            "Round started: mode={} preset={} seed={}",
            mode.as_str(),
            self.settings.preset.as_str(),
            seed
        );
        self.world = Some(world);
        self.phase = RoundPhase::Running;
        self.summary = None;
        self.rounds_started += 1;
        Ok(())
    }

    fn next_seed(&self) -> u64 {
        let base = self.settings.seed.unwrap_or(0x5eed_0f_4ea5);
        base.wrapping_add(self.rounds_started.wrapping_mul(0x9e37_79b9_7f4a_7c15))
    }

    pub fn pause(&mut self) {
        if self.phase == RoundPhase::Running {
            self.phase = RoundPhase::Paused;
            log::info!("Round paused");
        }
    }

    pub fn resume(&mut self) {
        if self.phase == RoundPhase::Paused {
            self.phase = RoundPhase::Running;
            log::info!("Round resumed");
        }
    }

    /// Advance one step. Returns a snapshot whenever a world exists.
    pub fn tick(&mut self, input: &TickInput) -> Option<WorldSnapshot> {
        let advanced = self.phase == RoundPhase::Running;
        if advanced {
            self.advance(input);
        }
        let mut snapshot = self.snapshot()?;
        if !advanced {
            // Events belong to the tick that raised them
            snapshot.events.clear();
        }
        Some(snapshot)
    }

    fn advance(&mut self, input: &TickInput) {
        let Some(world) = self.world.as_mut() else {
            return;
        };
        if input.mode != world.round.mode {
            log::warn!(
                "Tick requested mode {} but round is {}; ignoring",
                input.mode.as_str(),
                world.round.mode.as_str()
            );
        }

        let dt = step_secs(input.elapsed_ms);
        let intent = input.intent.sanitized();
        if let Err(err) = tick(world, &intent, dt) {
            log::error!("Simulation error, ending round: {}", err);
            self.end();
            return;
        }

        let over = if world.is_survival() {
            world.round.lives == 0
        } else {
            world.round.time_remaining <= 0.0
        };
        if over {
            self.end();
        }
    }

    /// Transition to `Ended` exactly once
    fn end(&mut self) {
        if self.phase == RoundPhase::Ended {
            return;
        }
        let Some(world) = self.world.as_mut() else {
            return;
        };
        let score = world.round.score;
        self.best_score = self.best_score.max(score);
        self.summary = Some(RoundSummary {
            score,
            best_streak: world.combo.best,
            mode: world.round.mode,
            duration_secs: world.round.elapsed,
        });
        world.push_event(GameEvent::RoundEnded { score });
        self.phase = RoundPhase::Ended;
        log::info!("Round ended: score={} best={}", score, self.best_score);
    }

    /// Take the terminal summary (at most once per round)
    pub fn take_summary(&mut self) -> Option<RoundSummary> {
        self.summary.take()
    }

    /// Read-only copy of the current world
    pub fn snapshot(&self) -> Option<WorldSnapshot> {
        self.world
            .as_ref()
            .map(|w| capture(w, self.phase, self.best_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::input::Intent;
    use glam::Vec2;

    fn settings() -> Settings {
        Settings {
            seed: Some(1234),
            ..Settings::default()
        }
    }

    fn input(mode: GameMode) -> TickInput {
        TickInput {
            elapsed_ms: FRAME_MS,
            intent: Intent::default(),
            mode,
        }
    }

    #[test]
    fn test_step_clamping() {
        assert_eq!(step_secs(f32::NAN), 0.0);
        assert_eq!(step_secs(-5.0), 0.0);
        assert_eq!(step_secs(5000.0), MAX_STEP_MS / 1000.0);
        assert_eq!(step_secs(f32::INFINITY), MAX_STEP_MS / 1000.0);
        assert!((step_secs(16.0) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut round = Round::new(settings());
        assert!(round.tick(&input(GameMode::Timed)).is_none());
        assert_eq!(round.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut round = Round::new(settings());
        round.start(GameMode::Timed).unwrap();
        round.tick(&input(GameMode::Timed));
        let ticks = round.world().unwrap().time_ticks;
        round.start(GameMode::Timed).unwrap();
        assert_eq!(round.world().unwrap().time_ticks, ticks);
    }

    #[test]
    fn test_invalid_settings_do_not_start() {
        let mut round = Round::new(Settings {
            round_duration_secs: 0.0,
            ..settings()
        });
        assert!(round.start(GameMode::Timed).is_err());
        assert_eq!(round.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_timed_round_ends_exactly_once() {
        let mut round = Round::new(Settings {
            round_duration_secs: 1.0,
            ..settings()
        });
        round.start(GameMode::Timed).unwrap();

        let mut ended = 0;
        for _ in 0..200 {
            let snap = round.tick(&input(GameMode::Timed)).unwrap();
            ended += snap
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
                .count();
        }
        assert_eq!(round.phase(), RoundPhase::Ended);
        assert_eq!(ended, 1);

        let summary = round.take_summary().unwrap();
        assert_eq!(summary.mode, GameMode::Timed);
        assert!(round.take_summary().is_none());
        assert_eq!(round.best_score(), summary.score);
    }

    #[test]
    fn test_survival_round_ends_when_lives_run_out() {
        let mut round = Round::new(settings());
        round.start(GameMode::Survival).unwrap();

        let mut ended = 0;
        for _ in 0..20 {
            if let Some(world) = round.world.as_mut() {
                // Park a defender on the player every tick
                world.player.invuln = 0.0;
                let pos = world.player.pos;
                world.defenders[0].frozen = 0.0;
                world.defenders[0].pos = pos + Vec2::new(1.0, 0.0);
            }
            let snap = round.tick(&input(GameMode::Survival)).unwrap();
            ended += snap
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
                .count();
        }
        assert_eq!(round.phase(), RoundPhase::Ended);
        assert_eq!(ended, 1);
        assert_eq!(round.world().unwrap().round.lives, 0);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut round = Round::new(settings());
        round.start(GameMode::Timed).unwrap();
        round.tick(&input(GameMode::Timed));
        round.pause();
        round.pause();
        assert_eq!(round.phase(), RoundPhase::Paused);

        let before = round.snapshot().unwrap();
        for _ in 0..50 {
            round.tick(&input(GameMode::Timed));
        }
        let after = round.snapshot().unwrap();
        assert_eq!(before.round.time_remaining, after.round.time_remaining);
        assert_eq!(before.player.pos, after.player.pos);
        assert_eq!(before.tick, after.tick);

        round.resume();
        round.resume();
        assert_eq!(round.phase(), RoundPhase::Running);
        round.tick(&input(GameMode::Timed));
        assert!(round.snapshot().unwrap().tick > before.tick);
    }

    #[test]
    fn test_reset_reinitializes_but_keeps_best() {
        let mut round = Round::new(Settings {
            round_duration_secs: 0.5,
            ..settings()
        });
        round.start(GameMode::Timed).unwrap();
        if let Some(world) = round.world.as_mut() {
            world.add_score(42);
        }
        for _ in 0..60 {
            round.tick(&input(GameMode::Timed));
        }
        assert_eq!(round.phase(), RoundPhase::Ended);
        let best = round.best_score();
        assert!(best >= 41);

        round.reset(GameMode::Survival).unwrap();
        let snap = round.snapshot().unwrap();
        assert_eq!(round.phase(), RoundPhase::Running);
        assert_eq!(snap.round.score, 0);
        assert_eq!(snap.round.lives, MAX_LIVES);
        assert!(snap.pickups.is_empty() && snap.zones.is_empty() && snap.ball.is_none());
        assert_eq!(snap.combo.count, 0);
        assert_eq!(round.best_score(), best);
    }

    #[test]
    fn test_sim_error_force_ends_round() {
        let mut round = Round::new(settings());
        round.start(GameMode::Survival).unwrap();
        if let Some(world) = round.world.as_mut() {
            world.player.pos = Vec2::new(f32::NAN, 10.0);
        }
        round.tick(&input(GameMode::Survival));
        assert_eq!(round.phase(), RoundPhase::Ended);
        assert!(round.take_summary().is_some());
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut round = Round::new(settings());
        round.start(GameMode::Timed).unwrap();
        let mut snap = round.tick(&input(GameMode::Timed)).unwrap();
        snap.round.score = 999;
        snap.defenders.clear();
        let fresh = round.snapshot().unwrap();
        assert_eq!(fresh.round.score, 0);
        assert!(!fresh.defenders.is_empty());
    }
}
