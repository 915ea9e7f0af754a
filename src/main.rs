//! Reaction Rush entry point
//!
//! Native builds run a headless bot round and print the summary as JSON.
//! The browser build is driven through `platform::web::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;
    use reaction_rush::consts::*;
    use reaction_rush::sim::{GameMode, Intent, Round, RoundPhase, TickInput, WorldSnapshot};
    use reaction_rush::{ConfigError, HighScores, Settings, SummarySink};

    /// Hard stop so a survival bot that never dies still terminates (10 minutes)
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    /// Defenders closer than this are dodged instead of chasing pickups
    const DANGER_RADIUS: f32 = 70.0;

    struct Args {
        settings_path: Option<String>,
        mode: GameMode,
    }

    fn parse_args() -> Args {
        let mut args = Args {
            settings_path: None,
            mode: GameMode::Timed,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--mode" => {
                    if let Some(mode) = iter.next() {
                        args.mode = reaction_rush::platform::parse_mode(&mode);
                    }
                }
                "--survival" => args.mode = GameMode::Survival,
                _ => args.settings_path = Some(arg),
            }
        }
        args
    }

    fn now_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }

    /// Greedy bot: flee close defenders, carry the ball to the far goal,
    /// otherwise chase the nearest pickup
    fn bot_intent(snap: &WorldSnapshot) -> Intent {
        let me = snap.player.pos;

        let threat = snap
            .defenders
            .iter()
            .filter(|d| d.frozen <= 0.0)
            .map(|d| d.pos)
            .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)));
        if let Some(threat) = threat.filter(|t| t.distance(me) < DANGER_RADIUS) {
            let away = (me - threat).normalize_or_zero();
            return Intent {
                move_x: away.x,
                move_y: away.y,
                dash_requested: true,
                shoot_requested: false,
            };
        }

        if let Some(ball) = &snap.ball {
            let goal_x = if me.x < snap.field.x / 2.0 { snap.field.x } else { 0.0 };
            let goal = Vec2::new(goal_x, snap.field.y / 2.0);
            let dir = (goal - me).normalize_or_zero();
            let shoot = ball.is_carried() && (goal.x - me.x).abs() < snap.field.x * 0.35;
            return Intent {
                move_x: dir.x,
                move_y: dir.y,
                dash_requested: false,
                shoot_requested: shoot,
            };
        }

        let target = snap
            .pickups
            .iter()
            .map(|p| p.pos)
            .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)));
        let dir = target.map(|t| (t - me).normalize_or_zero()).unwrap_or(Vec2::ZERO);
        Intent {
            move_x: dir.x,
            move_y: dir.y,
            ..Default::default()
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let args = parse_args();
        let mut settings = match &args.settings_path {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if settings.seed.is_none() {
            settings.seed = Some(now_ms() as u64);
        }

        log::info!("Reaction Rush (native) starting, mode {}", args.mode.as_str());
        let mut round = Round::new(settings);
        round.start(args.mode)?;

        let mut scores = HighScores::new();
        let mut snapshot = round.snapshot();
        let mut frames = 0;
        while round.phase() == RoundPhase::Running && frames < MAX_FRAMES {
            let intent = snapshot.as_ref().map(bot_intent).unwrap_or_default();
            snapshot = round.tick(&TickInput {
                elapsed_ms: FRAME_MS,
                intent,
                mode: args.mode,
            });
            frames += 1;
        }
        if round.phase() == RoundPhase::Running {
            log::info!("Frame limit reached after {} frames", frames);
        }

        match round.take_summary() {
            Some(summary) => {
                scores.record(&summary, now_ms());
                println!("{}", serde_json::to_string_pretty(&summary)?);
                match scores.top_for_mode(summary.mode).next() {
                    Some(top) => println!(
                        "Leaderboard ({}): #1 {} pts, best streak {}",
                        summary.mode.as_str(),
                        top.score,
                        top.best_streak
                    ),
                    None => println!("Leaderboard ({}): no qualifying score", summary.mode.as_str()),
                }
            }
            None => {
                if let Some(snap) = &snapshot {
                    println!("Round still running: score {}", snap.round.score);
                }
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = headless::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser drives the game through WebGame; this just satisfies the compiler
}
