//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped elapsed-time steps only
//! - Seeded RNG only, owned by the `World`
//! - Stable iteration order (insertion order of entities)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combo;
pub mod defender;
pub mod difficulty;
pub mod input;
pub mod pickup;
pub mod player;
pub mod possession;
pub mod round;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod zone;

pub use collision::{HitResult, in_goal_mouth, resolve_hit};
pub use combo::{COMBO_TIERS, ComboTracker};
pub use defender::{Behavior, BehaviorKind, Defender};
pub use difficulty::{Difficulty, difficulty};
pub use input::{InputAggregator, Intent, RawInput};
pub use pickup::{Pickup, PickupKind};
pub use player::{DashState, Player};
pub use possession::{BallState, CarriedBall};
pub use round::{Round, RoundPhase, RoundSummary};
pub use snapshot::{RoundView, WorldSnapshot};
pub use state::{Effects, GameEvent, GameMode, Particle, ParticleKind, World};
pub use tick::{TickInput, tick};
pub use zone::{Zone, ZoneKind};
