//! Deterministic game simulation
//!
//! A pure fixed-timestep core with no rendering or platform dependencies:
//! the host feeds one [`TickInput`] per tick into [`tick`] and reads the
//! resulting [`GameState`]. Two runs with the same seed and the same input
//! sequence produce identical states.
//!
//! Submodules:
//! - `state`: entity models and the top-level [`GameState`]
//! - `input`: input accumulation and per-tick snapshots
//! - `progression`: ability catalog, rarity-weighted unlocks, timed buffs
//! - `abilities`: activation gating, cooldowns, deferred stun pulses
//! - `collision`: contact resolution and the collision policy
//! - `tick`: per-tick orchestration, spawning, and the wave machine
//! - `debug`: development command port

pub mod abilities;
pub mod collision;
pub mod debug;
pub mod input;
pub mod progression;
pub mod state;
pub mod tick;

pub use abilities::AbilityEngine;
pub use collision::{CollisionOutcome, CollisionPolicy};
pub use debug::DebugCommand;
pub use input::{Button, InputState, TickInput, Triggers};
pub use progression::{
    AbilityChoice, AbilityKind, AbilityOption, AbilityStats, OptionAction, Progression, stats_for,
};
pub use state::{
    BurstKind, DangerLevel, Enemy, EnemyKind, GamePhase, GameState, Particle, Player, PowerUp,
    Projectile,
};
pub use tick::{TickOutcome, tick};
