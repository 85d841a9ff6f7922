//! Last Line - a top-down arena survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, abilities, waves, collisions)
//! - `hud`: Per-tick UI state snapshot for an external display layer
//! - `tuning`: Data-driven game balance

pub mod hud;
pub mod sim;
pub mod tuning;

pub use hud::{AbilityStatus, HudSnapshot};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const TICK_MS: u64 = 16;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 400.0;
    pub const ARENA_HEIGHT: f32 = 400.0;
    /// How far past the arena edge projectiles live before pruning
    pub const OFFSCREEN_MARGIN: f32 = 10.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_MAX_ENERGY: f32 = 100.0;
    /// Passive energy drain per tick
    pub const ENERGY_DRAIN_RATE: f32 = 0.05;
    /// Hitbox is deliberately smaller than the visual size
    pub const PLAYER_HITBOX_SCALE: f32 = 0.6;
    /// Post-hit grace window
    pub const INVULNERABILITY_MS: u64 = 1000;
    /// Energy lost per unshielded enemy or projectile contact
    pub const CONTACT_PENALTY: f32 = 15.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 12.0;
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    pub const ENEMY_MAX_SPEED: f32 = 3.0;
    pub const ENEMY_SPEED_INCREMENT: f32 = 0.2;
    pub const ENEMY_HITBOX_SCALE: f32 = 0.7;
    /// Spawn interval at wave 1, and its floor as waves escalate
    pub const INITIAL_SPAWN_INTERVAL_MS: u64 = 1000;
    pub const MIN_SPAWN_INTERVAL_MS: u64 = 300;
    pub const SPAWN_INTERVAL_DECREMENT_MS: u64 = 50;

    /// Wave defaults
    pub const INITIAL_WAVE_QUOTA: u32 = 5;
    pub const WAVE_QUOTA_INCREMENT: u32 = 2;
    pub const MAX_WAVE_QUOTA: u32 = 20;
    pub const WAVE_DURATION_MS: u64 = 30_000;
    /// Flat energy refund on wave advance (catch-up mechanism)
    pub const WAVE_ENERGY_BONUS: f32 = 20.0;

    /// Power-up defaults
    pub const POWERUP_SPAWN_INTERVAL_MS: u64 = 8000;
    pub const POWERUP_SIZE: f32 = 16.0;
    pub const POWERUP_ENERGY_BONUS: f32 = 30.0;
    pub const POWERUP_COLLECTION_SCALE: f32 = 1.2;
    /// Power-ups spawn at least this far from the player
    pub const POWERUP_SAFE_DISTANCE: f32 = 80.0;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 2.0;
    pub const PROJECTILE_SIZE: f32 = 4.0;
    pub const PROJECTILE_HITBOX_SCALE: f32 = 0.6;

    /// Particle friction per tick
    pub const PARTICLE_FRICTION: f32 = 0.98;
    /// Particle life lost per tick
    pub const PARTICLE_DECAY: f32 = 0.02;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Normalize a vector, returning zero for zero input
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_symmetry() {
        let a = Vec2::new(12.0, -3.0);
        let b = Vec2::new(-7.5, 40.0);
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn test_distance_3_4_5() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(normalize_or_zero(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = normalize_or_zero(Vec2::new(-3.0, 7.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
