//! Data-driven game balance
//!
//! Defaults mirror `consts`; a JSON override file can replace any subset of
//! fields. The simulation reads balance numbers from here, never from the
//! file format directly.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::CollisionPolicy;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: f32,
    pub speed: f32,
    pub max_energy: f32,
    pub energy_drain: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            max_energy: PLAYER_MAX_ENERGY,
            energy_drain: ENERGY_DRAIN_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub initial_quota: u32,
    pub quota_increment: u32,
    pub max_quota: u32,
    pub duration_ms: u64,
    pub energy_bonus: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            initial_quota: INITIAL_WAVE_QUOTA,
            quota_increment: WAVE_QUOTA_INCREMENT,
            max_quota: MAX_WAVE_QUOTA,
            duration_ms: WAVE_DURATION_MS,
            energy_bonus: WAVE_ENERGY_BONUS,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub base_speed: f32,
    pub max_speed: f32,
    pub speed_increment: f32,
    pub initial_spawn_interval_ms: u64,
    pub min_spawn_interval_ms: u64,
    pub spawn_interval_decrement_ms: u64,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            base_speed: ENEMY_BASE_SPEED,
            max_speed: ENEMY_MAX_SPEED,
            speed_increment: ENEMY_SPEED_INCREMENT,
            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            spawn_interval_decrement_ms: SPAWN_INTERVAL_DECREMENT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub spawn_interval_ms: u64,
    pub energy_bonus: f32,
    pub safe_distance: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            spawn_interval_ms: POWERUP_SPAWN_INTERVAL_MS,
            energy_bonus: POWERUP_ENERGY_BONUS,
            safe_distance: POWERUP_SAFE_DISTANCE,
        }
    }
}

/// Top-level balance knobs for one run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub waves: WaveTuning,
    pub enemies: EnemyTuning,
    pub power_ups: PowerUpTuning,
    pub collision: CollisionPolicy,
}

impl Tuning {
    /// Parse a JSON override; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let t = Tuning::default();
        assert_eq!(t.player.max_energy, PLAYER_MAX_ENERGY);
        assert_eq!(t.waves.initial_quota, INITIAL_WAVE_QUOTA);
        assert_eq!(t.enemies.min_spawn_interval_ms, MIN_SPAWN_INTERVAL_MS);
        assert!(matches!(
            t.collision,
            CollisionPolicy::EnergyPenaltyWithGrace { .. }
        ));
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let t = Tuning::from_json(r#"{"player": {"speed": 5.0}}"#).unwrap();
        assert_eq!(t.player.speed, 5.0);
        assert_eq!(t.player.max_energy, PLAYER_MAX_ENERGY);
        assert_eq!(t.waves.duration_ms, WAVE_DURATION_MS);
    }

    #[test]
    fn test_collision_policy_override() {
        let t = Tuning::from_json(r#"{"collision": "instant_death"}"#).unwrap();
        assert!(matches!(t.collision, CollisionPolicy::InstantDeath));

        let t = Tuning::from_json(
            r#"{"collision": {"energy_penalty_with_grace": {"penalty": 30.0, "grace_ms": 500}}}"#,
        )
        .unwrap();
        assert!(matches!(
            t.collision,
            CollisionPolicy::EnergyPenaltyWithGrace {
                penalty,
                grace_ms: 500
            } if penalty == 30.0
        ));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{nope").is_err());
    }
}
