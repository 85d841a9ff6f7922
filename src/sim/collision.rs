//! Collision resolution
//!
//! Circle-vs-circle checks between the player and hostiles, resolved in a
//! strict precedence: god mode, shield absorption, dash immunity, reflection
//! (projectiles only), then the configured contact policy. A single contact
//! produces exactly one outcome. Shield consumption is an enemy-contact
//! effect; a shield blocks projectiles without being spent.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameState, Particle};
use crate::consts::{CONTACT_PENALTY, INVULNERABILITY_MS};
use crate::distance;

/// What an unprotected enemy contact does to the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Legacy one-hit-kill rule, kept for configs that still want it
    InstantDeath,
    /// Contact drains energy and grants a short grace window
    EnergyPenaltyWithGrace { penalty: f32, grace_ms: u64 },
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        CollisionPolicy::EnergyPenaltyWithGrace {
            penalty: CONTACT_PENALTY,
            grace_ms: INVULNERABILITY_MS,
        }
    }
}

/// Result of one resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum CollisionOutcome {
    Survived,
    Defeated,
}

/// Resolve all player-vs-hostile contacts for this tick
pub fn resolve(state: &mut GameState) -> CollisionOutcome {
    if state.god_mode {
        return CollisionOutcome::Survived;
    }

    if resolve_enemy_contacts(state) == CollisionOutcome::Defeated {
        return CollisionOutcome::Defeated;
    }
    resolve_projectile_hits(state)
}

fn resolve_enemy_contacts(state: &mut GameState) -> CollisionOutcome {
    let policy = state.tuning.collision;
    let now = state.now_ms;

    let mut i = 0;
    while i < state.enemies.len() {
        let hit = {
            let enemy = &state.enemies[i];
            distance(state.player.pos, enemy.pos)
                < state.player.hitbox_radius() + enemy.hitbox_radius()
        };
        if !hit {
            i += 1;
            continue;
        }

        // Shield absorbs the hit and destroys the enemy, no energy loss
        if state.player.has_shield() {
            state.player.shield = None;
            let pos = state.enemies.swap_remove(i).pos;
            state.particles.extend(Particle::shield_burst(pos));
            continue;
        }

        // Dash passes straight through
        if state.player.is_dashing() {
            i += 1;
            continue;
        }

        match policy {
            CollisionPolicy::InstantDeath => return CollisionOutcome::Defeated,
            CollisionPolicy::EnergyPenaltyWithGrace { penalty, grace_ms } => {
                if state.player.is_invulnerable() {
                    i += 1;
                    continue;
                }
                state.player.energy = (state.player.energy - penalty).max(0.0);
                state.player.invulnerable_until = Some(now + grace_ms);
                state.enemies.swap_remove(i);
                if state.player.energy <= 0.0 {
                    return CollisionOutcome::Defeated;
                }
            }
        }
    }
    CollisionOutcome::Survived
}

fn resolve_projectile_hits(state: &mut GameState) -> CollisionOutcome {
    let policy = state.tuning.collision;
    let reflection_chance = state.progression.reflection_chance();

    let mut i = 0;
    while i < state.projectiles.len() {
        let hit = {
            let p = &state.projectiles[i];
            distance(state.player.pos, p.pos)
                < state.player.hitbox_radius() + p.hitbox_radius()
        };
        if !hit {
            i += 1;
            continue;
        }

        // Shield blocks the projectile and stays up
        if state.player.has_shield() {
            let pos = state.projectiles.swap_remove(i).pos;
            state.particles.extend(Particle::shield_burst(pos));
            continue;
        }

        // Dash deflects: the projectile is spent, no damage
        if state.player.is_dashing() {
            state.projectiles.swap_remove(i);
            continue;
        }

        // Reflection turns the projectile back at its shooter
        if reflection_chance > 0.0 && state.rng.random::<f32>() < reflection_chance {
            let p = &mut state.projectiles[i];
            p.dir = -p.dir;
            i += 1;
            continue;
        }

        state.projectiles.swap_remove(i);
        match policy {
            CollisionPolicy::InstantDeath => return CollisionOutcome::Defeated,
            CollisionPolicy::EnergyPenaltyWithGrace { penalty, .. } => {
                // Projectiles neither respect nor grant the grace window
                state.player.energy = (state.player.energy - penalty).max(0.0);
                if state.player.energy <= 0.0 {
                    return CollisionOutcome::Defeated;
                }
            }
        }
    }
    CollisionOutcome::Survived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, EnemyKind, GameState, Projectile};
    use glam::Vec2;

    fn state_with_enemy_on_player() -> GameState {
        let mut state = GameState::new(5);
        let pos = state.player.pos;
        state.enemies.push(Enemy::new(pos, EnemyKind::Basic, 1.0));
        state
    }

    #[test]
    fn test_contact_drains_energy_and_grants_grace() {
        let mut state = state_with_enemy_on_player();
        let before = state.player.energy;

        assert_eq!(resolve(&mut state), CollisionOutcome::Survived);
        assert_eq!(state.player.energy, before - CONTACT_PENALTY);
        assert!(state.player.is_invulnerable());
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_grace_window_blocks_second_contact() {
        let mut state = state_with_enemy_on_player();
        assert_eq!(resolve(&mut state), CollisionOutcome::Survived);
        let after_first = state.player.energy;

        let pos = state.player.pos;
        state.enemies.push(Enemy::new(pos, EnemyKind::Basic, 1.0));
        assert_eq!(resolve(&mut state), CollisionOutcome::Survived);
        assert_eq!(state.player.energy, after_first);
        // The protected enemy is not consumed
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_shield_absorbs_with_single_outcome() {
        let mut state = state_with_enemy_on_player();
        let before = state.player.energy;
        state.player.activate_shield(3000, 0);

        assert_eq!(resolve(&mut state), CollisionOutcome::Survived);
        assert_eq!(state.player.energy, before);
        assert!(!state.player.has_shield());
        assert!(!state.player.is_invulnerable());
        assert!(state.enemies.is_empty());
        // Absorption burst
        assert_eq!(state.particles.len(), 6);
    }

    #[test]
    fn test_shield_wins_over_dash_on_enemy_contact() {
        let mut state = state_with_enemy_on_player();
        let before = state.player.energy;
        state.player.activate_shield(3000, 0);
        state.player.start_dash(Vec2::new(1.0, 0.0), 2.0, 200, 0);

        assert_eq!(resolve(&mut state), CollisionOutcome::Survived);
        // The shield is spent and the enemy destroyed, not dashed through
        assert!(state.enemies.is_empty());
        assert!(!state.player.has_shield());
        assert!(state.player.is_dashing());
        assert_eq!(state.player.energy, before);
        assert_eq!(state.particles.len(), 6);
    }

    #[test]
    fn test_shield_blocks_projectile_without_being_spent() {
        let mut state = GameState::new(5);
        let pos = state.player.pos;
        state.projectiles.push(Projectile::new(pos, Vec2::new(1.0, 0.0)));
        state.player.activate_shield(3000, 0);
        let before = state.player.energy;

        assert_eq!(resolve(&mut state), CollisionOutcome::Survived);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.player.energy, before);
        assert!(state.player.has_shield());
        assert_eq!(state.particles.len(), 6);
    }

    #[test]
    fn test_dash_passes_through_enemies() {
        let mut state = state_with_enemy_on_player();
        let before = state.player.energy;
        state.player.start_dash(Vec2::new(1.0, 0.0), 2.0, 200, 0);

        assert_eq!(resolve(&mut state), CollisionOutcome::Survived);
        assert_eq!(state.player.energy, before);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_instant_death_policy() {
        let mut state = state_with_enemy_on_player();
        state.tuning.collision = CollisionPolicy::InstantDeath;
        assert_eq!(resolve(&mut state), CollisionOutcome::Defeated);
    }

    #[test]
    fn test_god_mode_ignores_everything() {
        let mut state = state_with_enemy_on_player();
        state.tuning.collision = CollisionPolicy::InstantDeath;
        state.god_mode = true;
        assert_eq!(resolve(&mut state), CollisionOutcome::Survived);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_projectile_hit_has_no_grace() {
        let mut state = GameState::new(5);
        let pos = state.player.pos;
        state.projectiles.push(Projectile::new(pos, Vec2::new(1.0, 0.0)));
        let before = state.player.energy;

        assert_eq!(resolve(&mut state), CollisionOutcome::Survived);
        assert_eq!(state.player.energy, before - CONTACT_PENALTY);
        assert!(!state.player.is_invulnerable());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_depleted_energy_on_contact_is_defeat() {
        let mut state = state_with_enemy_on_player();
        state.player.energy = CONTACT_PENALTY;
        assert_eq!(resolve(&mut state), CollisionOutcome::Defeated);
    }

    #[test]
    fn test_guaranteed_reflection_reverses_projectile() {
        let mut state = GameState::new(5);
        let pos = state.player.pos;
        state.projectiles.push(Projectile::new(pos, Vec2::new(1.0, 0.0)));
        state.progression.start_reflection(1.0, 60_000);
        let before = state.player.energy;

        assert_eq!(resolve(&mut state), CollisionOutcome::Survived);
        assert_eq!(state.player.energy, before);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].dir, Vec2::new(-1.0, 0.0));
    }
}
