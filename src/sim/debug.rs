//! Debug command port
//!
//! Development-only mutations enter through one explicit channel instead of
//! scattered hotkey handling. The host decides how commands are produced;
//! the simulation only applies them.

use glam::Vec2;

use super::state::{Enemy, EnemyKind, GameState};
use super::tick;

/// Development mutations applied between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugCommand {
    /// Remove every enemy and projectile
    ClearHostiles,
    /// Drop an enemy of the given kind next to the player
    SpawnEnemyNear(EnemyKind),
    /// Add energy, clamped to the current maximum
    GiveEnergy(f32),
    /// Toggle collision immunity
    ToggleGodMode,
    /// Toggle hitbox visualization flag (rendering is the host's job)
    ToggleHitboxes,
    /// Force an immediate wave promotion
    ForceWave,
    /// Unlock the next ability in the run's shuffled grant order
    GrantNextAbility,
}

/// Apply one debug command to the live state
pub fn apply(state: &mut GameState, command: DebugCommand) {
    match command {
        DebugCommand::ClearHostiles => {
            let n = state.enemies.len() + state.projectiles.len();
            state.enemies.clear();
            state.projectiles.clear();
            log::debug!("debug: cleared {n} hostiles");
        }
        DebugCommand::SpawnEnemyNear(kind) => {
            let pos = state.player.pos + Vec2::new(50.0, 50.0);
            state.enemies.push(Enemy::new(pos, kind, state.enemy_speed));
            log::debug!("debug: spawned {kind:?} near player");
        }
        DebugCommand::GiveEnergy(amount) => {
            state.player.restore_energy(amount);
            log::debug!("debug: energy now {:.0}", state.player.energy);
        }
        DebugCommand::ToggleGodMode => {
            state.god_mode = !state.god_mode;
            log::debug!("debug: god mode {}", state.god_mode);
        }
        DebugCommand::ToggleHitboxes => {
            state.show_hitboxes = !state.show_hitboxes;
            log::debug!("debug: hitboxes {}", state.show_hitboxes);
        }
        DebugCommand::ForceWave => {
            tick::force_wave_advance(state);
            log::debug!("debug: forced wave {}", state.wave);
        }
        DebugCommand::GrantNextAbility => match state.progression.unlock_next_in_order() {
            Some(kind) => log::debug!("debug: granted {}", kind.name()),
            None => log::debug!("debug: all abilities already unlocked"),
        },
    }
}
