//! Per-tick HUD snapshot
//!
//! The display layer owns all text and formatting; the simulation exposes
//! numbers only. A snapshot is cheap to capture every tick.

use crate::sim::{AbilityKind, DangerLevel, GamePhase, GameState};

/// Readiness of one ability slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityStatus {
    /// Not yet unlocked this run
    Locked,
    Ready,
    /// On cooldown for this many more milliseconds
    Cooldown(u64),
}

/// One HUD row per ability in the catalog
#[derive(Debug, Clone, Copy)]
pub struct AbilityReadout {
    pub kind: AbilityKind,
    pub level: u8,
    pub status: AbilityStatus,
}

/// Everything the display layer needs for one frame
#[derive(Debug, Clone)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub wave: u32,
    pub elapsed_ms: u64,
    pub enemy_count: usize,
    pub energy: f32,
    pub max_energy: f32,
    pub danger: DangerLevel,
    pub abilities: Vec<AbilityReadout>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let abilities = AbilityKind::ALL
            .iter()
            .map(|&kind| {
                let status = if !state.progression.is_unlocked(kind) {
                    AbilityStatus::Locked
                } else {
                    match state
                        .abilities
                        .cooldown_remaining(kind, state.now_ms, &state.progression)
                    {
                        Some(0) | None => AbilityStatus::Ready,
                        Some(remaining) => AbilityStatus::Cooldown(remaining),
                    }
                };
                AbilityReadout {
                    kind,
                    level: state.progression.level(kind),
                    status,
                }
            })
            .collect();

        Self {
            phase: state.phase,
            wave: state.wave,
            elapsed_ms: state.elapsed_ms(),
            enemy_count: state.enemies.len(),
            energy: state.player.energy,
            max_energy: state.player.max_energy,
            danger: state.danger_level,
            abilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameState, InputState, tick};

    #[test]
    fn test_snapshot_reflects_fresh_run() {
        let state = GameState::new(21);
        let snap = HudSnapshot::capture(&state);

        assert_eq!(snap.wave, 1);
        assert_eq!(snap.enemy_count, 0);
        assert_eq!(snap.energy, snap.max_energy);
        assert_eq!(snap.abilities.len(), AbilityKind::ALL.len());
    }

    #[test]
    fn test_starting_loadout_statuses() {
        let state = GameState::new(21);
        let snap = HudSnapshot::capture(&state);

        for readout in &snap.abilities {
            if readout.kind == AbilityKind::Reload {
                assert_eq!(readout.status, AbilityStatus::Ready);
                assert_eq!(readout.level, 1);
            } else {
                assert_eq!(readout.status, AbilityStatus::Locked);
            }
        }
    }

    #[test]
    fn test_used_ability_shows_cooldown() {
        let mut state = GameState::new(21);
        state.god_mode = true;
        let mut input = InputState::new();
        input.press(crate::sim::Button::Reload);
        let _ = tick(&mut state, &input.snapshot());

        let snap = HudSnapshot::capture(&state);
        let reload = snap
            .abilities
            .iter()
            .find(|r| r.kind == AbilityKind::Reload)
            .unwrap();
        assert!(matches!(reload.status, AbilityStatus::Cooldown(ms) if ms > 0));
    }
}
