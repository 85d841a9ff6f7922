//! Last Line entry point
//!
//! Headless demo run: a simple autopilot plays the simulation and logs its
//! progress. Useful for balance checks and for watching the wave machine
//! escalate without a renderer attached.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use last_line::consts::TICK_MS;
use last_line::hud::{AbilityStatus, HudSnapshot};
use last_line::sim::{AbilityKind, GamePhase, GameState, TickInput, TickOutcome, tick};
use last_line::{distance, normalize_or_zero};

/// Cap a demo run at ten simulated minutes
const MAX_TICKS: u64 = 10 * 60 * 1000 / TICK_MS;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    log::info!("Last Line starting with seed {seed}");
    let mut state = GameState::new(seed);

    for _ in 0..MAX_TICKS {
        if state.phase == GamePhase::ChoosingAbility {
            if let Some(choice) = state.choose_ability(0) {
                log::info!("autopilot picked {}", choice.kind.name());
            }
        }

        let input = autopilot(&state);
        if tick(&mut state, &input) == TickOutcome::GameOver {
            break;
        }
    }

    let snap = HudSnapshot::capture(&state);
    log::info!(
        "run finished: wave {}, {:.1}s survived, {:.0}/{:.0} energy",
        snap.wave,
        snap.elapsed_ms as f64 / 1000.0,
        snap.energy,
        snap.max_energy
    );
}

/// Kite away from the nearest enemy, drift toward power-ups when calm,
/// and fire whatever ability is ready.
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let player = state.player.pos;

    let nearest_enemy = state
        .enemies
        .iter()
        .map(|e| e.pos)
        .min_by(|a, b| distance(player, *a).total_cmp(&distance(player, *b)));

    input.movement = match nearest_enemy {
        Some(enemy) if distance(player, enemy) < 120.0 => {
            // Flee, biased toward the arena center so we don't pin on a wall
            let flee = normalize_or_zero(player - enemy);
            let to_center = normalize_or_zero(state.arena() / 2.0 - player);
            normalize_or_zero(flee + to_center * 0.5)
        }
        _ => match state.power_ups.first() {
            Some(p) => normalize_or_zero(p.pos - player),
            None => Vec2::ZERO,
        },
    };

    let snap = HudSnapshot::capture(state);
    let low_energy = snap.energy < snap.max_energy * 0.4;
    let crowded = snap.enemy_count >= 3;
    for readout in &snap.abilities {
        if readout.status != AbilityStatus::Ready {
            continue;
        }
        match readout.kind {
            AbilityKind::Reload if low_energy => input.triggers.reload = true,
            AbilityKind::Heal if low_energy => input.triggers.heal = true,
            AbilityKind::Stun if crowded => input.triggers.stun = true,
            AbilityKind::MultiStun if crowded => input.triggers.multi_stun = true,
            AbilityKind::Shield if state.danger_level == last_line::sim::DangerLevel::Critical => {
                input.triggers.shield = true
            }
            AbilityKind::SpeedBoost if crowded => input.triggers.speed_boost = true,
            AbilityKind::Reflect if crowded => input.triggers.reflect = true,
            _ => {}
        }
    }

    input
}
