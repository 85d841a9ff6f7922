//! Fixed-timestep tick orchestration
//!
//! One call to [`tick`] advances the simulation by exactly `TICK_MS`. The
//! order inside a tick is fixed: clock, ability triggers, player, enemies,
//! projectiles, power-ups, particles, spawning, wave bookkeeping, collisions,
//! danger tiering, then timed-effect expiry. Outside the `Playing` phase only
//! pause and restart inputs are honored.

use rand::Rng;

use super::collision::{self, CollisionOutcome};
use super::input::TickInput;
use super::state::{DangerLevel, Enemy, EnemyKind, GamePhase, GameState, Particle, PowerUp};
use super::progression::{AbilityChoice, OptionAction};
use crate::consts::TICK_MS;
use crate::distance;

/// Whether the run is still going after this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum TickOutcome {
    Running,
    GameOver,
}

/// Advance the simulation by one fixed step
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    handle_control_triggers(state, input);

    if state.phase != GamePhase::Playing {
        return match state.phase {
            GamePhase::GameOver => TickOutcome::GameOver,
            _ => TickOutcome::Running,
        };
    }

    state.now_ms += TICK_MS;

    handle_ability_triggers(state, input);

    let now = state.now_ms;
    let arena = state.arena();
    state.player.update(input, now, arena, &state.progression);

    update_enemies(state);
    update_projectiles(state);
    update_power_ups(state);
    state.particles.retain_mut(|p| {
        p.update();
        !p.is_dead()
    });

    spawn_enemies(state);
    spawn_power_ups(state);
    update_waves(state);

    if collision::resolve(state) == CollisionOutcome::Defeated || state.player.energy <= 0.0 {
        state.phase = GamePhase::GameOver;
        log::info!(
            "game over at wave {} after {}ms",
            state.wave,
            state.elapsed_ms()
        );
        return TickOutcome::GameOver;
    }

    update_danger_level(state);

    let player_pos = state.player.pos;
    let generation = state.generation;
    state
        .abilities
        .update(now, generation, player_pos, &mut state.enemies);
    state.progression.update(now);

    TickOutcome::Running
}

fn handle_control_triggers(state: &mut GameState, input: &TickInput) {
    if input.triggers.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }
    if input.triggers.restart && state.phase == GamePhase::GameOver {
        state.restart();
    }
}

fn handle_ability_triggers(state: &mut GameState, input: &TickInput) {
    let now = state.now_ms;
    let t = input.triggers;
    if t.stun {
        let _ = state
            .abilities
            .use_stun(now, &mut state.player, &mut state.enemies, &state.progression);
    }
    if t.dash {
        let _ = state
            .abilities
            .use_dash(now, &mut state.player, input, &state.progression);
    }
    if t.shield {
        let _ = state
            .abilities
            .use_shield(now, &mut state.player, &state.progression);
    }
    if t.reload {
        let _ = state
            .abilities
            .use_reload(now, &mut state.player, &state.progression);
    }
    if t.heal {
        let _ = state
            .abilities
            .use_heal(now, &mut state.player, &state.progression);
    }
    if t.speed_boost {
        let _ = state
            .abilities
            .use_speed_boost(now, &mut state.player, &mut state.progression);
    }
    if t.multi_stun {
        let generation = state.generation;
        let _ = state
            .abilities
            .use_multi_stun(now, generation, &mut state.player, &state.progression);
    }
    if t.reflect {
        let _ = state
            .abilities
            .use_reflect(now, &mut state.player, &mut state.progression);
    }
}

fn update_enemies(state: &mut GameState) {
    let now = state.now_ms;
    let mut fired = Vec::new();
    for enemy in &mut state.enemies {
        enemy.update(&state.player, now, &mut fired);
    }
    state.projectiles.append(&mut fired);
}

fn update_projectiles(state: &mut GameState) {
    let arena = state.arena();
    state.projectiles.retain_mut(|p| {
        p.update();
        !p.is_off_bounds(arena)
    });
}

fn update_power_ups(state: &mut GameState) {
    let mut i = 0;
    while i < state.power_ups.len() {
        state.power_ups[i].update();
        let collected = {
            let p = &state.power_ups[i];
            distance(state.player.pos, p.pos) < p.collection_radius() + state.player.hitbox_radius()
        };
        if collected {
            let power_up = state.power_ups.swap_remove(i);
            state.player.collect_power_up(&power_up);
            state.particles.extend(Particle::collection_burst(power_up.pos));
        } else {
            i += 1;
        }
    }
}

fn spawn_enemies(state: &mut GameState) {
    if state.spawned_this_wave >= state.wave_quota {
        return;
    }
    let due = match state.last_enemy_spawn {
        None => true,
        Some(last) => state.now_ms - last > state.spawn_interval_ms,
    };
    if !due {
        return;
    }

    let kind = pick_enemy_kind(state);
    let arena = state.arena();
    let enemy = Enemy::spawn_at_edge(&mut state.rng, arena, kind, state.enemy_speed);
    log::debug!("spawned {:?} enemy at {:?}", kind, enemy.pos);
    state.enemies.push(enemy);
    state.spawned_this_wave += 1;
    state.last_enemy_spawn = Some(state.now_ms);
}

/// Enemy mix widens as waves progress: basic only, then fast, then shooters
fn pick_enemy_kind(state: &mut GameState) -> EnemyKind {
    let roll: f32 = state.rng.random();
    match state.wave {
        0..=2 => EnemyKind::Basic,
        3..=5 => {
            if roll < 0.7 {
                EnemyKind::Basic
            } else {
                EnemyKind::Fast
            }
        }
        _ => {
            if roll < 0.5 {
                EnemyKind::Basic
            } else if roll < 0.8 {
                EnemyKind::Fast
            } else {
                EnemyKind::Shooter
            }
        }
    }
}

fn spawn_power_ups(state: &mut GameState) {
    if state.now_ms - state.last_powerup_spawn <= state.tuning.power_ups.spawn_interval_ms {
        return;
    }
    let arena = state.arena();
    let player_pos = state.player.pos;
    let power_up = PowerUp::spawn_in_safe_area(&mut state.rng, arena, player_pos, &state.tuning);
    state.power_ups.push(power_up);
    state.last_powerup_spawn = state.now_ms;
}

fn update_waves(state: &mut GameState) {
    let quota_done =
        state.spawned_this_wave >= state.wave_quota && state.enemies.is_empty();
    let timed_out = state.now_ms - state.wave_started_at > state.tuning.waves.duration_ms;
    if quota_done || timed_out {
        advance_wave(state);
    }
}

/// Promote to the next wave: escalate difficulty within caps, refund a
/// little energy, and open the ability choice from wave 2 on.
fn advance_wave(state: &mut GameState) {
    let waves = &state.tuning.waves;
    let enemies = &state.tuning.enemies;

    state.wave += 1;
    state.wave_quota = (state.wave_quota + waves.quota_increment).min(waves.max_quota);
    state.spawn_interval_ms = state
        .spawn_interval_ms
        .saturating_sub(enemies.spawn_interval_decrement_ms)
        .max(enemies.min_spawn_interval_ms);
    state.enemy_speed = (state.enemy_speed + enemies.speed_increment).min(enemies.max_speed);
    state.spawned_this_wave = 0;
    state.wave_started_at = state.now_ms;

    state.enemies.clear();
    state.player.restore_energy(state.tuning.waves.energy_bonus);

    log::info!(
        "wave {} started: quota {}, spawn interval {}ms, enemy speed {:.1}",
        state.wave,
        state.wave_quota,
        state.spawn_interval_ms,
        state.enemy_speed
    );

    let options = state.progression.generate_options(&mut state.rng, 3);
    if !options.is_empty() {
        state.pending_options = Some(options);
        state.phase = GamePhase::ChoosingAbility;
    }
}

/// Immediate promotion, bypassing quota and timer (debug port)
pub(crate) fn force_wave_advance(state: &mut GameState) {
    advance_wave(state);
}

/// Proximity-based severity used only for presentation
fn update_danger_level(state: &mut GameState) {
    let mut nearby = 0;
    let mut closest = f32::MAX;
    for enemy in &state.enemies {
        let d = distance(state.player.pos, enemy.pos);
        if d < 100.0 {
            nearby += 1;
        }
        closest = closest.min(d);
    }
    state.danger_level = if nearby >= 3 || closest < 50.0 {
        DangerLevel::Critical
    } else if nearby >= 1 {
        DangerLevel::Warning
    } else {
        DangerLevel::Safe
    };
}

impl GameState {
    /// Apply the pending ability option at `index` and resume play.
    /// Ignored outside the choosing phase or for an out-of-range index.
    pub fn choose_ability(&mut self, index: usize) -> Option<AbilityChoice> {
        if self.phase != GamePhase::ChoosingAbility {
            return None;
        }
        let options = self.pending_options.take()?;
        let choice = self.progression.choose_option(&options, index);
        match choice {
            Some(c) => {
                let verb = match c.action {
                    OptionAction::Unlock => "unlocked",
                    OptionAction::Upgrade => "upgraded",
                };
                log::info!("{} {} to level {}", verb, c.kind.name(), c.new_level);
                self.phase = GamePhase::Playing;
            }
            None => {
                // Invalid index: keep waiting for a valid pick
                self.pending_options = Some(options);
            }
        }
        choice
    }
}
