//! Ability activation engine
//!
//! Every activation runs the same gate: unlocked, off cooldown, enough
//! energy. On success the engine stamps the use time, deducts the cost, and
//! applies the effect through the entity mutators. Multi-stun is the one
//! deferred effect: its later pulses are scheduled against the simulation
//! clock and carry the run generation so a restart orphans them.

use glam::Vec2;

use super::input::TickInput;
use super::progression::{AbilityKind, AbilityStats, Progression};
use super::state::{Enemy, Player};
use crate::distance;

/// Gap between successive multi-stun pulses
const PULSE_SPACING_MS: u64 = 300;
/// Base radius of the first pulse; later pulses widen from here
const PULSE_BASE_RADIUS: f32 = 80.0;
const PULSE_RADIUS_STEP: f32 = 30.0;
/// Stun applied by each pulse
const PULSE_STUN_MS: u64 = 3000;

/// A scheduled multi-stun pulse
#[derive(Debug, Clone, Copy)]
pub struct StunPulse {
    pub fire_at_ms: u64,
    pub radius: f32,
    /// Run generation at scheduling time; stale pulses are dropped unfired
    pub generation: u32,
}

/// Cooldown bookkeeping and deferred-effect scheduling
#[derive(Debug, Clone, Default)]
pub struct AbilityEngine {
    /// Last activation per ability; `None` means never used this run
    last_use: [Option<u64>; 9],
    /// Renderer cue for the stun shockwave ring
    stun_flash_until: Option<u64>,
    pending_pulses: Vec<StunPulse>,
}

impl AbilityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats if the ability is unlocked and off cooldown
    fn gate(&self, kind: AbilityKind, now_ms: u64, progression: &Progression) -> Option<AbilityStats> {
        let stats = progression.stats(kind)?;
        if let Some(cooldown) = stats.cooldown_ms()
            && let Some(last) = self.last_use[kind.index()]
            && now_ms - last <= cooldown
        {
            return None;
        }
        Some(stats)
    }

    fn commit(&mut self, kind: AbilityKind, now_ms: u64, cost: f32, player: &mut Player) {
        self.last_use[kind.index()] = Some(now_ms);
        player.energy -= cost;
        log::debug!("{} used at {}ms", kind.name(), now_ms);
    }

    /// Radial stun around the player
    pub fn use_stun(
        &mut self,
        now_ms: u64,
        player: &mut Player,
        enemies: &mut [Enemy],
        progression: &Progression,
    ) -> bool {
        let Some(AbilityStats::Stun {
            duration_ms,
            radius,
            energy_cost,
            ..
        }) = self.gate(AbilityKind::Stun, now_ms, progression)
        else {
            return false;
        };
        if player.energy < energy_cost {
            return false;
        }

        for enemy in enemies.iter_mut() {
            if distance(player.pos, enemy.pos) <= radius {
                enemy.stun(now_ms, duration_ms);
            }
        }
        self.stun_flash_until = Some(now_ms + duration_ms.min(500));
        self.commit(AbilityKind::Stun, now_ms, energy_cost, player);
        true
    }

    /// Directional burst; defaults upward when the player is idle
    pub fn use_dash(
        &mut self,
        now_ms: u64,
        player: &mut Player,
        input: &TickInput,
        progression: &Progression,
    ) -> bool {
        let Some(AbilityStats::Dash {
            speed_mult,
            duration_ms,
            energy_cost,
            ..
        }) = self.gate(AbilityKind::Dash, now_ms, progression)
        else {
            return false;
        };
        if player.energy < energy_cost {
            return false;
        }

        player.start_dash(input.dash_direction(), speed_mult, duration_ms, now_ms);
        self.commit(AbilityKind::Dash, now_ms, energy_cost, player);
        true
    }

    pub fn use_shield(
        &mut self,
        now_ms: u64,
        player: &mut Player,
        progression: &Progression,
    ) -> bool {
        let Some(AbilityStats::Shield {
            duration_ms,
            energy_cost,
            ..
        }) = self.gate(AbilityKind::Shield, now_ms, progression)
        else {
            return false;
        };
        if player.energy < energy_cost {
            return false;
        }

        player.activate_shield(duration_ms, now_ms);
        self.commit(AbilityKind::Shield, now_ms, energy_cost, player);
        true
    }

    pub fn use_reload(
        &mut self,
        now_ms: u64,
        player: &mut Player,
        progression: &Progression,
    ) -> bool {
        let Some(AbilityStats::Reload { restore, .. }) =
            self.gate(AbilityKind::Reload, now_ms, progression)
        else {
            return false;
        };
        player.restore_energy(restore);
        self.commit(AbilityKind::Reload, now_ms, 0.0, player);
        true
    }

    pub fn use_heal(
        &mut self,
        now_ms: u64,
        player: &mut Player,
        progression: &Progression,
    ) -> bool {
        let Some(AbilityStats::Heal { restore, .. }) =
            self.gate(AbilityKind::Heal, now_ms, progression)
        else {
            return false;
        };
        player.restore_energy(restore);
        self.commit(AbilityKind::Heal, now_ms, 0.0, player);
        true
    }

    pub fn use_speed_boost(
        &mut self,
        now_ms: u64,
        player: &mut Player,
        progression: &mut Progression,
    ) -> bool {
        let Some(AbilityStats::SpeedBoost {
            boost, duration_ms, ..
        }) = self.gate(AbilityKind::SpeedBoost, now_ms, progression)
        else {
            return false;
        };
        progression.start_speed_boost(boost, now_ms + duration_ms);
        self.commit(AbilityKind::SpeedBoost, now_ms, 0.0, player);
        true
    }

    pub fn use_reflect(
        &mut self,
        now_ms: u64,
        player: &mut Player,
        progression: &mut Progression,
    ) -> bool {
        let Some(AbilityStats::Reflect {
            chance, duration_ms, ..
        }) = self.gate(AbilityKind::Reflect, now_ms, progression)
        else {
            return false;
        };
        progression.start_reflection(chance, now_ms + duration_ms);
        self.commit(AbilityKind::Reflect, now_ms, 0.0, player);
        true
    }

    /// Schedule a staggered sequence of widening stun pulses. The first
    /// pulse fires on this tick's update pass, the rest on later ticks.
    pub fn use_multi_stun(
        &mut self,
        now_ms: u64,
        generation: u32,
        player: &mut Player,
        progression: &Progression,
    ) -> bool {
        let Some(AbilityStats::MultiStun {
            pulses,
            energy_cost,
            ..
        }) = self.gate(AbilityKind::MultiStun, now_ms, progression)
        else {
            return false;
        };
        if player.energy < energy_cost {
            return false;
        }

        for i in 0..pulses {
            self.pending_pulses.push(StunPulse {
                fire_at_ms: now_ms + i as u64 * PULSE_SPACING_MS,
                radius: PULSE_BASE_RADIUS + PULSE_RADIUS_STEP * i as f32,
                generation,
            });
        }
        self.commit(AbilityKind::MultiStun, now_ms, energy_cost, player);
        true
    }

    /// Fire due pulses against live positions and expire the stun cue.
    /// Pulses scheduled before a restart never fire.
    pub fn update(
        &mut self,
        now_ms: u64,
        generation: u32,
        player_pos: Vec2,
        enemies: &mut [Enemy],
    ) {
        let mut i = 0;
        while i < self.pending_pulses.len() {
            let pulse = self.pending_pulses[i];
            if pulse.generation != generation {
                self.pending_pulses.swap_remove(i);
                continue;
            }
            if pulse.fire_at_ms > now_ms {
                i += 1;
                continue;
            }
            for enemy in enemies.iter_mut() {
                if distance(player_pos, enemy.pos) <= pulse.radius {
                    enemy.stun(now_ms, PULSE_STUN_MS);
                }
            }
            self.pending_pulses.swap_remove(i);
        }

        if matches!(self.stun_flash_until, Some(until) if now_ms >= until) {
            self.stun_flash_until = None;
        }
    }

    /// Whether the stun shockwave cue is live (renderer hint)
    pub fn is_stun_flash_active(&self) -> bool {
        self.stun_flash_until.is_some()
    }

    pub fn has_pending_pulses(&self) -> bool {
        !self.pending_pulses.is_empty()
    }

    /// Milliseconds until the ability is usable again; zero when ready.
    /// `None` for passives and abilities without a cooldown.
    pub fn cooldown_remaining(
        &self,
        kind: AbilityKind,
        now_ms: u64,
        progression: &Progression,
    ) -> Option<u64> {
        let cooldown = progression.stats(kind)?.cooldown_ms()?;
        match self.last_use[kind.index()] {
            None => Some(0),
            Some(last) => Some((last + cooldown).saturating_sub(now_ms)),
        }
    }
}
