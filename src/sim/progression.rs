//! Ability catalog, rarity-weighted unlocks, and run progression
//!
//! Ability numbers are derived, never stored: [`stats_for`] computes a typed
//! stat record from a kind and level, so a rank is just an unlocked flag and
//! a level. The between-wave choice flow draws rarity-weighted options from
//! the pool of abilities that can still grow.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

/// Every ability in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityKind {
    /// Radial stun around the player
    Stun,
    /// Short burst of directional speed with contact immunity
    Dash,
    /// Timed damage absorption
    Shield,
    /// Instant energy restore, long cooldown
    Reload,
    /// Larger instant energy restore
    Heal,
    /// Timed movement speed multiplier
    SpeedBoost,
    /// Permanent max-energy increase
    EnergyBoost,
    /// Staggered sequence of widening stun pulses
    MultiStun,
    /// Timed chance to turn projectiles back at their shooter
    Reflect,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 9] = [
        AbilityKind::Stun,
        AbilityKind::Dash,
        AbilityKind::Shield,
        AbilityKind::Reload,
        AbilityKind::Heal,
        AbilityKind::SpeedBoost,
        AbilityKind::EnergyBoost,
        AbilityKind::MultiStun,
        AbilityKind::Reflect,
    ];

    pub fn max_level(self) -> u8 {
        match self {
            AbilityKind::Stun | AbilityKind::Dash | AbilityKind::Shield | AbilityKind::Reload => 5,
            AbilityKind::SpeedBoost => 4,
            AbilityKind::Heal | AbilityKind::EnergyBoost | AbilityKind::Reflect => 3,
            AbilityKind::MultiStun => 2,
        }
    }

    /// Unlock rarity; upgrades of an owned ability count as one tier cheaper
    pub fn rarity(self) -> u8 {
        match self {
            AbilityKind::Stun | AbilityKind::Reload => 1,
            AbilityKind::Dash | AbilityKind::Shield => 2,
            AbilityKind::Heal | AbilityKind::SpeedBoost => 3,
            AbilityKind::EnergyBoost => 4,
            AbilityKind::MultiStun | AbilityKind::Reflect => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::Stun => "stun",
            AbilityKind::Dash => "dash",
            AbilityKind::Shield => "shield",
            AbilityKind::Reload => "reload",
            AbilityKind::Heal => "heal",
            AbilityKind::SpeedBoost => "speed boost",
            AbilityKind::EnergyBoost => "energy boost",
            AbilityKind::MultiStun => "multi-stun",
            AbilityKind::Reflect => "reflect",
        }
    }

    pub(crate) fn index(self) -> usize {
        Self::ALL.iter().position(|&k| k == self).unwrap_or(0)
    }
}

/// Derived per-level stats for one ability, in its own shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbilityStats {
    Stun {
        duration_ms: u64,
        radius: f32,
        cooldown_ms: u64,
        energy_cost: f32,
    },
    Dash {
        speed_mult: f32,
        duration_ms: u64,
        cooldown_ms: u64,
        energy_cost: f32,
    },
    Shield {
        duration_ms: u64,
        cooldown_ms: u64,
        energy_cost: f32,
    },
    Reload {
        restore: f32,
        cooldown_ms: u64,
    },
    Heal {
        restore: f32,
        cooldown_ms: u64,
    },
    SpeedBoost {
        boost: f32,
        duration_ms: u64,
        cooldown_ms: u64,
    },
    EnergyBoost {
        bonus: f32,
    },
    MultiStun {
        pulses: u32,
        cooldown_ms: u64,
        energy_cost: f32,
    },
    Reflect {
        chance: f32,
        duration_ms: u64,
        cooldown_ms: u64,
    },
}

impl AbilityStats {
    /// Cooldown between uses; `None` for passive abilities
    pub fn cooldown_ms(&self) -> Option<u64> {
        match *self {
            AbilityStats::Stun { cooldown_ms, .. }
            | AbilityStats::Dash { cooldown_ms, .. }
            | AbilityStats::Shield { cooldown_ms, .. }
            | AbilityStats::Reload { cooldown_ms, .. }
            | AbilityStats::Heal { cooldown_ms, .. }
            | AbilityStats::SpeedBoost { cooldown_ms, .. }
            | AbilityStats::MultiStun { cooldown_ms, .. }
            | AbilityStats::Reflect { cooldown_ms, .. } => Some(cooldown_ms),
            AbilityStats::EnergyBoost { .. } => None,
        }
    }
}

/// Pure stat derivation: base value plus a per-level bonus
pub fn stats_for(kind: AbilityKind, level: u8) -> AbilityStats {
    let l = level as f32;
    let lms = level as u64;
    match kind {
        AbilityKind::Stun => AbilityStats::Stun {
            duration_ms: 2000 + 500 * lms,
            radius: 60.0 + 15.0 * l,
            cooldown_ms: 5000_u64.saturating_sub(500 * lms),
            energy_cost: 20.0,
        },
        AbilityKind::Dash => AbilityStats::Dash {
            speed_mult: 1.5 + 0.3 * l,
            duration_ms: 200,
            cooldown_ms: 3000_u64.saturating_sub(300 * lms),
            energy_cost: 15.0,
        },
        AbilityKind::Shield => AbilityStats::Shield {
            duration_ms: 3000 + 800 * lms,
            cooldown_ms: 8000_u64.saturating_sub(1000 * lms),
            energy_cost: 25.0,
        },
        AbilityKind::Reload => AbilityStats::Reload {
            restore: 25.0 + 10.0 * l,
            cooldown_ms: 20_000_u64.saturating_sub(2000 * lms),
        },
        AbilityKind::Heal => AbilityStats::Heal {
            restore: 50.0 + 25.0 * l,
            cooldown_ms: 15_000_u64.saturating_sub(2000 * lms),
        },
        AbilityKind::SpeedBoost => AbilityStats::SpeedBoost {
            boost: 0.2 + 0.15 * l,
            duration_ms: 5000 + 1500 * lms,
            cooldown_ms: 12_000,
        },
        AbilityKind::EnergyBoost => AbilityStats::EnergyBoost {
            bonus: 50.0 + 30.0 * l,
        },
        AbilityKind::MultiStun => AbilityStats::MultiStun {
            pulses: 2 + level as u32,
            cooldown_ms: 8000_u64.saturating_sub(1000 * lms),
            energy_cost: 30.0,
        },
        AbilityKind::Reflect => AbilityStats::Reflect {
            chance: (0.3 + 0.2 * l).min(1.0),
            duration_ms: 10_000 + 3000 * lms,
            cooldown_ms: 20_000,
        },
    }
}

/// What picking an option does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionAction {
    Unlock,
    Upgrade,
}

/// One between-wave choice card
#[derive(Debug, Clone, Copy)]
pub struct AbilityOption {
    pub kind: AbilityKind,
    pub action: OptionAction,
    /// Effective rarity used for weighting (upgrades are one tier cheaper)
    pub rarity: u8,
}

/// Result of applying a chosen option
#[derive(Debug, Clone, Copy)]
pub struct AbilityChoice {
    pub kind: AbilityKind,
    pub action: OptionAction,
    pub new_level: u8,
}

#[derive(Debug, Clone, Copy, Default)]
struct AbilityRank {
    unlocked: bool,
    level: u8,
}

#[derive(Debug, Clone, Copy)]
struct TimedEffect {
    magnitude: f32,
    until_ms: u64,
}

/// Timed buffs granted by abilities, expired by the tick loop
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    speed_boost: Option<TimedEffect>,
    reflection: Option<TimedEffect>,
}

/// Per-run ability ownership and active buffs
#[derive(Debug, Clone)]
pub struct Progression {
    ranks: [AbilityRank; 9],
    /// Fixed permutation of the catalog, consumed by sequential grants
    unlock_order: Vec<AbilityKind>,
    effects: ActiveEffects,
}

impl Progression {
    pub fn new(rng: &mut Pcg32) -> Self {
        let mut unlock_order = AbilityKind::ALL.to_vec();
        unlock_order.shuffle(rng);
        Self {
            ranks: [AbilityRank::default(); 9],
            unlock_order,
            effects: ActiveEffects::default(),
        }
    }

    /// Relock everything and reshuffle the grant order for a new run
    pub fn reset(&mut self, rng: &mut Pcg32) {
        self.ranks = [AbilityRank::default(); 9];
        self.unlock_order.shuffle(rng);
        self.effects = ActiveEffects::default();
    }

    /// Every run starts with reload at level 1
    pub fn grant_starting_ability(&mut self) {
        self.unlock(AbilityKind::Reload);
    }

    pub fn is_unlocked(&self, kind: AbilityKind) -> bool {
        self.ranks[kind.index()].unlocked
    }

    pub fn level(&self, kind: AbilityKind) -> u8 {
        self.ranks[kind.index()].level
    }

    /// Stats at the current level, or `None` while locked
    pub fn stats(&self, kind: AbilityKind) -> Option<AbilityStats> {
        let rank = self.ranks[kind.index()];
        rank.unlocked.then(|| stats_for(kind, rank.level))
    }

    pub fn unlock(&mut self, kind: AbilityKind) {
        let rank = &mut self.ranks[kind.index()];
        if !rank.unlocked {
            rank.unlocked = true;
            rank.level = 1;
        }
    }

    fn upgrade(&mut self, kind: AbilityKind) -> u8 {
        let rank = &mut self.ranks[kind.index()];
        if rank.unlocked && rank.level < kind.max_level() {
            rank.level += 1;
        }
        rank.level
    }

    /// Unlock the next still-locked ability in the shuffled grant order
    pub fn unlock_next_in_order(&mut self) -> Option<AbilityKind> {
        let next = self
            .unlock_order
            .iter()
            .copied()
            .find(|&k| !self.is_unlocked(k))?;
        self.unlock(next);
        Some(next)
    }

    /// Draw up to `count` distinct rarity-weighted options from the pool of
    /// abilities that can still grow. Empty once everything is maxed.
    pub fn generate_options(&self, rng: &mut Pcg32, count: usize) -> Vec<AbilityOption> {
        let mut pool: Vec<AbilityOption> = AbilityKind::ALL
            .iter()
            .filter_map(|&kind| {
                let rank = self.ranks[kind.index()];
                if !rank.unlocked {
                    Some(AbilityOption {
                        kind,
                        action: OptionAction::Unlock,
                        rarity: kind.rarity(),
                    })
                } else if rank.level < kind.max_level() {
                    Some(AbilityOption {
                        kind,
                        action: OptionAction::Upgrade,
                        rarity: kind.rarity().saturating_sub(1),
                    })
                } else {
                    None
                }
            })
            .collect();

        let mut options = Vec::with_capacity(count);
        while options.len() < count && !pool.is_empty() {
            let picked = Self::weighted_pick(rng, &pool);
            options.push(pool.swap_remove(picked));
        }
        options
    }

    /// Cumulative-weight scan; rarer options get lower weight
    fn weighted_pick(rng: &mut Pcg32, pool: &[AbilityOption]) -> usize {
        let weight = |o: &AbilityOption| (10 - o.rarity as i32).max(1) as f32;
        let total: f32 = pool.iter().map(weight).sum();
        let mut roll = rng.random_range(0.0..total);
        for (i, option) in pool.iter().enumerate() {
            roll -= weight(option);
            if roll <= 0.0 {
                return i;
            }
        }
        pool.len() - 1
    }

    /// Apply the option at `index`, returning what changed
    pub fn choose_option(
        &mut self,
        options: &[AbilityOption],
        index: usize,
    ) -> Option<AbilityChoice> {
        let option = options.get(index)?;
        let new_level = match option.action {
            OptionAction::Unlock => {
                self.unlock(option.kind);
                1
            }
            OptionAction::Upgrade => self.upgrade(option.kind),
        };
        Some(AbilityChoice {
            kind: option.kind,
            action: option.action,
            new_level,
        })
    }

    /// Maximum energy given a base capacity, including the passive bonus
    pub fn max_energy(&self, base: f32) -> f32 {
        match self.stats(AbilityKind::EnergyBoost) {
            Some(AbilityStats::EnergyBoost { bonus }) => base + bonus,
            _ => base,
        }
    }

    pub fn start_speed_boost(&mut self, boost: f32, until_ms: u64) {
        self.effects.speed_boost = Some(TimedEffect {
            magnitude: boost,
            until_ms,
        });
    }

    pub fn start_reflection(&mut self, chance: f32, until_ms: u64) {
        self.effects.reflection = Some(TimedEffect {
            magnitude: chance,
            until_ms,
        });
    }

    /// Movement multiplier including any active boost
    pub fn speed_multiplier(&self) -> f32 {
        match self.effects.speed_boost {
            Some(e) => 1.0 + e.magnitude,
            None => 1.0,
        }
    }

    /// Probability of turning a projectile back, zero when inactive
    pub fn reflection_chance(&self) -> f32 {
        match self.effects.reflection {
            Some(e) => e.magnitude,
            None => 0.0,
        }
    }

    pub fn has_reflection(&self) -> bool {
        self.effects.reflection.is_some()
    }

    /// Expire timed buffs
    pub fn update(&mut self, now_ms: u64) {
        if matches!(self.effects.speed_boost, Some(e) if now_ms >= e.until_ms) {
            self.effects.speed_boost = None;
        }
        if matches!(self.effects.reflection, Some(e) if now_ms >= e.until_ms) {
            self.effects.reflection = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(99)
    }

    #[test]
    fn test_starting_ability_is_reload() {
        let mut p = Progression::new(&mut rng());
        p.grant_starting_ability();

        assert!(p.is_unlocked(AbilityKind::Reload));
        assert_eq!(p.level(AbilityKind::Reload), 1);
        for kind in AbilityKind::ALL {
            if kind != AbilityKind::Reload {
                assert!(!p.is_unlocked(kind), "{} unlocked at start", kind.name());
            }
        }
    }

    #[test]
    fn test_stats_scale_with_level() {
        let l1 = stats_for(AbilityKind::Stun, 1);
        let l3 = stats_for(AbilityKind::Stun, 3);
        let (AbilityStats::Stun {
            radius: r1,
            cooldown_ms: c1,
            ..
        }, AbilityStats::Stun {
            radius: r3,
            cooldown_ms: c3,
            ..
        }) = (l1, l3)
        else {
            panic!("wrong stats shape");
        };
        assert!(r3 > r1);
        assert!(c3 < c1);
    }

    #[test]
    fn test_level_capped_at_max() {
        let mut p = Progression::new(&mut rng());
        p.unlock(AbilityKind::MultiStun);
        for _ in 0..10 {
            p.upgrade(AbilityKind::MultiStun);
        }
        assert_eq!(p.level(AbilityKind::MultiStun), AbilityKind::MultiStun.max_level());
    }

    #[test]
    fn test_locked_ability_has_no_stats() {
        let p = Progression::new(&mut rng());
        assert!(p.stats(AbilityKind::Stun).is_none());
    }

    #[test]
    fn test_options_are_distinct() {
        let mut r = rng();
        let p = Progression::new(&mut r);
        for _ in 0..20 {
            let options = p.generate_options(&mut r, 3);
            assert_eq!(options.len(), 3);
            assert!(options.iter().all(|o| o.action == OptionAction::Unlock));
            for i in 0..options.len() {
                for j in i + 1..options.len() {
                    assert_ne!(options[i].kind, options[j].kind);
                }
            }
        }
    }

    #[test]
    fn test_options_empty_when_everything_maxed() {
        let mut r = rng();
        let mut p = Progression::new(&mut r);
        for kind in AbilityKind::ALL {
            p.unlock(kind);
            for _ in 0..kind.max_level() {
                p.upgrade(kind);
            }
        }
        assert!(p.generate_options(&mut r, 3).is_empty());
    }

    #[test]
    fn test_choose_option_unlocks_then_upgrades() {
        let mut p = Progression::new(&mut rng());
        let options = [AbilityOption {
            kind: AbilityKind::Shield,
            action: OptionAction::Unlock,
            rarity: 2,
        }];
        let choice = p.choose_option(&options, 0).unwrap();
        assert_eq!(choice.new_level, 1);

        let options = [AbilityOption {
            kind: AbilityKind::Shield,
            action: OptionAction::Upgrade,
            rarity: 1,
        }];
        let choice = p.choose_option(&options, 0).unwrap();
        assert_eq!(choice.new_level, 2);
        assert!(p.choose_option(&options, 5).is_none());
    }

    #[test]
    fn test_common_options_appear_more_often() {
        let mut r = rng();
        let p = Progression::new(&mut r);
        let mut stun_count = 0;
        let mut reflect_count = 0;
        for _ in 0..500 {
            for o in p.generate_options(&mut r, 3) {
                match o.kind {
                    AbilityKind::Stun => stun_count += 1,
                    AbilityKind::Reflect => reflect_count += 1,
                    _ => {}
                }
            }
        }
        // Rarity 1 weight 9 vs rarity 5 weight 5
        assert!(stun_count > reflect_count);
    }

    #[test]
    fn test_unlock_next_in_order_walks_permutation() {
        let mut r = rng();
        let mut p = Progression::new(&mut r);
        let mut granted = Vec::new();
        while let Some(kind) = p.unlock_next_in_order() {
            granted.push(kind);
        }
        assert_eq!(granted.len(), AbilityKind::ALL.len());
        for kind in AbilityKind::ALL {
            assert!(p.is_unlocked(kind));
        }
    }

    #[test]
    fn test_timed_effects_expire() {
        let mut p = Progression::new(&mut rng());
        p.start_speed_boost(0.35, 5000);
        p.start_reflection(0.5, 8000);

        p.update(4999);
        assert!(p.speed_multiplier() > 1.0);
        assert!(p.has_reflection());

        p.update(5000);
        assert_eq!(p.speed_multiplier(), 1.0);
        assert!(p.has_reflection());

        p.update(8000);
        assert!(!p.has_reflection());
        assert_eq!(p.reflection_chance(), 0.0);
    }

    #[test]
    fn test_energy_boost_raises_max_energy() {
        let mut p = Progression::new(&mut rng());
        assert_eq!(p.max_energy(100.0), 100.0);
        p.unlock(AbilityKind::EnergyBoost);
        assert_eq!(p.max_energy(100.0), 180.0);
    }
}
