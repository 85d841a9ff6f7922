//! Property tests over the simulation core

use glam::Vec2;
use proptest::prelude::*;

use last_line::consts::*;
use last_line::sim::{
    AbilityKind, DebugCommand, GameState, TickInput, Triggers, debug, stats_for, tick,
};
use last_line::{distance, normalize_or_zero};

proptest! {
    #[test]
    fn distance_is_symmetric_and_nonnegative(
        ax in -500.0f32..500.0, ay in -500.0f32..500.0,
        bx in -500.0f32..500.0, by in -500.0f32..500.0,
    ) {
        let a = Vec2::new(ax, ay);
        let b = Vec2::new(bx, by);
        prop_assert!(distance(a, b) >= 0.0);
        prop_assert!((distance(a, b) - distance(b, a)).abs() < 1e-4);
    }

    #[test]
    fn normalize_output_is_unit_or_zero(x in -100.0f32..100.0, y in -100.0f32..100.0) {
        let n = normalize_or_zero(Vec2::new(x, y));
        let len = n.length();
        prop_assert!(len == 0.0 || (len - 1.0).abs() < 1e-5);
    }

    /// Cooldowns never grow and never underflow as an ability levels up
    #[test]
    fn cooldowns_shrink_monotonically(kind_idx in 0usize..9) {
        let kind = AbilityKind::ALL[kind_idx];
        let mut prev = None;
        for level in 1..=kind.max_level() {
            if let Some(cd) = stats_for(kind, level).cooldown_ms() {
                if let Some(p) = prev {
                    prop_assert!(cd <= p);
                }
                prop_assert!(cd > 0);
                prev = Some(cd);
            }
        }
    }

    /// Energy stays within [0, max] under arbitrary input sequences
    #[test]
    fn energy_stays_in_bounds(seed in 0u64..10_000, triggers in prop::collection::vec(0u8..8, 0..200)) {
        let mut state = GameState::new(seed);
        for t in triggers {
            let mut input = TickInput::default();
            input.triggers = Triggers {
                stun: t == 0,
                reload: t == 1,
                dash: t == 2,
                shield: t == 3,
                heal: t == 4,
                speed_boost: t == 5,
                multi_stun: t == 6,
                reflect: t == 7,
                ..Default::default()
            };
            let _ = tick(&mut state, &input);
            prop_assert!(state.player.energy >= 0.0);
            prop_assert!(state.player.energy <= state.player.max_energy);
        }
    }

    /// Wave escalation is monotonic and respects every cap and floor
    #[test]
    fn escalation_is_bounded(seed in 0u64..10_000, advances in 1usize..60) {
        let mut state = GameState::new(seed);
        let mut prev_quota = state.wave_quota;
        let mut prev_interval = state.spawn_interval_ms;
        let mut prev_speed = state.enemy_speed;

        for _ in 0..advances {
            debug::apply(&mut state, DebugCommand::ForceWave);
            state.pending_options = None;
            state.phase = last_line::sim::GamePhase::Playing;

            prop_assert!(state.wave_quota >= prev_quota);
            prop_assert!(state.wave_quota <= MAX_WAVE_QUOTA);
            prop_assert!(state.spawn_interval_ms <= prev_interval);
            prop_assert!(state.spawn_interval_ms >= MIN_SPAWN_INTERVAL_MS);
            prop_assert!(state.enemy_speed >= prev_speed);
            prop_assert!(state.enemy_speed <= ENEMY_MAX_SPEED + 1e-6);

            prev_quota = state.wave_quota;
            prev_interval = state.spawn_interval_ms;
            prev_speed = state.enemy_speed;
        }
    }

    /// Same seed and same inputs give the same trajectory
    #[test]
    fn identical_runs_stay_identical(seed in 0u64..10_000, moves in prop::collection::vec(0u8..5, 1..150)) {
        let mut a = GameState::new(seed);
        let mut b = GameState::new(seed);

        for m in moves {
            let movement = match m {
                0 => Vec2::ZERO,
                1 => Vec2::new(0.0, -1.0),
                2 => Vec2::new(0.0, 1.0),
                3 => Vec2::new(-1.0, 0.0),
                _ => Vec2::new(1.0, 0.0),
            };
            let input = TickInput { movement, ..Default::default() };
            let _ = tick(&mut a, &input);
            let _ = tick(&mut b, &input);
        }

        prop_assert_eq!(a.now_ms, b.now_ms);
        prop_assert_eq!(a.phase, b.phase);
        prop_assert_eq!(a.wave, b.wave);
        prop_assert_eq!(a.player.pos, b.player.pos);
        prop_assert_eq!(a.player.energy, b.player.energy);
        prop_assert_eq!(a.enemies.len(), b.enemies.len());
    }

    /// Generated choice cards are always distinct abilities
    #[test]
    fn choice_cards_are_distinct(seed in 0u64..10_000) {
        let mut state = GameState::new(seed);
        debug::apply(&mut state, DebugCommand::ForceWave);
        if let Some(options) = &state.pending_options {
            for i in 0..options.len() {
                for j in i + 1..options.len() {
                    prop_assert_ne!(options[i].kind, options[j].kind);
                }
            }
        }
    }
}
