//! Game state and core simulation types
//!
//! All live entity state for a run lives here. The update methods on the
//! entity types are self-contained; activation gating (cooldowns, energy
//! costs) is the ability engine's job, not theirs.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::abilities::AbilityEngine;
use super::input::TickInput;
use super::progression::{AbilityOption, Progression};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{distance, normalize_or_zero};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Between-wave ability pick; simulation frozen until a choice is made
    ChoosingAbility,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Cosmetic severity tiering used by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DangerLevel {
    #[default]
    Safe,
    Warning,
    Critical,
}

/// An in-progress dash window
#[derive(Debug, Clone, Copy)]
pub struct Dash {
    pub dir: Vec2,
    pub since_ms: u64,
    pub speed_mult: f32,
    pub duration_ms: u64,
}

/// An active shield window
#[derive(Debug, Clone, Copy)]
pub struct Shield {
    pub since_ms: u64,
    pub duration_ms: u64,
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub energy: f32,
    pub max_energy: f32,
    base_max_energy: f32,
    energy_drain: f32,
    pub dash: Option<Dash>,
    pub shield: Option<Shield>,
    /// Post-hit grace window end
    pub invulnerable_until: Option<u64>,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning, progression: &Progression) -> Self {
        let max_energy = progression.max_energy(tuning.player.max_energy);
        Self {
            pos,
            size: tuning.player.size,
            speed: tuning.player.speed,
            energy: max_energy,
            max_energy,
            base_max_energy: tuning.player.max_energy,
            energy_drain: tuning.player.energy_drain,
            dash: None,
            shield: None,
            invulnerable_until: None,
        }
    }

    /// Advance the player by one tick: movement, window expiry, energy drain.
    ///
    /// Dash movement overrides normal input-driven movement. Diagonal input
    /// arrives pre-normalized from the input layer.
    pub fn update(
        &mut self,
        input: &TickInput,
        now_ms: u64,
        arena: Vec2,
        progression: &Progression,
    ) {
        let speed = self.speed * progression.speed_multiplier();

        let delta = match self.dash {
            Some(d) if now_ms - d.since_ms < d.duration_ms => d.dir * speed * d.speed_mult,
            _ => {
                self.dash = None;
                input.movement * speed
            }
        };
        self.pos += delta;

        // Keep in bounds, inset by the visual size
        self.pos.x = self.pos.x.clamp(self.size, arena.x - self.size);
        self.pos.y = self.pos.y.clamp(self.size, arena.y - self.size);

        self.expire_windows(now_ms);
        self.max_energy = progression.max_energy(self.base_max_energy);
        self.energy = (self.energy - self.energy_drain).max(0.0);
    }

    fn expire_windows(&mut self, now_ms: u64) {
        if let Some(d) = self.dash
            && now_ms - d.since_ms >= d.duration_ms
        {
            self.dash = None;
        }
        if let Some(s) = self.shield
            && now_ms - s.since_ms > s.duration_ms
        {
            self.shield = None;
        }
        if let Some(until) = self.invulnerable_until
            && now_ms >= until
        {
            self.invulnerable_until = None;
        }
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_some()
    }

    pub fn has_shield(&self) -> bool {
        self.shield.is_some()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_until.is_some()
    }

    /// Direct mutator, no validation (the ability engine gates activation)
    pub fn start_dash(&mut self, dir: Vec2, speed_mult: f32, duration_ms: u64, now_ms: u64) {
        self.dash = Some(Dash {
            dir,
            since_ms: now_ms,
            speed_mult,
            duration_ms,
        });
    }

    /// Direct mutator, no validation
    pub fn activate_shield(&mut self, duration_ms: u64, now_ms: u64) {
        self.shield = Some(Shield {
            since_ms: now_ms,
            duration_ms,
        });
    }

    pub fn collect_power_up(&mut self, power_up: &PowerUp) {
        self.energy = (self.energy + power_up.energy_bonus).min(self.max_energy);
    }

    /// Restore energy, clamped to the current maximum
    pub fn restore_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).min(self.max_energy);
    }

    /// Effective collision radius, smaller than the visual size
    pub fn hitbox_radius(&self) -> f32 {
        self.size * PLAYER_HITBOX_SCALE
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Basic,
    Fast,
    Shooter,
}

impl EnemyKind {
    pub fn speed_mult(self) -> f32 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Fast => 1.8,
            EnemyKind::Shooter => 0.6,
        }
    }

    pub fn size_mult(self) -> f32 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Fast => 0.8,
            EnemyKind::Shooter => 1.2,
        }
    }

    /// Minimum interval between shots (shooters only)
    pub fn shoot_rate_ms(self) -> u64 {
        2000
    }

    /// Maximum firing distance (shooters only)
    pub fn shoot_range(self) -> f32 {
        150.0
    }
}

/// A hostile entity that steers toward the player
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub size: f32,
    pub speed: f32,
    pub stunned_until: Option<u64>,
    pub last_shot: Option<u64>,
}

impl Enemy {
    pub fn new(pos: Vec2, kind: EnemyKind, wave_speed: f32) -> Self {
        Self {
            pos,
            kind,
            size: ENEMY_SIZE * kind.size_mult(),
            speed: wave_speed * kind.speed_mult(),
            stunned_until: None,
            last_shot: None,
        }
    }

    /// Two-state machine: stunned enemies are fully inert until expiry,
    /// active enemies steer toward the player and (shooters) fire.
    pub fn update(&mut self, player: &Player, now_ms: u64, projectiles: &mut Vec<Projectile>) {
        if self.is_stunned(now_ms) {
            return;
        }
        self.stunned_until = None;

        let to_player = normalize_or_zero(player.pos - self.pos);
        self.pos += to_player * self.speed;

        if self.kind == EnemyKind::Shooter {
            self.try_shoot(player, now_ms, projectiles);
        }
    }

    fn try_shoot(&mut self, player: &Player, now_ms: u64, projectiles: &mut Vec<Projectile>) {
        let ready = match self.last_shot {
            None => true,
            Some(t) => now_ms - t >= self.kind.shoot_rate_ms(),
        };
        if !ready || distance(self.pos, player.pos) > self.kind.shoot_range() {
            return;
        }

        let dir = normalize_or_zero(player.pos - self.pos);
        if dir == Vec2::ZERO {
            return;
        }
        projectiles.push(Projectile::new(self.pos, dir));
        self.last_shot = Some(now_ms);
    }

    pub fn is_stunned(&self, now_ms: u64) -> bool {
        matches!(self.stunned_until, Some(until) if now_ms < until)
    }

    pub fn stun(&mut self, now_ms: u64, duration_ms: u64) {
        self.stunned_until = Some(now_ms + duration_ms);
    }

    pub fn hitbox_radius(&self) -> f32 {
        self.size * ENEMY_HITBOX_SCALE
    }

    /// Spawn just outside a uniformly chosen arena edge
    pub fn spawn_at_edge(rng: &mut Pcg32, arena: Vec2, kind: EnemyKind, wave_speed: f32) -> Self {
        let offset = ENEMY_SIZE;
        let pos = match rng.random_range(0..4u8) {
            0 => Vec2::new(rng.random_range(0.0..arena.x), -offset),
            1 => Vec2::new(arena.x + offset, rng.random_range(0.0..arena.y)),
            2 => Vec2::new(rng.random_range(0.0..arena.x), arena.y + offset),
            _ => Vec2::new(-offset, rng.random_range(0.0..arena.y)),
        };
        Enemy::new(pos, kind, wave_speed)
    }
}

/// A shooter-fired projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub dir: Vec2,
    pub speed: f32,
    pub size: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, dir: Vec2) -> Self {
        Self {
            pos,
            dir,
            speed: PROJECTILE_SPEED,
            size: PROJECTILE_SIZE,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.dir * self.speed;
    }

    pub fn hitbox_radius(&self) -> f32 {
        self.size * PROJECTILE_HITBOX_SCALE
    }

    pub fn is_off_bounds(&self, arena: Vec2) -> bool {
        self.pos.x < -OFFSCREEN_MARGIN
            || self.pos.x > arena.x + OFFSCREEN_MARGIN
            || self.pos.y < -OFFSCREEN_MARGIN
            || self.pos.y > arena.y + OFFSCREEN_MARGIN
    }
}

/// A collectible energy pickup
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: f32,
    pub energy_bonus: f32,
    /// Cosmetic pulse, 0..1
    pub glow: f32,
    phase: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, energy_bonus: f32) -> Self {
        Self {
            pos,
            size: POWERUP_SIZE,
            energy_bonus,
            glow: 0.0,
            phase: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.phase += 0.1;
        self.glow = self.phase.sin() * 0.5 + 0.5;
    }

    pub fn collection_radius(&self) -> f32 {
        self.size * POWERUP_COLLECTION_SCALE
    }

    /// Spawn biased away from the player: retry up to 10 placements before
    /// accepting whatever the last roll gave
    pub fn spawn_in_safe_area(
        rng: &mut Pcg32,
        arena: Vec2,
        player_pos: Vec2,
        tuning: &Tuning,
    ) -> Self {
        let mut pos = Vec2::ZERO;
        for _ in 0..10 {
            pos = Vec2::new(
                rng.random_range(20.0..arena.x - 20.0),
                rng.random_range(20.0..arena.y - 20.0),
            );
            if distance(pos, player_pos) >= tuning.power_ups.safe_distance {
                break;
            }
        }
        PowerUp::new(pos, tuning.power_ups.energy_bonus)
    }
}

/// Particle burst sources, mapped to colors by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstKind {
    ShieldAbsorb,
    Collection,
}

/// A short-lived visual particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub kind: BurstKind,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, life: f32, size: f32, kind: BurstKind) -> Self {
        Self {
            pos,
            vel,
            life,
            max_life: life,
            size,
            kind,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel *= PARTICLE_FRICTION;
        self.life -= PARTICLE_DECAY;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Fade alpha for rendering
    pub fn alpha(&self) -> f32 {
        self.life / self.max_life
    }

    /// 6 particles in a ring, spawned when a shield absorbs a hit
    pub fn shield_burst(pos: Vec2) -> Vec<Particle> {
        Self::ring(pos, 6, 4.0, 0.8, 4.0, BurstKind::ShieldAbsorb)
    }

    /// 8 particles in a ring, spawned on power-up collection
    pub fn collection_burst(pos: Vec2) -> Vec<Particle> {
        Self::ring(pos, 8, 3.0, 1.0, 3.0, BurstKind::Collection)
    }

    fn ring(pos: Vec2, count: u32, speed: f32, life: f32, size: f32, kind: BurstKind) -> Vec<Particle> {
        (0..count)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / count as f32;
                let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
                Particle::new(pos, vel, life, size, kind)
            })
            .collect()
    }
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation clock, advanced by TICK_MS per tick
    pub now_ms: u64,
    pub phase: GamePhase,
    /// Bumped on restart; stale deferred effects check this before firing
    pub generation: u32,
    pub tuning: Tuning,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,

    pub progression: Progression,
    pub abilities: AbilityEngine,

    // Wave management
    pub wave: u32,
    pub wave_quota: u32,
    pub spawned_this_wave: u32,
    pub wave_started_at: u64,
    pub enemy_speed: f32,
    pub spawn_interval_ms: u64,
    pub last_enemy_spawn: Option<u64>,
    pub last_powerup_spawn: u64,

    /// Ability options awaiting a pick while in ChoosingAbility
    pub pending_options: Option<Vec<AbilityOption>>,

    // Debug state; visualization itself is the renderer's job
    pub god_mode: bool,
    pub show_hitboxes: bool,

    pub danger_level: DangerLevel,
}

impl GameState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut progression = Progression::new(&mut rng);
        // The emergency ability: every run starts with basic reload
        progression.grant_starting_ability();

        let arena = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT);
        let player = Player::new(arena / 2.0, &tuning, &progression);

        Self {
            seed,
            rng,
            now_ms: 0,
            phase: GamePhase::Playing,
            generation: 0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            progression,
            abilities: AbilityEngine::new(),
            wave: 1,
            wave_quota: tuning.waves.initial_quota,
            spawned_this_wave: 0,
            wave_started_at: 0,
            enemy_speed: tuning.enemies.base_speed,
            spawn_interval_ms: tuning.enemies.initial_spawn_interval_ms,
            last_enemy_spawn: None,
            last_powerup_spawn: 0,
            pending_options: None,
            god_mode: false,
            show_hitboxes: false,
            danger_level: DangerLevel::Safe,
            tuning,
        }
    }

    pub fn arena(&self) -> Vec2 {
        Vec2::new(ARENA_WIDTH, ARENA_HEIGHT)
    }

    /// Elapsed run time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms
    }

    /// Discard all live entities and timers and begin a fresh run.
    ///
    /// The generation bump invalidates any still-scheduled deferred effects
    /// from the previous run.
    pub fn restart(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.now_ms = 0;
        self.phase = GamePhase::Playing;

        self.progression.reset(&mut self.rng);
        self.progression.grant_starting_ability();
        self.abilities = AbilityEngine::new();

        let arena = self.arena();
        self.player = Player::new(arena / 2.0, &self.tuning, &self.progression);
        self.enemies.clear();
        self.projectiles.clear();
        self.power_ups.clear();
        self.particles.clear();

        self.wave = 1;
        self.wave_quota = self.tuning.waves.initial_quota;
        self.spawned_this_wave = 0;
        self.wave_started_at = 0;
        self.enemy_speed = self.tuning.enemies.base_speed;
        self.spawn_interval_ms = self.tuning.enemies.initial_spawn_interval_ms;
        self.last_enemy_spawn = None;
        self.last_powerup_spawn = 0;
        self.pending_options = None;
        self.danger_level = DangerLevel::Safe;

        log::info!("run restarted (generation {})", self.generation);
    }
}
