//! Input accumulation and per-tick snapshots
//!
//! Raw key and joystick events arrive between ticks and are folded into an
//! [`InputState`]. Once per tick the simulation takes a [`TickInput`]
//! snapshot; ability triggers are one-shot and are consumed by the snapshot
//! so a held key cannot re-fire.

use glam::Vec2;

/// Logical input buttons, mapped from device events by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Stun,
    Reload,
    Dash,
    Shield,
    Heal,
    SpeedBoost,
    MultiStun,
    Reflect,
    Pause,
    Restart,
}

/// One-shot ability and control triggers for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct Triggers {
    pub stun: bool,
    pub reload: bool,
    pub dash: bool,
    pub shield: bool,
    pub heal: bool,
    pub speed_boost: bool,
    pub multi_stun: bool,
    pub reflect: bool,
    pub pause: bool,
    pub restart: bool,
}

/// Immutable input snapshot consumed by one simulation tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Normalized movement intent; zero when idle
    pub movement: Vec2,
    pub triggers: Triggers,
}

impl TickInput {
    /// Dash direction: current movement intent, or straight up when idle
    pub fn dash_direction(&self) -> Vec2 {
        if self.movement == Vec2::ZERO {
            Vec2::new(0.0, -1.0)
        } else {
            self.movement.normalize_or_zero()
        }
    }
}

/// Accumulated device state between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    /// Virtual joystick vector; overrides key movement while engaged
    joystick: Option<Vec2>,
    pending: Triggers,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: Button) {
        match button {
            Button::Up => self.up = true,
            Button::Down => self.down = true,
            Button::Left => self.left = true,
            Button::Right => self.right = true,
            Button::Stun => self.pending.stun = true,
            Button::Reload => self.pending.reload = true,
            Button::Dash => self.pending.dash = true,
            Button::Shield => self.pending.shield = true,
            Button::Heal => self.pending.heal = true,
            Button::SpeedBoost => self.pending.speed_boost = true,
            Button::MultiStun => self.pending.multi_stun = true,
            Button::Reflect => self.pending.reflect = true,
            Button::Pause => self.pending.pause = true,
            Button::Restart => self.pending.restart = true,
        }
    }

    pub fn release(&mut self, button: Button) {
        match button {
            Button::Up => self.up = false,
            Button::Down => self.down = false,
            Button::Left => self.left = false,
            Button::Right => self.right = false,
            // Trigger buttons latch until the next snapshot drains them
            _ => {}
        }
    }

    /// Engage or update the virtual joystick. Magnitude above 1 is clamped.
    pub fn set_joystick(&mut self, dir: Vec2) {
        self.joystick = Some(dir.clamp_length_max(1.0));
    }

    pub fn clear_joystick(&mut self) {
        self.joystick = None;
    }

    /// Take the snapshot for this tick, draining one-shot triggers
    pub fn snapshot(&mut self) -> TickInput {
        let movement = match self.joystick {
            Some(dir) => dir,
            None => {
                let mut m = Vec2::ZERO;
                if self.up {
                    m.y -= 1.0;
                }
                if self.down {
                    m.y += 1.0;
                }
                if self.left {
                    m.x -= 1.0;
                }
                if self.right {
                    m.x += 1.0;
                }
                m.normalize_or_zero()
            }
        };

        let triggers = std::mem::take(&mut self.pending);
        TickInput { movement, triggers }
    }
}
