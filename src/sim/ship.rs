//! Player/bot ship: physics integration, cargo hold, lives

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::orb::OrbKind;
use crate::consts::*;
use crate::{normalize_angle, wrap_position};

/// Boolean control inputs, written by the input layer or a bot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipInput {
    pub thrust: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

/// A ship entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians
    pub angle: f32,
    /// Previous pose, for render interpolation only (not simulation truth)
    #[serde(skip)]
    pub prev_pos: Vec2,
    #[serde(skip)]
    pub prev_angle: f32,
    pub input: ShipInput,
    /// Fixed-capacity cargo hold, slot order preserved
    pub cargo: [Option<OrbKind>; CARGO_SLOTS],
    pub lives: u8,
    /// Seconds of invulnerability remaining
    pub invuln: f32,
    /// Transient speed multiplier; resets to 1 every tick unless a boost
    /// zone renews it
    pub speed_boost: f32,
    /// Seconds until the next bullet may fire
    pub fire_cooldown: f32,
}

impl Ship {
    pub fn new() -> Self {
        let spawn = Vec2::new(SHIP_SPAWN_X, SHIP_SPAWN_Y);
        Self {
            pos: spawn,
            vel: Vec2::ZERO,
            angle: -std::f32::consts::FRAC_PI_2, // Facing up, toward the hub
            prev_pos: spawn,
            prev_angle: -std::f32::consts::FRAC_PI_2,
            input: ShipInput::default(),
            cargo: [None; CARGO_SLOTS],
            lives: SHIP_START_LIVES,
            invuln: 0.0,
            speed_boost: 1.0,
            fire_cooldown: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Integrate one fixed timestep. Dead ships do not move.
    pub fn update(&mut self, dt: f32) {
        if !self.is_alive() {
            return;
        }

        self.prev_pos = self.pos;
        self.prev_angle = self.angle;

        // Consume the boost granted last tick; zone containment checks
        // later in the grid tick may renew it for the next one
        let boost = self.speed_boost;
        self.speed_boost = 1.0;

        if self.input.rotate_left {
            self.angle -= SHIP_TURN_RATE * dt;
        }
        if self.input.rotate_right {
            self.angle += SHIP_TURN_RATE * dt;
        }
        self.angle = normalize_angle(self.angle);

        if self.input.thrust {
            self.vel += Vec2::from_angle(self.angle) * SHIP_THRUST * boost * dt;
        }
        self.vel = self.vel.clamp_length_max(SHIP_MAX_SPEED * boost);
        self.vel *= SHIP_DRAG;

        self.pos += self.vel * dt;
        let (wrapped, shift) = wrap_position(self.pos);
        self.pos = wrapped;
        // Shift the interpolation snapshot by the same wrap delta so the
        // render layer never lerps across a seam
        self.prev_pos += shift;

        self.invuln = (self.invuln - dt).max(0.0);
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
    }

    /// Apply one hit. No-op while invulnerable or dead.
    ///
    /// Returns true if this hit was fatal (lives reached 0).
    pub fn take_damage(&mut self) -> bool {
        if self.invuln > 0.0 || !self.is_alive() {
            return false;
        }
        self.lives -= 1;
        self.cargo = [None; CARGO_SLOTS];
        self.invuln = INVULN_TIME;
        self.lives == 0
    }

    /// Fill the first empty cargo slot. Returns false if the hold is full.
    pub fn add_cargo(&mut self, kind: OrbKind) -> bool {
        for slot in self.cargo.iter_mut() {
            if slot.is_none() {
                *slot = Some(kind);
                return true;
            }
        }
        false
    }

    /// Empty every slot, returning the contents in slot order.
    pub fn clear_cargo(&mut self) -> Vec<OrbKind> {
        let mut drained = Vec::with_capacity(CARGO_SLOTS);
        for slot in self.cargo.iter_mut() {
            if let Some(kind) = slot.take() {
                drained.push(kind);
            }
        }
        drained
    }

    /// Remove a single slot's content. Out-of-range indices are ignored.
    pub fn remove_cargo_at(&mut self, index: usize) -> Option<OrbKind> {
        self.cargo.get_mut(index).and_then(|slot| slot.take())
    }

    pub fn cargo_count(&self) -> usize {
        self.cargo.iter().filter(|s| s.is_some()).count()
    }

    pub fn cargo_full(&self) -> bool {
        self.cargo_count() == CARGO_SLOTS
    }

    /// Cargo fullness in [0, 1], used by bot bank thresholds
    pub fn cargo_ratio(&self) -> f32 {
        self.cargo_count() as f32 / CARGO_SLOTS as f32
    }

    /// Whether a bullet may fire this tick; starts the cooldown if so.
    pub fn try_fire(&mut self) -> bool {
        if !self.is_alive() || self.fire_cooldown > 0.0 {
            return false;
        }
        self.fire_cooldown = BULLET_COOLDOWN;
        true
    }

    /// Render-layer visibility: blinks while invulnerable. Never affects
    /// collision.
    pub fn visible(&self) -> bool {
        if self.invuln <= 0.0 {
            return true;
        }
        (self.invuln * INVULN_BLINK_HZ) as i32 % 2 == 0
    }

    /// Return the ship to its initial state (round restart)
    pub fn reset(&mut self) {
        *self = Ship::new();
    }
}

impl Default for Ship {
    fn default() -> Self {
        Self::new()
    }
}
