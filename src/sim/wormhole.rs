//! The central wormhole hub: banking zone and core safe zone
//!
//! One instance may be shared read-only by every grid; the orchestrator
//! updates it exactly once per tick, before any grid runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wormhole {
    pub pos: Vec2,
    /// Visual rotation (render hint)
    pub rotation: f32,
    /// Banking-pulse animation phase (render hint)
    pub pulse_phase: f32,
}

impl Wormhole {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
            rotation: 0.0,
            pulse_phase: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.rotation = crate::normalize_angle(self.rotation + HUB_ROTATION_RATE * dt);
        self.pulse_phase = (self.pulse_phase + dt * 2.0) % std::f32::consts::TAU;
    }

    /// Inside the outer deposit-eligibility radius?
    pub fn in_bank_zone(&self, pos: Vec2) -> bool {
        self.pos.distance(pos) <= HUB_BANK_RADIUS
    }

    /// Inside the inner core zone (safe during nuke blasts)?
    pub fn in_core(&self, pos: Vec2) -> bool {
        self.pos.distance(pos) <= HUB_CORE_RADIUS
    }
}

impl Default for Wormhole {
    fn default() -> Self {
        Self::new()
    }
}
