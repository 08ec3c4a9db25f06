//! Resource orbs and their weighted type distribution

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Orb categories, drawn from a fixed weighted distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbKind {
    Red,
    Blue,
    Green,
    Gold,
}

/// Spawn weights, cumulative-sampled. Must sum to 1.0.
const ORB_WEIGHTS: [(OrbKind, f32); 4] = [
    (OrbKind::Red, 0.35),
    (OrbKind::Blue, 0.30),
    (OrbKind::Green, 0.25),
    (OrbKind::Gold, 0.10),
];

impl OrbKind {
    /// Draw a kind from the weighted distribution
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        let roll: f32 = rng.random();
        let mut cumulative = 0.0;
        for (kind, weight) in ORB_WEIGHTS {
            cumulative += weight;
            if roll < cumulative {
                return kind;
            }
        }
        // Float rounding at the top of the range
        OrbKind::Gold
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrbKind::Red => "red",
            OrbKind::Blue => "blue",
            OrbKind::Green => "green",
            OrbKind::Gold => "gold",
        }
    }
}

/// A collectible orb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub id: u32,
    pub pos: Vec2,
    pub kind: OrbKind,
    /// Bob animation phase (render hint)
    pub bob_phase: f32,
}

impl Orb {
    pub fn new(id: u32, pos: Vec2, kind: OrbKind) -> Self {
        Self {
            id,
            pos,
            kind,
            bob_phase: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.bob_phase = (self.bob_phase + dt * 3.0) % std::f32::consts::TAU;
    }

    /// Radius-based pickup test against a ship
    pub fn collides_ship(&self, ship_pos: Vec2, ship_radius: f32) -> bool {
        self.pos.distance(ship_pos) <= crate::consts::ORB_RADIUS + ship_radius
    }
}
