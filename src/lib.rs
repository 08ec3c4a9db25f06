//! Orb Rush - a competitive orb-banking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, hazards, bots, game state)
//! - `tuning`: Data-driven bot difficulty presets

pub mod sim;
pub mod tuning;

pub use tuning::BotSkill;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 10;

    /// World dimensions (toroidal - all four edges wrap)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Wormhole hub radii
    pub const HUB_CORE_RADIUS: f32 = 50.0;
    pub const HUB_BANK_RADIUS: f32 = 90.0;
    pub const HUB_ROTATION_RATE: f32 = 0.8;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 12.0;
    pub const SHIP_TURN_RATE: f32 = 4.5;
    pub const SHIP_THRUST: f32 = 300.0;
    pub const SHIP_MAX_SPEED: f32 = 250.0;
    /// Multiplicative velocity drag applied once per tick
    pub const SHIP_DRAG: f32 = 0.985;
    pub const SHIP_START_LIVES: u8 = 3;
    pub const CARGO_SLOTS: usize = 4;
    /// Invulnerability window granted on damage (seconds)
    pub const INVULN_TIME: f32 = 2.0;
    /// Blink frequency while invulnerable (render hint only)
    pub const INVULN_BLINK_HZ: f32 = 10.0;
    /// Ship spawn point (below the hub)
    pub const SHIP_SPAWN_X: f32 = WORLD_WIDTH / 2.0;
    pub const SHIP_SPAWN_Y: f32 = WORLD_HEIGHT - 150.0;

    /// Orb spawner
    pub const ORB_RADIUS: f32 = 10.0;
    pub const ORB_CAP: usize = 12;
    pub const ORB_SPAWN_MIN_INTERVAL: f32 = 1.0;
    pub const ORB_SPAWN_MAX_INTERVAL: f32 = 3.0;
    pub const ORB_PLACEMENT_ATTEMPTS: u32 = 50;
    pub const ORB_MIN_HUB_DIST: f32 = 120.0;
    pub const ORB_EDGE_MARGIN: f32 = 40.0;
    pub const ORB_MIN_SEPARATION: f32 = 50.0;

    /// Hazard tuning
    pub const ASTEROID_RADIUS_SMALL: f32 = 14.0;
    pub const ASTEROID_RADIUS_LARGE: f32 = 26.0;
    pub const ASTEROID_LIFETIME: f32 = 20.0;
    pub const SEEKER_RADIUS: f32 = 10.0;
    /// Seeker speed as a fraction of ship max speed
    pub const SEEKER_SPEED_FRACTION: f32 = 0.55;
    pub const SEEKER_LIFETIME: f32 = 12.0;
    pub const MINE_BODY_RADIUS: f32 = 12.0;
    pub const MINE_BLAST_RADIUS: f32 = 70.0;
    pub const MINE_ARM_DELAY: f32 = 1.5;
    pub const MINE_LIFETIME: f32 = 25.0;
    pub const NUKE_COUNTDOWN: f32 = 5.0;
    pub const NUKE_BLAST_DURATION: f32 = 2.5;
    pub const NUKE_MAX_RADIUS: f32 = 1000.0;
    /// Corner safe-zone radius during a nuke blast
    pub const NUKE_CORNER_SAFE_RADIUS: f32 = 80.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 420.0;
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const BULLET_LIFETIME: f32 = 1.2;
    pub const BULLET_COOLDOWN: f32 = 0.25;

    /// Attack message display time (seconds)
    pub const ATTACK_MSG_TIME: f32 = 3.0;
    /// Kill feed length cap (newest first)
    pub const KILL_FEED_CAP: usize = 5;
    /// Banking-proximity pulse step per tick
    pub const BANK_PULSE_STEP: f32 = 0.05;
}

/// Normalize an angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Shortest signed angular delta from `from` to `to`, in [-π, π)
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Wrap a position onto the toroidal world, returning the wrapped position
/// and the applied shift (so render-interpolation snapshots can follow)
#[inline]
pub fn wrap_position(pos: Vec2) -> (Vec2, Vec2) {
    let wrapped = Vec2::new(
        pos.x.rem_euclid(consts::WORLD_WIDTH),
        pos.y.rem_euclid(consts::WORLD_HEIGHT),
    );
    (wrapped, wrapped - pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_range() {
        for a in [-10.0, -PI, 0.0, 1.0, PI, 7.5] {
            let n = normalize_angle(a);
            assert!((-PI..PI).contains(&n), "normalize({a}) = {n}");
        }
    }

    #[test]
    fn test_shortest_delta_crosses_seam() {
        // From just below +π to just above -π is a tiny positive step
        let d = shortest_angle_delta(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_position_shift() {
        let (wrapped, shift) = wrap_position(Vec2::new(-10.0, consts::WORLD_HEIGHT + 5.0));
        assert!((wrapped.x - (consts::WORLD_WIDTH - 10.0)).abs() < 1e-3);
        assert!((wrapped.y - 5.0).abs() < 1e-3);
        assert!((shift.x - consts::WORLD_WIDTH).abs() < 1e-3);
        assert!((shift.y + consts::WORLD_HEIGHT).abs() < 1e-3);
    }
}
