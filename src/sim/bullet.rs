//! Player bullets: straight-line, toroidal, one hazard kill each

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::wrap_position;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub lifetime: f32,
}

impl Bullet {
    /// Fire from a ship's nose along its facing
    pub fn new(id: u32, ship_pos: Vec2, ship_angle: f32) -> Self {
        let dir = Vec2::from_angle(ship_angle);
        Self {
            id,
            pos: ship_pos + dir * SHIP_RADIUS,
            vel: dir * BULLET_SPEED,
            lifetime: BULLET_LIFETIME,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        let (wrapped, _) = wrap_position(self.pos);
        self.pos = wrapped;
        self.lifetime -= dt;
    }

    pub fn expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    pub fn hits(&self, target_pos: Vec2, target_radius: f32) -> bool {
        self.pos.distance(target_pos) <= BULLET_RADIUS + target_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_travels_and_expires() {
        let mut b = Bullet::new(1, Vec2::new(100.0, 100.0), 0.0);
        let start_x = b.pos.x;
        b.update(SIM_DT);
        assert!(b.pos.x > start_x);
        assert!(!b.expired());
        b.lifetime = 0.0;
        assert!(b.expired());
    }

    #[test]
    fn test_bullet_wraps() {
        let mut b = Bullet::new(1, Vec2::new(WORLD_WIDTH - 5.0, 100.0), 0.0);
        for _ in 0..10 {
            b.update(SIM_DT);
        }
        assert!((0.0..WORLD_WIDTH).contains(&b.pos.x));
    }
}
