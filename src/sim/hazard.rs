//! Hazard variants and boost zones
//!
//! Four hazard kinds share one capability contract (update, collide-test,
//! expiry) but carry independent state machines, so they live in a tagged
//! enum rather than an inheritance tree. `BoostZone` is the related
//! non-colliding area trigger.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::wrap_position;

/// Linear-motion rock that reflects elastically off world boundaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Visual spin (render hint)
    pub rotation: f32,
    pub spin: f32,
    pub lifetime: f32,
}

impl Asteroid {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            rotation: 0.0,
            spin: 1.2,
            lifetime: ASTEROID_LIFETIME,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;

        // Elastic reflection: negate the offending component, clamp back
        // onto the boundary
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = -self.vel.x;
        } else if self.pos.x > WORLD_WIDTH {
            self.pos.x = WORLD_WIDTH;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.vel.y = -self.vel.y;
        } else if self.pos.y > WORLD_HEIGHT {
            self.pos.y = WORLD_HEIGHT;
            self.vel.y = -self.vel.y;
        }

        self.rotation += self.spin * dt;
        self.lifetime -= dt;
    }
}

/// Homing drone: inert until a target ship is assigned on delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeekerDrone {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub has_target: bool,
    wobble_a: f32,
    wobble_b: f32,
    pub lifetime: f32,
}

impl SeekerDrone {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            has_target: false,
            wobble_a: 0.0,
            wobble_b: 0.0,
            lifetime: SEEKER_LIFETIME,
        }
    }

    pub fn update(&mut self, dt: f32, target: Vec2) {
        self.lifetime -= dt;
        if !self.has_target {
            self.vel = Vec2::ZERO;
            return;
        }

        // Perturb the pursuit direction with a two-axis wobble so the
        // drone weaves instead of railing straight in
        self.wobble_a += dt * 5.0;
        self.wobble_b += dt * 3.7;
        let dir = (target - self.pos).normalize_or_zero();
        let wobble = Vec2::new(self.wobble_a.sin(), self.wobble_b.cos()) * 0.35;
        let heading = (dir + wobble).normalize_or_zero();

        self.vel = heading * SHIP_MAX_SPEED * SEEKER_SPEED_FRACTION;
        self.pos += self.vel * dt;
        let (wrapped, _) = wrap_position(self.pos);
        self.pos = wrapped;
    }
}

/// Stationary mine: body-contact only until armed, then a wide blast radius
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mine {
    pub id: u32,
    pub pos: Vec2,
    /// Seconds since spawn; arms after `MINE_ARM_DELAY`
    pub age: f32,
    pub lifetime: f32,
}

impl Mine {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            age: 0.0,
            lifetime: MINE_LIFETIME,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        self.lifetime -= dt;
    }

    pub fn armed(&self) -> bool {
        self.age >= MINE_ARM_DELAY
    }

    /// Armed mines blink (render hint)
    pub fn blinking(&self) -> bool {
        self.armed() && (self.age * 6.0) as i32 % 2 == 0
    }

    pub fn collides_ship(&self, ship_pos: Vec2, ship_radius: f32) -> bool {
        let dist = self.pos.distance(ship_pos);
        if self.armed() {
            dist <= MINE_BLAST_RADIUS
        } else {
            dist <= MINE_BODY_RADIUS + ship_radius
        }
    }
}

/// Nuke phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NukeState {
    Countdown,
    Detonated,
}

/// Hub-centered nuke: harmless countdown, then an expanding blast that
/// spares the hub core and the four world corners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nuke {
    pub id: u32,
    pub pos: Vec2,
    pub state: NukeState,
    /// Seconds of countdown remaining
    pub countdown: f32,
    /// Seconds since detonation
    pub blast_elapsed: f32,
    pub active: bool,
}

impl Nuke {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            state: NukeState::Countdown,
            countdown: NUKE_COUNTDOWN,
            blast_elapsed: 0.0,
            active: true,
        }
    }

    pub fn update(&mut self, dt: f32) {
        match self.state {
            NukeState::Countdown => {
                self.countdown -= dt;
                if self.countdown <= 0.0 {
                    self.state = NukeState::Detonated;
                }
            }
            NukeState::Detonated => {
                self.blast_elapsed += dt;
                if self.blast_elapsed >= NUKE_BLAST_DURATION {
                    // Permanently spent
                    self.active = false;
                }
            }
        }
    }

    /// Whole seconds left on the countdown (display)
    pub fn countdown_secs(&self) -> u32 {
        self.countdown.max(0.0).ceil() as u32
    }

    /// Blast radius: linear ramp, full size by 60% of the blast window
    pub fn blast_radius(&self) -> f32 {
        match self.state {
            NukeState::Countdown => 0.0,
            NukeState::Detonated => {
                let t = (self.blast_elapsed / (NUKE_BLAST_DURATION * 0.6)).min(1.0);
                NUKE_MAX_RADIUS * t
            }
        }
    }

    pub fn collides_ship(&self, ship_pos: Vec2) -> bool {
        if self.state != NukeState::Detonated || !self.active {
            return false;
        }
        // Hub core is safe (the nuke detonates at the hub)
        if self.pos.distance(ship_pos) <= HUB_CORE_RADIUS {
            return false;
        }
        // Four fixed corner safe zones
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(WORLD_WIDTH, 0.0),
            Vec2::new(0.0, WORLD_HEIGHT),
            Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
        ];
        if corners
            .iter()
            .any(|c| c.distance(ship_pos) <= NUKE_CORNER_SAFE_RADIUS)
        {
            return false;
        }
        self.pos.distance(ship_pos) <= self.blast_radius()
    }
}

/// Polymorphic hazard: one variant per state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Hazard {
    Asteroid(Asteroid),
    Seeker(SeekerDrone),
    Mine(Mine),
    Nuke(Nuke),
}

impl Hazard {
    pub fn id(&self) -> u32 {
        match self {
            Hazard::Asteroid(a) => a.id,
            Hazard::Seeker(s) => s.id,
            Hazard::Mine(m) => m.id,
            Hazard::Nuke(n) => n.id,
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            Hazard::Asteroid(a) => a.pos,
            Hazard::Seeker(s) => s.pos,
            Hazard::Mine(m) => m.pos,
            Hazard::Nuke(n) => n.pos,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            Hazard::Asteroid(a) => a.radius,
            Hazard::Seeker(_) => SEEKER_RADIUS,
            Hazard::Mine(m) => {
                if m.armed() {
                    MINE_BLAST_RADIUS
                } else {
                    MINE_BODY_RADIUS
                }
            }
            Hazard::Nuke(n) => n.blast_radius(),
        }
    }

    /// Advance one tick. `ship_pos` is the local grid's ship, the target of
    /// any delivered seeker.
    pub fn update(&mut self, dt: f32, ship_pos: Vec2) {
        match self {
            Hazard::Asteroid(a) => a.update(dt),
            Hazard::Seeker(s) => s.update(dt, ship_pos),
            Hazard::Mine(m) => m.update(dt),
            Hazard::Nuke(n) => n.update(dt),
        }
    }

    pub fn collides_ship(&self, ship_pos: Vec2, ship_radius: f32) -> bool {
        if !self.active() {
            return false;
        }
        match self {
            Hazard::Asteroid(a) => a.pos.distance(ship_pos) <= a.radius + ship_radius,
            Hazard::Seeker(s) => s.pos.distance(ship_pos) <= SEEKER_RADIUS + ship_radius,
            Hazard::Mine(m) => m.collides_ship(ship_pos, ship_radius),
            Hazard::Nuke(n) => n.collides_ship(ship_pos),
        }
    }

    pub fn expired(&self) -> bool {
        match self {
            Hazard::Asteroid(a) => a.lifetime <= 0.0,
            Hazard::Seeker(s) => s.lifetime <= 0.0,
            Hazard::Mine(m) => m.lifetime <= 0.0,
            Hazard::Nuke(n) => !n.active,
        }
    }

    pub fn active(&self) -> bool {
        match self {
            Hazard::Nuke(n) => n.active,
            _ => !self.expired(),
        }
    }

    /// A nuke that has not finished its blast (drives bot FLEE_NUKE)
    pub fn is_live_nuke(&self) -> bool {
        matches!(self, Hazard::Nuke(n) if n.active)
    }

    /// Can a bullet destroy this hazard right now?
    pub fn shootable(&self) -> bool {
        // Nukes have zero radius during countdown and a blast is not a body
        !matches!(self, Hazard::Nuke(_)) && self.active()
    }
}

/// Boost zone preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostKind {
    Normal,
    Enhanced,
}

/// Non-colliding area trigger granting a transient speed multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostZone {
    pub id: u32,
    pub pos: Vec2,
    pub kind: BoostKind,
    pub remaining: f32,
}

impl BoostZone {
    pub fn new(id: u32, pos: Vec2, kind: BoostKind) -> Self {
        let remaining = match kind {
            BoostKind::Normal => 10.0,
            BoostKind::Enhanced => 15.0,
        };
        Self {
            id,
            pos,
            kind,
            remaining,
        }
    }

    pub fn radius(&self) -> f32 {
        match self.kind {
            BoostKind::Normal => 100.0,
            BoostKind::Enhanced => 150.0,
        }
    }

    pub fn multiplier(&self) -> f32 {
        match self.kind {
            BoostKind::Normal => 1.5,
            BoostKind::Enhanced => 2.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.remaining -= dt;
    }

    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Contains-test (zones never collide, they envelop)
    pub fn contains(&self, pos: Vec2) -> bool {
        self.pos.distance(pos) <= self.radius()
    }
}
