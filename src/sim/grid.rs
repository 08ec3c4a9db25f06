//! Per-competitor simulation: one ship, its orb field, and whatever
//! hazards rivals have thrown at it

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::attack::{AttackResult, translate_cargo};
use super::bullet::Bullet;
use super::hazard::{BoostZone, Hazard};
use super::orb::{Orb, OrbKind};
use super::ship::Ship;
use super::wormhole::Wormhole;
use super::IdAlloc;
use crate::consts::*;

/// Transient attack banner (message + countdown)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackMsg {
    pub text: String,
    pub remaining: f32,
}

/// Emitted by a successful banking action; the orchestrator routes it
#[derive(Debug, Clone)]
pub struct BankEvent {
    pub source: String,
    pub cargo: Vec<OrbKind>,
    pub result: AttackResult,
}

fn skipped_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// One competitor's complete world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSim {
    pub label: String,
    pub ship: Ship,
    pub orbs: Vec<Orb>,
    pub hazards: Vec<Hazard>,
    pub zones: Vec<BoostZone>,
    pub bullets: Vec<Bullet>,
    seed: u64,
    #[serde(skip, default = "skipped_rng")]
    rng: Pcg32,
    orb_timer: f32,
    next_orb_interval: f32,
    /// Cosmetic but simulation-driven: decays every tick, spiked by impacts
    pub shake: f32,
    pub attack_msg: Option<AttackMsg>,
    /// Banking-proximity pulse in [0, 1] (render hint)
    pub bank_pulse: f32,
    pub game_over: bool,
    pub winner: bool,
}

impl GridSim {
    pub fn new(label: impl Into<String>, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let next_orb_interval = rng.random_range(ORB_SPAWN_MIN_INTERVAL..ORB_SPAWN_MAX_INTERVAL);
        Self {
            label: label.into(),
            ship: Ship::new(),
            orbs: Vec::new(),
            hazards: Vec::new(),
            zones: Vec::new(),
            bullets: Vec::new(),
            seed,
            rng,
            orb_timer: 0.0,
            next_orb_interval,
            shake: 0.0,
            attack_msg: None,
            bank_pulse: 0.0,
            game_over: false,
            winner: false,
        }
    }

    /// Advance one fixed timestep. Returns true if the ship died this tick.
    ///
    /// The hub is shared and externally updated; it is read-only here.
    pub fn update(&mut self, dt: f32, hub: &Wormhole, ids: &mut IdAlloc) -> bool {
        if self.game_over {
            // Only cosmetic timers keep running after the end
            self.tick_display(dt);
            return false;
        }

        self.ship.update(dt);

        let ship_pos = self.ship.pos;
        for orb in &mut self.orbs {
            orb.update(dt);
        }
        for hazard in &mut self.hazards {
            hazard.update(dt, ship_pos);
        }
        for zone in &mut self.zones {
            zone.update(dt);
        }
        for bullet in &mut self.bullets {
            bullet.update(dt);
        }
        self.resolve_bullet_hits();

        self.run_orb_spawner(dt, hub, ids);
        self.resolve_orb_pickups();
        self.resolve_hazard_hits();
        self.resolve_boost_zones();

        self.tick_display(dt);

        // Banking-proximity pulse: toward 1 inside the zone, toward 0 outside
        let step = if hub.in_bank_zone(self.ship.pos) {
            BANK_PULSE_STEP
        } else {
            -BANK_PULSE_STEP
        };
        self.bank_pulse = (self.bank_pulse + step).clamp(0.0, 1.0);

        // Sweep expired/inactive entries before the tick ends
        self.hazards.retain(|h| h.active() && !h.expired());
        self.zones.retain(|z| !z.expired());
        self.bullets.retain(|b| !b.expired());

        if !self.ship.is_alive() && !self.game_over {
            self.game_over = true;
            log::info!("{} is out", self.label);
            return true;
        }
        false
    }

    fn tick_display(&mut self, dt: f32) {
        if let Some(msg) = &mut self.attack_msg {
            msg.remaining -= dt;
            if msg.remaining <= 0.0 {
                self.attack_msg = None;
            }
        }
        // Geometric decay, snapped to zero near rest
        self.shake *= 0.9;
        if self.shake < 0.01 {
            self.shake = 0.0;
        }
    }

    /// Randomized-interval spawner with placement constraints
    fn run_orb_spawner(&mut self, dt: f32, hub: &Wormhole, ids: &mut IdAlloc) {
        self.orb_timer += dt;
        if self.orb_timer < self.next_orb_interval {
            return;
        }
        self.orb_timer = 0.0;
        self.next_orb_interval = self
            .rng
            .random_range(ORB_SPAWN_MIN_INTERVAL..ORB_SPAWN_MAX_INTERVAL);

        if self.orbs.len() >= ORB_CAP {
            return;
        }

        // First valid placement wins; a fully failed round waits for the
        // next interval
        for _ in 0..ORB_PLACEMENT_ATTEMPTS {
            let pos = Vec2::new(
                self.rng
                    .random_range(ORB_EDGE_MARGIN..WORLD_WIDTH - ORB_EDGE_MARGIN),
                self.rng
                    .random_range(ORB_EDGE_MARGIN..WORLD_HEIGHT - ORB_EDGE_MARGIN),
            );
            if hub.pos.distance(pos) < ORB_MIN_HUB_DIST {
                continue;
            }
            if self
                .orbs
                .iter()
                .any(|o| o.pos.distance(pos) < ORB_MIN_SEPARATION)
            {
                continue;
            }
            let kind = OrbKind::sample(&mut self.rng);
            self.orbs.push(Orb::new(ids.next_id(), pos, kind));
            return;
        }
    }

    /// Pickups: each orb is credited at most once; a full hold leaves the
    /// orb in the world
    fn resolve_orb_pickups(&mut self) {
        if !self.ship.is_alive() {
            return;
        }
        let mut i = 0;
        while i < self.orbs.len() {
            let orb = &self.orbs[i];
            if orb.collides_ship(self.ship.pos, SHIP_RADIUS) && self.ship.add_cargo(orb.kind) {
                self.orbs.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// First colliding hazard wins; the rest are not checked this tick.
    /// Contact does not consume the hazard.
    fn resolve_hazard_hits(&mut self) {
        if !self.ship.is_alive() || self.ship.invuln > 0.0 {
            return;
        }
        let hit = self
            .hazards
            .iter()
            .any(|h| h.collides_ship(self.ship.pos, SHIP_RADIUS));
        if hit {
            self.ship.take_damage();
            self.shake = self.shake.max(10.0);
        }
    }

    /// Overlapping zones max-combine; boosts never stack additively
    fn resolve_boost_zones(&mut self) {
        for zone in &self.zones {
            if zone.contains(self.ship.pos) {
                self.ship.speed_boost = self.ship.speed_boost.max(zone.multiplier());
            }
        }
    }

    /// Bullets destroy the first active hazard they touch and are consumed
    fn resolve_bullet_hits(&mut self) {
        let mut i = 0;
        while i < self.bullets.len() {
            let bullet = &self.bullets[i];
            let target = self
                .hazards
                .iter()
                .position(|h| h.shootable() && bullet.hits(h.pos(), h.radius()));
            if let Some(idx) = target {
                self.hazards.swap_remove(idx);
                self.bullets.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    pub fn fire_bullet(&mut self, ids: &mut IdAlloc) {
        if self.game_over || !self.ship.try_fire() {
            return;
        }
        self.bullets
            .push(Bullet::new(ids.next_id(), self.ship.pos, self.ship.angle));
    }

    /// Bank the whole hold. Rejected silently outside the banking zone or
    /// with empty cargo.
    pub fn bank_all(&mut self, hub: &Wormhole, ids: &mut IdAlloc) -> Option<BankEvent> {
        if self.game_over || !hub.in_bank_zone(self.ship.pos) || self.ship.cargo_count() == 0 {
            return None;
        }
        let cargo = self.ship.clear_cargo();
        Some(self.finish_bank(cargo, hub, ids))
    }

    /// Bank a single cargo slot (manual partial banking)
    pub fn bank_slot(&mut self, index: usize, hub: &Wormhole, ids: &mut IdAlloc) -> Option<BankEvent> {
        if self.game_over || !hub.in_bank_zone(self.ship.pos) {
            return None;
        }
        let kind = self.ship.remove_cargo_at(index)?;
        Some(self.finish_bank(vec![kind], hub, ids))
    }

    fn finish_bank(&mut self, cargo: Vec<OrbKind>, hub: &Wormhole, ids: &mut IdAlloc) -> BankEvent {
        let result = translate_cargo(&cargo, hub.pos, &mut self.rng, ids);
        log::info!(
            "{} banked {} orbs: {} (tier {})",
            self.label,
            cargo.len(),
            result.description,
            result.tier.value()
        );
        self.attack_msg = Some(AttackMsg {
            text: result.description.clone(),
            remaining: ATTACK_MSG_TIME,
        });
        self.shake = self.shake.max(result.tier.shake());
        BankEvent {
            source: self.label.clone(),
            cargo,
            result,
        }
    }

    /// Deliver a rival's attack into this grid
    pub fn receive_attack(&mut self, from: &str, result: AttackResult) {
        for mut hazard in result.hazards {
            if let Hazard::Seeker(seeker) = &mut hazard {
                // Incoming seekers lock onto the local ship
                seeker.has_target = true;
            }
            self.hazards.push(hazard);
        }
        self.zones.extend(result.zones);
        self.attack_msg = Some(AttackMsg {
            text: format!("{from}: {}", result.description),
            remaining: ATTACK_MSG_TIME,
        });
        self.shake = self.shake.max(result.tier.shake());
    }

    /// Nearest live orb to a point (bot targeting)
    pub fn nearest_orb(&self, pos: Vec2) -> Option<&Orb> {
        self.orbs.iter().min_by(|a, b| {
            a.pos
                .distance(pos)
                .partial_cmp(&b.pos.distance(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Nearest active hazard and its distance (bot evasion)
    pub fn nearest_hazard(&self, pos: Vec2) -> Option<(&Hazard, f32)> {
        self.hazards
            .iter()
            .filter(|h| h.active())
            .map(|h| (h, h.pos().distance(pos)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Any nuke still counting down or blasting?
    pub fn has_live_nuke(&self) -> bool {
        self.hazards.iter().any(|h| h.is_live_nuke())
    }

    /// Return all simulation state to initial conditions (round restart)
    pub fn reset(&mut self) {
        self.ship.reset();
        self.orbs.clear();
        self.hazards.clear();
        self.zones.clear();
        self.bullets.clear();
        self.orb_timer = 0.0;
        self.next_orb_interval = self
            .rng
            .random_range(ORB_SPAWN_MIN_INTERVAL..ORB_SPAWN_MAX_INTERVAL);
        self.shake = 0.0;
        self.attack_msg = None;
        self.bank_pulse = 0.0;
        self.game_over = false;
        self.winner = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hazard::{Asteroid, BoostKind, Mine, SeekerDrone};

    fn setup() -> (GridSim, Wormhole, IdAlloc) {
        (GridSim::new("Test", 7), Wormhole::new(), IdAlloc::new())
    }

    #[test]
    fn test_orb_pickup_credits_once() {
        let (mut grid, hub, mut ids) = setup();
        grid.orbs
            .push(Orb::new(ids.next_id(), grid.ship.pos, OrbKind::Red));
        grid.update(SIM_DT, &hub, &mut ids);
        assert_eq!(grid.ship.cargo_count(), 1);
        assert!(grid.orbs.is_empty(), "picked-up orb leaves the world");
    }

    #[test]
    fn test_full_hold_leaves_orb_in_world() {
        let (mut grid, hub, mut ids) = setup();
        for _ in 0..CARGO_SLOTS {
            grid.ship.add_cargo(OrbKind::Blue);
        }
        grid.orbs
            .push(Orb::new(ids.next_id(), grid.ship.pos, OrbKind::Red));
        grid.update(SIM_DT, &hub, &mut ids);
        assert_eq!(grid.orbs.len(), 1);
        assert_eq!(grid.ship.cargo_count(), CARGO_SLOTS);
    }

    #[test]
    fn test_hazard_hit_damages_once_per_tick() {
        let (mut grid, hub, mut ids) = setup();
        // Two overlapping mines, both armed and in blast range
        for _ in 0..2 {
            let mut mine = Mine::new(ids.next_id(), grid.ship.pos);
            mine.age = MINE_ARM_DELAY + 1.0;
            grid.hazards.push(Hazard::Mine(mine));
        }
        grid.update(SIM_DT, &hub, &mut ids);
        assert_eq!(grid.ship.lives, SHIP_START_LIVES - 1);
        assert!(grid.shake > 0.0);
    }

    #[test]
    fn test_invulnerable_ship_ignores_hazards() {
        let (mut grid, hub, mut ids) = setup();
        grid.ship.invuln = 1.0;
        let mut mine = Mine::new(ids.next_id(), grid.ship.pos);
        mine.age = MINE_ARM_DELAY + 1.0;
        grid.hazards.push(Hazard::Mine(mine));
        grid.update(SIM_DT, &hub, &mut ids);
        assert_eq!(grid.ship.lives, SHIP_START_LIVES);
    }

    #[test]
    fn test_boost_zones_max_combine() {
        let (mut grid, hub, mut ids) = setup();
        grid.zones
            .push(BoostZone::new(ids.next_id(), grid.ship.pos, BoostKind::Normal));
        grid.zones.push(BoostZone::new(
            ids.next_id(),
            grid.ship.pos,
            BoostKind::Enhanced,
        ));
        grid.update(SIM_DT, &hub, &mut ids);
        // Max of 1.5 and 2.0, never 3.5
        assert_eq!(grid.ship.speed_boost, 2.0);
    }

    #[test]
    fn test_sweep_removes_expired() {
        let (mut grid, hub, mut ids) = setup();
        let mut rock = Asteroid::new(
            ids.next_id(),
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            ASTEROID_RADIUS_SMALL,
        );
        rock.lifetime = 0.001;
        grid.hazards.push(Hazard::Asteroid(rock));
        let mut zone = BoostZone::new(ids.next_id(), Vec2::new(100.0, 100.0), BoostKind::Normal);
        zone.remaining = 0.001;
        grid.zones.push(zone);
        grid.update(SIM_DT, &hub, &mut ids);
        assert!(grid.hazards.is_empty());
        assert!(grid.zones.is_empty());
    }

    #[test]
    fn test_banking_rejected_outside_zone() {
        let (mut grid, hub, mut ids) = setup();
        grid.ship.add_cargo(OrbKind::Red);
        grid.ship.pos = Vec2::new(50.0, 50.0);
        assert!(grid.bank_all(&hub, &mut ids).is_none());
        assert_eq!(grid.ship.cargo_count(), 1);
    }

    #[test]
    fn test_banking_rejected_with_empty_hold() {
        let (mut grid, hub, mut ids) = setup();
        grid.ship.pos = hub.pos;
        assert!(grid.bank_all(&hub, &mut ids).is_none());
    }

    #[test]
    fn test_banking_drains_cargo_and_emits_event() {
        let (mut grid, hub, mut ids) = setup();
        grid.ship.pos = hub.pos;
        grid.ship.add_cargo(OrbKind::Blue);
        grid.ship.add_cargo(OrbKind::Blue);
        let event = grid.bank_all(&hub, &mut ids).expect("bank should succeed");
        assert_eq!(event.cargo, vec![OrbKind::Blue, OrbKind::Blue]);
        assert_eq!(event.source, "Test");
        assert_eq!(grid.ship.cargo_count(), 0);
        assert!(grid.attack_msg.is_some());
        assert_eq!(grid.shake, event.result.tier.shake());
    }

    #[test]
    fn test_bank_slot_partial() {
        let (mut grid, hub, mut ids) = setup();
        grid.ship.pos = hub.pos;
        grid.ship.add_cargo(OrbKind::Red);
        grid.ship.add_cargo(OrbKind::Green);
        let event = grid.bank_slot(1, &hub, &mut ids).expect("slot bank");
        assert_eq!(event.cargo, vec![OrbKind::Green]);
        assert_eq!(grid.ship.cargo_count(), 1);
        // Out-of-range slot: silent no-op
        assert!(grid.bank_slot(99, &hub, &mut ids).is_none());
    }

    #[test]
    fn test_receive_attack_targets_seekers() {
        let (mut grid, _hub, mut ids) = setup();
        let result = AttackResult {
            hazards: vec![Hazard::Seeker(SeekerDrone::new(
                ids.next_id(),
                Vec2::new(100.0, 100.0),
            ))],
            zones: Vec::new(),
            tier: crate::sim::Tier::Base,
            description: "Seeker drone".into(),
        };
        grid.receive_attack("Rival", result);
        match &grid.hazards[0] {
            Hazard::Seeker(s) => assert!(s.has_target),
            other => panic!("expected seeker, got {other:?}"),
        }
        let msg = grid.attack_msg.as_ref().expect("message set");
        assert!(msg.text.starts_with("Rival:"));
    }

    #[test]
    fn test_bank_pulse_clamped() {
        let (mut grid, hub, mut ids) = setup();
        grid.ship.pos = hub.pos;
        grid.ship.vel = Vec2::ZERO;
        for _ in 0..40 {
            grid.update(SIM_DT, &hub, &mut ids);
            grid.ship.pos = hub.pos; // Hold in place against drift
        }
        assert_eq!(grid.bank_pulse, 1.0);
        grid.ship.pos = Vec2::new(10.0, 10.0);
        for _ in 0..40 {
            grid.update(SIM_DT, &hub, &mut ids);
            grid.ship.pos = Vec2::new(10.0, 10.0);
        }
        assert_eq!(grid.bank_pulse, 0.0);
    }

    #[test]
    fn test_game_over_freezes_simulation() {
        let (mut grid, hub, mut ids) = setup();
        grid.game_over = true;
        grid.shake = 5.0;
        grid.orbs
            .push(Orb::new(ids.next_id(), grid.ship.pos, OrbKind::Red));
        grid.update(SIM_DT, &hub, &mut ids);
        // Cosmetic decay runs, gameplay does not
        assert!(grid.shake < 5.0);
        assert_eq!(grid.orbs.len(), 1);
        assert_eq!(grid.ship.cargo_count(), 0);
    }

    #[test]
    fn test_death_transition_fires_once() {
        let (mut grid, hub, mut ids) = setup();
        grid.ship.lives = 1;
        grid.ship.invuln = 0.0;
        let mut mine = Mine::new(ids.next_id(), grid.ship.pos);
        mine.age = MINE_ARM_DELAY + 1.0;
        grid.hazards.push(Hazard::Mine(mine));
        assert!(grid.update(SIM_DT, &hub, &mut ids), "death reported");
        assert!(grid.game_over);
        assert!(!grid.update(SIM_DT, &hub, &mut ids), "only once");
    }

    #[test]
    fn test_bullet_destroys_first_hazard_and_is_consumed() {
        let (mut grid, hub, mut ids) = setup();
        let target = Vec2::new(
            grid.ship.pos.x + 60.0,
            grid.ship.pos.y,
        );
        grid.ship.angle = 0.0;
        grid.hazards.push(Hazard::Asteroid(Asteroid::new(
            ids.next_id(),
            target,
            Vec2::ZERO,
            ASTEROID_RADIUS_SMALL,
        )));
        grid.fire_bullet(&mut ids);
        assert_eq!(grid.bullets.len(), 1);
        for _ in 0..30 {
            grid.update(SIM_DT, &hub, &mut ids);
        }
        assert!(grid.hazards.is_empty(), "hazard destroyed");
        assert!(grid.bullets.is_empty(), "bullet consumed");
    }

    #[test]
    fn test_fire_rate_limited() {
        let (mut grid, _hub, mut ids) = setup();
        grid.fire_bullet(&mut ids);
        grid.fire_bullet(&mut ids);
        assert_eq!(grid.bullets.len(), 1);
    }

    #[test]
    fn test_spawner_respects_cap_and_margins() {
        let (mut grid, hub, mut ids) = setup();
        // Run long enough for many spawn intervals
        for _ in 0..(60 * 60) {
            grid.update(SIM_DT, &hub, &mut ids);
        }
        assert!(grid.orbs.len() <= ORB_CAP);
        assert!(!grid.orbs.is_empty(), "spawner produced orbs");
        for orb in &grid.orbs {
            assert!(orb.pos.x >= ORB_EDGE_MARGIN && orb.pos.x <= WORLD_WIDTH - ORB_EDGE_MARGIN);
            assert!(orb.pos.y >= ORB_EDGE_MARGIN && orb.pos.y <= WORLD_HEIGHT - ORB_EDGE_MARGIN);
            assert!(hub.pos.distance(orb.pos) >= ORB_MIN_HUB_DIST);
        }
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let (mut grid, hub, mut ids) = setup();
        for _ in 0..600 {
            grid.update(SIM_DT, &hub, &mut ids);
        }
        grid.ship.lives = 0;
        grid.game_over = true;
        grid.reset();
        assert!(!grid.game_over);
        assert_eq!(grid.ship.lives, SHIP_START_LIVES);
        assert_eq!(grid.ship.cargo_count(), 0);
        assert!(grid.orbs.is_empty());
        assert!(grid.hazards.is_empty());
        assert!(grid.zones.is_empty());
    }
}
