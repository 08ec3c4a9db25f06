//! Bot decision state machine
//!
//! Two cadences on purpose: state transitions are re-checked every tick at
//! strict priority, but behavior (steering, banking) only re-executes after
//! the skill's reaction delay, with movement inputs persisting in between.
//! Collapsing the two into one per-tick decision makes bots twitchy.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{BankEvent, GridSim};
use super::ship::Ship;
use super::wormhole::Wormhole;
use super::IdAlloc;
use crate::consts::*;
use crate::shortest_angle_delta;
use crate::tuning::BotSkill;

/// Bot FSM states, listed in selection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotState {
    FleeNuke,
    Evade,
    Bank,
    Collect,
}

/// Steering deadband: residual angular error below this turns neither way
const AIM_DEADBAND: f32 = 0.08;
/// Thrust whenever roughly facing the target or it is far away
const AIM_THRUST_CONE: f32 = 0.8;
const FAR_TARGET_DIST: f32 = 200.0;
/// Corner flee points sit this far in from each world corner
const FLEE_CORNER_INSET: f32 = 80.0;
const FLEE_ARRIVAL_RADIUS: f32 = 30.0;
/// Patrol circle around world center when no orbs exist
const PATROL_RADIUS: f32 = 150.0;

fn skipped_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub skill: BotSkill,
    pub state: BotState,
    /// Seconds until the current behavior re-executes
    decision_timer: f32,
    patrol_phase: f32,
    seed: u64,
    #[serde(skip, default = "skipped_rng")]
    rng: Pcg32,
}

impl Bot {
    pub fn new(skill: BotSkill, seed: u64) -> Self {
        Self {
            skill,
            state: BotState::Collect,
            decision_timer: 0.0,
            patrol_phase: 0.0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Read the grid's world state and drive its ship for one tick.
    ///
    /// May emit a bank event when the Bank behavior reaches the hub.
    pub fn think(
        &mut self,
        grid: &mut GridSim,
        hub: &Wormhole,
        ids: &mut IdAlloc,
        dt: f32,
    ) -> Option<BankEvent> {
        if grid.game_over || !grid.ship.is_alive() {
            grid.ship.input = Default::default();
            return None;
        }

        // Transitions are immediate, every tick
        self.state = self.select_state(grid);

        // Behavior is throttled; inputs persist between decisions
        self.decision_timer -= dt;
        if self.decision_timer > 0.0 {
            return None;
        }
        self.decision_timer = self.skill.reaction_delay();

        match self.state {
            BotState::FleeNuke => {
                self.flee_nuke(grid);
                None
            }
            BotState::Evade => {
                self.evade(grid);
                None
            }
            BotState::Bank => self.bank(grid, hub, ids),
            BotState::Collect => {
                self.collect(grid);
                None
            }
        }
    }

    /// Strict priority, first true wins, independent of current state.
    /// Evade keeps a 1.5x hysteresis margin so bots do not flicker at the
    /// threshold.
    fn select_state(&self, grid: &GridSim) -> BotState {
        if grid.has_live_nuke() {
            return BotState::FleeNuke;
        }
        let evade_dist = self.skill.evade_distance();
        if let Some((_, dist)) = grid.nearest_hazard(grid.ship.pos) {
            if dist <= evade_dist {
                return BotState::Evade;
            }
            if self.state == BotState::Evade && dist <= evade_dist * 1.5 {
                return BotState::Evade;
            }
        }
        if grid.ship.cargo_ratio() >= self.skill.bank_ratio() {
            return BotState::Bank;
        }
        BotState::Collect
    }

    fn collect(&mut self, grid: &mut GridSim) {
        if let Some(orb) = grid.nearest_orb(grid.ship.pos) {
            let target = orb.pos;
            self.steer(&mut grid.ship, target);
        } else {
            // Nothing to collect: patrol a circle around world center
            self.patrol_phase += self.skill.reaction_delay() * 0.8;
            let center = Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0);
            let target = center + Vec2::from_angle(self.patrol_phase) * PATROL_RADIUS;
            self.steer(&mut grid.ship, target);
        }
    }

    fn bank(&mut self, grid: &mut GridSim, hub: &Wormhole, ids: &mut IdAlloc) -> Option<BankEvent> {
        if hub.in_bank_zone(grid.ship.pos) {
            let event = grid.bank_all(hub, ids);
            self.state = BotState::Collect;
            grid.ship.input.thrust = false;
            event
        } else {
            self.steer(&mut grid.ship, hub.pos);
            None
        }
    }

    fn evade(&mut self, grid: &mut GridSim) {
        let Some((hazard, _)) = grid.nearest_hazard(grid.ship.pos) else {
            return;
        };
        // Steer for a point directly away from the threat
        let away = (grid.ship.pos - hazard.pos()).normalize_or_zero();
        let target = grid.ship.pos + away * 200.0;
        self.steer(&mut grid.ship, target);
    }

    fn flee_nuke(&mut self, grid: &mut GridSim) {
        let corners = [
            Vec2::new(FLEE_CORNER_INSET, FLEE_CORNER_INSET),
            Vec2::new(WORLD_WIDTH - FLEE_CORNER_INSET, FLEE_CORNER_INSET),
            Vec2::new(FLEE_CORNER_INSET, WORLD_HEIGHT - FLEE_CORNER_INSET),
            Vec2::new(WORLD_WIDTH - FLEE_CORNER_INSET, WORLD_HEIGHT - FLEE_CORNER_INSET),
        ];
        let ship_pos = grid.ship.pos;
        let target = corners
            .into_iter()
            .min_by(|a, b| {
                a.distance(ship_pos)
                    .partial_cmp(&b.distance(ship_pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(corners[0]);

        if ship_pos.distance(target) <= FLEE_ARRIVAL_RADIUS {
            // Arrived: hold position in the safe zone
            grid.ship.input = Default::default();
        } else {
            self.steer(&mut grid.ship, target);
        }
    }

    /// Point the ship at a target with skill-scaled accuracy and noise
    fn steer(&mut self, ship: &mut Ship, target: Vec2) {
        let to = target - ship.pos;
        let dist = to.length();
        if dist < 1.0 {
            ship.input = Default::default();
            return;
        }
        let desired = to.y.atan2(to.x);
        let delta = shortest_angle_delta(ship.angle, desired);
        let accuracy = self.skill.accuracy();
        let noise = self.rng.random_range(-0.3..0.3) * (1.0 - accuracy);
        let aim = delta * accuracy + noise;

        ship.input.rotate_left = aim < -AIM_DEADBAND;
        ship.input.rotate_right = aim > AIM_DEADBAND;
        // Keep moving toward distant goals even while still turning
        ship.input.thrust = aim.abs() < AIM_THRUST_CONE || dist > FAR_TARGET_DIST;
    }

    pub fn reset(&mut self) {
        self.state = BotState::Collect;
        self.decision_timer = 0.0;
        self.patrol_phase = 0.0;
        self.rng = Pcg32::seed_from_u64(self.seed);
    }
}
