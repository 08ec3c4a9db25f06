//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod attack;
pub mod bot;
pub mod bullet;
pub mod game;
pub mod grid;
pub mod hazard;
pub mod orb;
pub mod ship;
pub mod wormhole;

pub use attack::{AttackResult, Tier, translate_cargo};
pub use bot::{Bot, BotState};
pub use bullet::Bullet;
pub use game::{Game, PlayerAction};
pub use grid::{AttackMsg, BankEvent, GridSim};
pub use hazard::{Asteroid, BoostKind, BoostZone, Hazard, Mine, Nuke, NukeState, SeekerDrone};
pub use orb::{Orb, OrbKind};
pub use ship::{Ship, ShipInput};
pub use wormhole::Wormhole;

use serde::{Deserialize, Serialize};

/// Entity ID allocator owned by the simulation context.
///
/// A monotonically increasing counter per `Game` instance, so independent
/// simulations (tests especially) never share ID space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAlloc {
    next: u32,
}

impl IdAlloc {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdAlloc {
    fn default() -> Self {
        Self::new()
    }
}
