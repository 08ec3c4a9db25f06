//! Game orchestrator: fixed-timestep loop over all grids, cross-grid
//! attack routing, kill feed, and win detection

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bot::Bot;
use super::grid::{BankEvent, GridSim};
use super::wormhole::Wormhole;
use super::IdAlloc;
use crate::consts::*;
use crate::tuning::BotSkill;

/// Discrete player actions (continuous inputs go through the setters)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Fire,
    BankAll,
    BankSlot(usize),
    Restart,
}

fn skipped_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// The whole match: one grid per competitor, one shared hub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub seed: u64,
    #[serde(skip, default = "skipped_rng")]
    rng: Pcg32,
    ids: IdAlloc,
    /// Shared hub; updated exactly once per tick, before any grid runs
    pub wormhole: Wormhole,
    /// Grid 0 is the player's; the rest belong to bots
    pub grids: Vec<GridSim>,
    /// Parallel to `grids`; `None` marks the human slot
    pub bots: Vec<Option<Bot>>,
    #[serde(skip)]
    accumulator: f32,
    pub time_ticks: u64,
    /// Newest first, capped at `KILL_FEED_CAP`
    pub kill_feed: Vec<String>,
    pub game_over: bool,
    pub winner: Option<usize>,
}

impl Game {
    pub fn new(seed: u64, num_bots: usize, skill: BotSkill) -> Self {
        let mut grids = vec![GridSim::new("You", seed)];
        let mut bots: Vec<Option<Bot>> = vec![None];
        for i in 0..num_bots {
            let n = i as u64 + 1;
            grids.push(GridSim::new(format!("Bot {}", n), seed.wrapping_add(n)));
            bots.push(Some(Bot::new(skill, seed.wrapping_add(n * 7919))));
        }
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed.wrapping_mul(0x9E37_79B9)),
            ids: IdAlloc::new(),
            wormhole: Wormhole::new(),
            grids,
            bots,
            accumulator: 0.0,
            time_ticks: 0,
            kill_feed: Vec::new(),
            game_over: false,
            winner: None,
        }
    }

    /// Accumulate wall time and drain it in fixed steps, capped so a stall
    /// never causes unbounded catch-up work
    pub fn frame(&mut self, dt: f32) {
        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Hit the cap: drop the backlog instead of chasing it forever
            self.accumulator = 0.0;
        }
    }

    /// Advance exactly one fixed timestep
    pub fn step(&mut self) {
        self.time_ticks += 1;

        // Single writer for the shared hub; grids read it only
        self.wormhole.update(SIM_DT);

        let mut deaths = Vec::new();
        for (i, grid) in self.grids.iter_mut().enumerate() {
            if grid.update(SIM_DT, &self.wormhole, &mut self.ids) {
                deaths.push(i);
            }
        }

        // Bots run strictly sequentially with globally consistent state
        let mut banked = Vec::new();
        for (i, bot) in self.bots.iter_mut().enumerate() {
            if let Some(bot) = bot {
                if let Some(event) =
                    bot.think(&mut self.grids[i], &self.wormhole, &mut self.ids, SIM_DT)
                {
                    banked.push((i, event));
                }
            }
        }

        // Attacks land the same tick they are produced
        for (source, event) in banked {
            self.route_attack(source, event);
        }

        for i in deaths {
            let label = self.grids[i].label.clone();
            self.push_feed(format!("{label} was destroyed!"));
        }
        self.check_winner();
    }

    /// Deliver a banked attack to one randomly chosen alive rival
    fn route_attack(&mut self, source: usize, event: BankEvent) {
        let rivals: Vec<usize> = self
            .grids
            .iter()
            .enumerate()
            .filter(|(i, g)| *i != source && !g.game_over)
            .map(|(i, _)| i)
            .collect();
        if rivals.is_empty() {
            log::debug!("{} banked with no rival left standing", event.source);
            return;
        }
        let target = rivals[self.rng.random_range(0..rivals.len())];
        let description = event.result.description.clone();
        let target_label = self.grids[target].label.clone();
        self.grids[target].receive_attack(&event.source, event.result);
        self.push_feed(format!("{} hit {target_label}: {description}", event.source));
    }

    fn push_feed(&mut self, msg: String) {
        log::info!("{msg}");
        self.kill_feed.insert(0, msg);
        self.kill_feed.truncate(KILL_FEED_CAP);
    }

    /// Terminal check: last grid standing wins; nobody left is a draw
    fn check_winner(&mut self) {
        if self.game_over {
            return;
        }
        let standing: Vec<usize> = self
            .grids
            .iter()
            .enumerate()
            .filter(|(_, g)| !g.game_over)
            .map(|(i, _)| i)
            .collect();
        match standing.as_slice() {
            // A lone survivor only wins if there was a contest to begin with
            [last] if self.grids.len() > 1 => {
                let last = *last;
                self.grids[last].winner = true;
                self.winner = Some(last);
                self.game_over = true;
                let label = self.grids[last].label.clone();
                self.push_feed(format!("{label} wins!"));
            }
            [] => {
                self.game_over = true;
                self.push_feed("Nobody survived".into());
            }
            _ => return,
        }
        // Freeze the surviving simulations; cosmetic timers keep running
        for grid in &mut self.grids {
            grid.game_over = true;
        }
    }

    // --- Player input surface (grid 0) ---

    pub fn set_thrust(&mut self, on: bool) {
        self.grids[0].ship.input.thrust = on;
    }

    pub fn set_rotate_left(&mut self, on: bool) {
        self.grids[0].ship.input.rotate_left = on;
    }

    pub fn set_rotate_right(&mut self, on: bool) {
        self.grids[0].ship.input.rotate_right = on;
    }

    pub fn apply(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::Fire => self.grids[0].fire_bullet(&mut self.ids),
            PlayerAction::BankAll => {
                if let Some(event) = self.grids[0].bank_all(&self.wormhole, &mut self.ids) {
                    self.route_attack(0, event);
                }
            }
            PlayerAction::BankSlot(index) => {
                if let Some(event) = self.grids[0].bank_slot(index, &self.wormhole, &mut self.ids) {
                    self.route_attack(0, event);
                }
            }
            PlayerAction::Restart => self.reset(),
        }
    }

    /// Round restart: permitted only once the match has ended
    pub fn reset(&mut self) {
        if !self.game_over {
            return;
        }
        for grid in &mut self.grids {
            grid.reset();
        }
        for bot in self.bots.iter_mut().flatten() {
            bot.reset();
        }
        self.wormhole = Wormhole::new();
        self.accumulator = 0.0;
        self.time_ticks = 0;
        self.kill_feed.clear();
        self.game_over = false;
        self.winner = None;
        log::info!("round restarted");
    }
}
