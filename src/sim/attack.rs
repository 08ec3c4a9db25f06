//! Cargo-to-attack translation table
//!
//! Pure deterministic priority ladder mapping a banked cargo composition to
//! a spawn set and severity tier. Evaluation order is load-bearing game
//! balance: the chaos check deliberately outranks the 3-of-a-kind and
//! 2-of-a-kind rungs below it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::hazard::{Asteroid, BoostKind, BoostZone, Hazard, Mine, Nuke, SeekerDrone};
use super::orb::OrbKind;
use super::IdAlloc;
use crate::consts::*;

/// Attack severity, ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Base,
    Enhanced,
    Heavy,
    Mega,
    Nuke,
}

impl Tier {
    /// Numeric severity (1, 1.5, 2, 3, 4)
    pub fn value(&self) -> f32 {
        match self {
            Tier::Base => 1.0,
            Tier::Enhanced => 1.5,
            Tier::Heavy => 2.0,
            Tier::Mega => 3.0,
            Tier::Nuke => 4.0,
        }
    }

    /// Screen shake applied wherever this attack lands
    pub fn shake(&self) -> f32 {
        match self {
            Tier::Mega | Tier::Nuke => 20.0,
            Tier::Heavy => 10.0,
            Tier::Base | Tier::Enhanced => 5.0,
        }
    }
}

/// One banking action's worth of spawns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackResult {
    pub hazards: Vec<Hazard>,
    pub zones: Vec<BoostZone>,
    pub tier: Tier,
    pub description: String,
}

impl AttackResult {
    fn empty() -> Self {
        Self {
            hazards: Vec::new(),
            zones: Vec::new(),
            tier: Tier::Base,
            description: "Nothing banked".into(),
        }
    }
}

/// Random point in a distance band around the hub, clamped into the world
fn ring_pos<R: Rng>(rng: &mut R, hub: Vec2, min_dist: f32, max_dist: f32) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let dist = rng.random_range(min_dist..max_dist);
    let pos = hub + Vec2::from_angle(angle) * dist;
    Vec2::new(
        pos.x.clamp(0.0, WORLD_WIDTH),
        pos.y.clamp(0.0, WORLD_HEIGHT),
    )
}

fn spawn_asteroids<R: Rng>(
    out: &mut Vec<Hazard>,
    rng: &mut R,
    ids: &mut IdAlloc,
    hub: Vec2,
    count: usize,
    radius: f32,
) {
    for _ in 0..count {
        let pos = ring_pos(rng, hub, 150.0, 300.0);
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(80.0..140.0);
        out.push(Hazard::Asteroid(Asteroid::new(
            ids.next_id(),
            pos,
            Vec2::from_angle(angle) * speed,
            radius,
        )));
    }
}

/// Wall formation: 8 asteroids in a line along a random world edge, all
/// moving perpendicular to it
fn spawn_asteroid_wall<R: Rng>(out: &mut Vec<Hazard>, rng: &mut R, ids: &mut IdAlloc) {
    const WALL_COUNT: usize = 8;
    const WALL_SPEED: f32 = 100.0;
    let edge = rng.random_range(0u32..4);
    for i in 0..WALL_COUNT {
        let t = (i as f32 + 0.5) / WALL_COUNT as f32;
        let (pos, vel) = match edge {
            0 => (Vec2::new(t * WORLD_WIDTH, 0.0), Vec2::new(0.0, WALL_SPEED)),
            1 => (
                Vec2::new(t * WORLD_WIDTH, WORLD_HEIGHT),
                Vec2::new(0.0, -WALL_SPEED),
            ),
            2 => (Vec2::new(0.0, t * WORLD_HEIGHT), Vec2::new(WALL_SPEED, 0.0)),
            _ => (
                Vec2::new(WORLD_WIDTH, t * WORLD_HEIGHT),
                Vec2::new(-WALL_SPEED, 0.0),
            ),
        };
        out.push(Hazard::Asteroid(Asteroid::new(
            ids.next_id(),
            pos,
            vel,
            ASTEROID_RADIUS_SMALL,
        )));
    }
}

fn spawn_seekers<R: Rng>(
    out: &mut Vec<Hazard>,
    rng: &mut R,
    ids: &mut IdAlloc,
    hub: Vec2,
    count: usize,
) {
    for _ in 0..count {
        let pos = ring_pos(rng, hub, 200.0, 350.0);
        out.push(Hazard::Seeker(SeekerDrone::new(ids.next_id(), pos)));
    }
}

fn spawn_mines<R: Rng>(
    out: &mut Vec<Hazard>,
    rng: &mut R,
    ids: &mut IdAlloc,
    hub: Vec2,
    count: usize,
) {
    for _ in 0..count {
        let pos = ring_pos(rng, hub, 120.0, 280.0);
        out.push(Hazard::Mine(Mine::new(ids.next_id(), pos)));
    }
}

fn spawn_zone<R: Rng>(rng: &mut R, ids: &mut IdAlloc, hub: Vec2, kind: BoostKind) -> BoostZone {
    BoostZone::new(ids.next_id(), ring_pos(rng, hub, 100.0, 250.0), kind)
}

/// Map a banked cargo composition to its attack.
///
/// The ladder is evaluated top to bottom, first match wins:
/// 1. ≥8 gold → nuke
/// 2. ≥4 of one color (red, blue, green order) → mega
/// 3. ≥1 each of red+blue+green → chaos bundle
/// 4. ≥3 of one color → heavy
/// 5. ≥2 of one color → enhanced
/// 6. ≥1 red, else blue, else green → base
/// 7. nothing → empty result
pub fn translate_cargo<R: Rng>(
    cargo: &[OrbKind],
    hub_pos: Vec2,
    rng: &mut R,
    ids: &mut IdAlloc,
) -> AttackResult {
    let count = |k: OrbKind| cargo.iter().filter(|c| **c == k).count();
    let reds = count(OrbKind::Red);
    let blues = count(OrbKind::Blue);
    let greens = count(OrbKind::Green);
    let golds = count(OrbKind::Gold);

    let mut hazards = Vec::new();
    let mut zones = Vec::new();

    // 1. Gold jackpot: a single nuke, placed exactly at the hub
    if golds >= 8 {
        hazards.push(Hazard::Nuke(Nuke::new(ids.next_id(), hub_pos)));
        return AttackResult {
            hazards,
            zones,
            tier: Tier::Nuke,
            description: "NUKE DEPLOYED!".into(),
        };
    }

    const COLORS: [OrbKind; 3] = [OrbKind::Red, OrbKind::Blue, OrbKind::Green];

    // 2. Mega: 4-of-a-kind, colors checked in fixed order
    for color in COLORS {
        if count(color) < 4 {
            continue;
        }
        let description = match color {
            OrbKind::Red => {
                spawn_asteroids(&mut hazards, rng, ids, hub_pos, 8, ASTEROID_RADIUS_SMALL);
                spawn_asteroids(&mut hazards, rng, ids, hub_pos, 4, ASTEROID_RADIUS_LARGE);
                "MEGA ASTEROID BARRAGE!"
            }
            OrbKind::Blue => {
                spawn_seekers(&mut hazards, rng, ids, hub_pos, 5);
                "MEGA SEEKER SWARM!"
            }
            _ => {
                spawn_mines(&mut hazards, rng, ids, hub_pos, 6);
                "MEGA MINEFIELD!"
            }
        };
        return AttackResult {
            hazards,
            zones,
            tier: Tier::Mega,
            description: description.into(),
        };
    }

    // 3. Chaos storm: one of each primary color. Sits above the 3- and
    //    2-of-a-kind rungs on purpose.
    if reds >= 1 && blues >= 1 && greens >= 1 {
        spawn_asteroids(&mut hazards, rng, ids, hub_pos, 2, ASTEROID_RADIUS_SMALL);
        spawn_seekers(&mut hazards, rng, ids, hub_pos, 1);
        spawn_mines(&mut hazards, rng, ids, hub_pos, 2);
        return AttackResult {
            hazards,
            zones,
            tier: Tier::Heavy,
            description: "CHAOS STORM!".into(),
        };
    }

    // 4. Heavy: 3-of-a-kind
    for color in COLORS {
        if count(color) < 3 {
            continue;
        }
        let description = match color {
            OrbKind::Red => {
                spawn_asteroid_wall(&mut hazards, rng, ids);
                "ASTEROID WALL!"
            }
            OrbKind::Blue => {
                spawn_seekers(&mut hazards, rng, ids, hub_pos, 3);
                "SEEKER PACK!"
            }
            _ => {
                spawn_mines(&mut hazards, rng, ids, hub_pos, 3);
                "MINEFIELD!"
            }
        };
        return AttackResult {
            hazards,
            zones,
            tier: Tier::Heavy,
            description: description.into(),
        };
    }

    // 5. Enhanced: a pair
    for color in COLORS {
        if count(color) < 2 {
            continue;
        }
        let description = match color {
            OrbKind::Red => {
                spawn_asteroids(&mut hazards, rng, ids, hub_pos, 5, ASTEROID_RADIUS_SMALL);
                "Asteroid volley+"
            }
            OrbKind::Blue => {
                spawn_seekers(&mut hazards, rng, ids, hub_pos, 2);
                "Twin seekers"
            }
            _ => {
                zones.push(spawn_zone(rng, ids, hub_pos, BoostKind::Enhanced));
                "Enhanced boost zone"
            }
        };
        return AttackResult {
            hazards,
            zones,
            tier: Tier::Enhanced,
            description: description.into(),
        };
    }

    // 6. Base: a single orb of any primary color, red first
    for color in COLORS {
        if count(color) < 1 {
            continue;
        }
        let description = match color {
            OrbKind::Red => {
                spawn_asteroids(&mut hazards, rng, ids, hub_pos, 3, ASTEROID_RADIUS_SMALL);
                "Asteroid volley"
            }
            OrbKind::Blue => {
                spawn_seekers(&mut hazards, rng, ids, hub_pos, 1);
                "Seeker drone"
            }
            _ => {
                zones.push(spawn_zone(rng, ids, hub_pos, BoostKind::Normal));
                "Boost zone"
            }
        };
        return AttackResult {
            hazards,
            zones,
            tier: Tier::Base,
            description: description.into(),
        };
    }

    // 7. Empty hand (gold-only hands below the nuke bar land here too)
    AttackResult::empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn hub() -> Vec2 {
        Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0)
    }

    fn run(cargo: &[OrbKind]) -> AttackResult {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut ids = IdAlloc::new();
        translate_cargo(cargo, hub(), &mut rng, &mut ids)
    }

    fn count_kind(result: &AttackResult, pred: fn(&Hazard) -> bool) -> usize {
        result.hazards.iter().filter(|h| pred(h)).count()
    }

    #[test]
    fn test_gold_eight_is_a_nuke_at_hub() {
        let result = run(&[OrbKind::Gold; 8]);
        assert_eq!(result.tier, Tier::Nuke);
        assert_eq!(result.hazards.len(), 1);
        match &result.hazards[0] {
            Hazard::Nuke(n) => assert_eq!(n.pos, hub()),
            other => panic!("expected nuke, got {other:?}"),
        }
    }

    #[test]
    fn test_four_red_is_mega_barrage() {
        let result = run(&[OrbKind::Red; 4]);
        assert_eq!(result.tier, Tier::Mega);
        assert_eq!(result.hazards.len(), 12);
        let large = result
            .hazards
            .iter()
            .filter(
                |h| matches!(h, Hazard::Asteroid(a) if a.radius == ASTEROID_RADIUS_LARGE),
            )
            .count();
        assert_eq!(large, 4);
    }

    #[test]
    fn test_one_of_each_is_chaos() {
        let result = run(&[OrbKind::Red, OrbKind::Blue, OrbKind::Green]);
        assert_eq!(result.tier, Tier::Heavy);
        assert_eq!(result.description, "CHAOS STORM!");
        assert_eq!(
            count_kind(&result, |h| matches!(h, Hazard::Asteroid(_))),
            2
        );
        assert_eq!(count_kind(&result, |h| matches!(h, Hazard::Seeker(_))), 1);
        assert_eq!(count_kind(&result, |h| matches!(h, Hazard::Mine(_))), 2);
    }

    #[test]
    fn test_chaos_outranks_triple_red() {
        // 3 red + 1 blue + 1 green still resolves to chaos, not the wall.
        // Intentional: the ladder order is game balance.
        let result = run(&[
            OrbKind::Red,
            OrbKind::Red,
            OrbKind::Red,
            OrbKind::Blue,
            OrbKind::Green,
        ]);
        assert_eq!(result.description, "CHAOS STORM!");
        assert_eq!(result.tier, Tier::Heavy);
    }

    #[test]
    fn test_triple_red_is_a_wall() {
        let result = run(&[OrbKind::Red; 3]);
        assert_eq!(result.tier, Tier::Heavy);
        assert_eq!(result.hazards.len(), 8);
        // Shared velocity, perpendicular to one edge
        let vels: Vec<Vec2> = result
            .hazards
            .iter()
            .map(|h| match h {
                Hazard::Asteroid(a) => a.vel,
                other => panic!("expected asteroid, got {other:?}"),
            })
            .collect();
        assert!(vels.iter().all(|v| *v == vels[0]));
        assert!(vels[0].x == 0.0 || vels[0].y == 0.0);
    }

    #[test]
    fn test_single_blue_is_one_seeker() {
        let result = run(&[OrbKind::Blue]);
        assert_eq!(result.tier, Tier::Base);
        assert_eq!(result.hazards.len(), 1);
        assert!(matches!(result.hazards[0], Hazard::Seeker(_)));
    }

    #[test]
    fn test_green_pair_is_enhanced_zone() {
        let result = run(&[OrbKind::Green, OrbKind::Green]);
        assert_eq!(result.tier, Tier::Enhanced);
        assert!(result.hazards.is_empty());
        assert_eq!(result.zones.len(), 1);
        assert_eq!(result.zones[0].kind, BoostKind::Enhanced);
    }

    #[test]
    fn test_empty_cargo_is_a_noop() {
        let result = run(&[]);
        assert_eq!(result.tier, Tier::Base);
        assert!(result.hazards.is_empty());
        assert!(result.zones.is_empty());
    }

    #[test]
    fn test_tier_values_and_shake() {
        assert_eq!(Tier::Base.value(), 1.0);
        assert_eq!(Tier::Enhanced.value(), 1.5);
        assert_eq!(Tier::Heavy.value(), 2.0);
        assert_eq!(Tier::Mega.value(), 3.0);
        assert_eq!(Tier::Nuke.value(), 4.0);
        assert_eq!(Tier::Nuke.shake(), 20.0);
        assert_eq!(Tier::Heavy.shake(), 10.0);
        assert_eq!(Tier::Base.shake(), 5.0);
        assert!(Tier::Base < Tier::Enhanced && Tier::Mega < Tier::Nuke);
    }
}
