//! Headless match driver
//!
//! Runs a bot-vs-bot match through the real fixed-timestep loop and prints
//! the outcome. A presentation layer would consume the same `Game` surface.
//!
//! Usage: orb-rush [seed] [num_bots] [skill] [--dump-state]

use orb_rush::consts::SIM_DT;
use orb_rush::sim::{Bot, Game};
use orb_rush::BotSkill;

/// Give the player slot to a bot so the match runs unattended
fn all_bots(game: &mut Game, skill: BotSkill) {
    game.bots[0] = Some(Bot::new(skill, game.seed.wrapping_add(0xB07)));
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let dump_state = args.iter().any(|a| a == "--dump-state");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let seed: u64 = positional
        .first()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let num_bots: usize = positional
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3)
        .max(1);
    let skill = positional
        .get(2)
        .and_then(|s| BotSkill::from_str(s))
        .unwrap_or_default();

    let mut game = Game::new(seed, num_bots, skill);
    all_bots(&mut game, skill);
    log::info!(
        "match start: seed={seed}, {} competitors, skill={}",
        game.grids.len(),
        skill.as_str()
    );

    // Up to ten simulated minutes, fed in frame-sized slices
    let max_ticks: u64 = 10 * 60 * 60;
    while !game.game_over && game.time_ticks < max_ticks {
        game.frame(SIM_DT);
    }

    let elapsed = game.time_ticks as f32 * SIM_DT;
    match game.winner {
        Some(idx) => println!(
            "{} wins after {elapsed:.1}s ({} lives left)",
            game.grids[idx].label, game.grids[idx].ship.lives
        ),
        None if game.game_over => println!("draw after {elapsed:.1}s"),
        None => println!("no winner within {elapsed:.1}s"),
    }
    for line in game.kill_feed.iter().rev() {
        println!("  {line}");
    }

    if dump_state {
        match serde_json::to_string_pretty(&game) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("state dump failed: {err}"),
        }
    }
}
