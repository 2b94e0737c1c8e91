//! Tank Arena headless skirmish
//!
//! Runs a seeded match between a few scripted bots and prints the final
//! owner-view snapshots as JSON.
//!
//! Usage: `tank-arena [config.json] [seed]`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use tank_arena::GameConfig;
use tank_arena::consts::SIM_DT;
use tank_arena::sim::{Arena, GameEvent, TankInput, tick};

const BOTS: usize = 4;
const ROUNDS: u32 = 3;
/// Give up on a round that drags on (one minute of game time)
const MAX_TICKS_PER_ROUND: u32 = 60 * 30;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    log::info!("Tank Arena skirmish starting (seed {seed})");
    let mut arena = Arena::new(config, seed);
    for i in 0..BOTS {
        arena.add_tank(format!("wanderer-{i}"));
    }

    let mut brain = Pcg32::seed_from_u64(seed ^ 0x5eed);
    for _ in 0..ROUNDS {
        arena.start_round();
        let mut inputs = vec![TankInput::default(); BOTS];
        for step in 0..MAX_TICKS_PER_ROUND {
            // Bots change their mind twice a second
            if step % 15 == 0 {
                for input in inputs.iter_mut() {
                    *input = TankInput {
                        turn: brain.random_range(-1.0..=1.0),
                        throttle: brain.random_bool(0.7),
                        fire: brain.random_bool(0.5),
                    };
                }
            }
            let events = tick(&mut arena, &inputs, SIM_DT);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::RoundOver { .. }))
            {
                break;
            }
        }
        if arena.round_active {
            log::info!("Round {} timed out with {} tanks alive", arena.round, arena.alive_count());
        }
    }

    let snapshots: Vec<_> = (0..BOTS)
        .map(|i| arena.tanks[i].snapshot(false))
        .collect();
    match serde_json::to_string_pretty(&snapshots) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize snapshots: {err}"),
    }
}
