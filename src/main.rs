use cave_swarm::cave_generator::{self, CaveParams};
use cave_swarm::config::SwarmConfig;
use cave_swarm::constants::MAX_SIMULATION_TICKS;
use cave_swarm::map_loader;
use cave_swarm::simulation_manager::SimulationManager;
use cave_swarm::types::{CellState, Grid};

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::env;

mod visualize;

const DRONE_COUNT: usize = 4;
const GENERATED_WIDTH: usize = 120;
const GENERATED_HEIGHT: usize = 80;

/// Main entry point for the drone-swarm cave exploration simulation.
///
/// Usage: cave_swarm [map_file] [seed]
/// With no map file a cave is generated procedurally from the seed.
fn main() {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();
    let (map_file, seed) = parse_args(&args);

    let mut rng = StdRng::seed_from_u64(seed);
    let cave = match map_file {
        Some(path) => match map_loader::load_cave_from_file(&path) {
            Ok(cave) => cave,
            Err(e) => {
                eprintln!("Failed to load cave: {}", e);
                std::process::exit(1);
            }
        },
        None => cave_generator::generate(
            GENERATED_WIDTH,
            GENERATED_HEIGHT,
            &CaveParams::default(),
            &mut rng,
        ),
    };

    let config = match SwarmConfig::new(cave.width(), cave.height(), DRONE_COUNT) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let spawns = pick_spawns(&cave, DRONE_COUNT, &mut rng);
    let mut sim = match SimulationManager::new(config, cave, &spawns, seed) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Failed to start simulation: {}", e);
            std::process::exit(1);
        }
    };

    // Store history for visualization
    let mut history = Vec::new();
    history.push(sim.drones().to_vec());
    let mut tick = 0;
    while !sim.is_complete() && tick < MAX_SIMULATION_TICKS {
        sim.tick();
        history.push(sim.drones().to_vec());
        tick += 1;
    }
    info!("simulation finished after {} ticks", tick);

    for drone in sim.drones() {
        let stats = drone.stats();
        info!(
            "[{}] travelled {:.1}, {} free / {} occupied ({} / {} from peers), complete: {}",
            drone.name(),
            stats.dist_travelled,
            stats.free_count,
            stats.occupied_count,
            stats.comm_free_count,
            stats.comm_occupied_count,
            stats.complete
        );
    }

    let map_width = sim.cave().width();
    let map_height = sim.cave().height();
    visualize::visualize(&history, map_width, map_height);
}

fn parse_args(args: &[String]) -> (Option<String>, u64) {
    match args.len() {
        0 | 1 => (None, 42),
        2 => match args[1].parse::<u64>() {
            // A bare number is a seed for a generated cave.
            Ok(seed) => (None, seed),
            Err(_) => (Some(args[1].clone()), 42),
        },
        _ => {
            let seed = args[2].parse().unwrap_or(42);
            (Some(args[1].clone()), seed)
        }
    }
}

/// Picks distinct free cells as spawn positions.
fn pick_spawns(cave: &Grid, count: usize, rng: &mut StdRng) -> Vec<(f64, f64)> {
    let free_cells: Vec<(f64, f64)> = (0..cave.len())
        .map(|i| cave.unpack(i))
        .filter(|&c| cave.cell(c) == CellState::Free)
        .map(|c| (c.x as f64, c.y as f64))
        .collect();
    if free_cells.len() < count {
        eprintln!(
            "Cave has only {} free cells, need {} spawn positions",
            free_cells.len(),
            count
        );
        std::process::exit(1);
    }
    free_cells.choose_multiple(rng, count).copied().collect()
}
