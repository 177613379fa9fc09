use cave_swarm::cave_generator::{self, CaveParams};
use cave_swarm::config::SwarmConfig;
use cave_swarm::simulation_manager::SimulationManager;
use cave_swarm::types::{CellState, Grid};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Helper function to create a ground-truth cave from ASCII representation
fn make_cave(ascii: &[&str]) -> Grid {
    let height = ascii.len();
    let width = ascii[0].len();
    let mut cave = Grid::new(width, height, CellState::Free);
    for (y, row) in ascii.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == '#' {
                cave.set(x as i32, y as i32, CellState::Occupied);
            }
        }
    }
    cave
}

/// Two drones explore a shared room to completion, and each ends up knowing
/// every reachable free cell.
#[test]
fn test_pair_explores_room_to_completion() {
    let cave = make_cave(&[
        "##############",
        "#............#",
        "#.####.......#",
        "#.#..........#",
        "#.#..........#",
        "#............#",
        "##############",
    ]);
    let config =
        SwarmConfig::with_radii(cave.width(), cave.height(), 2, 3.0, 4.0, 5).expect("config");
    let spawns = [(1.0, 1.0), (12.0, 5.0)];
    let mut sim =
        SimulationManager::new(config, cave.clone(), &spawns, 3).expect("simulation");

    let mut ticks = 0;
    while !sim.is_complete() && ticks < 2000 {
        sim.tick();
        ticks += 1;
    }
    assert!(sim.is_complete(), "exploration did not finish in {} ticks", ticks);

    let total_free = cave.count(CellState::Free);
    for drone in sim.drones() {
        let map = drone.internal_map();
        assert!(drone.frontier_index().is_empty());

        // Near-total coverage of the open space.
        let known_free = (0..cave.len())
            .map(|i| cave.unpack(i))
            .filter(|&c| cave.cell(c) == CellState::Free && map.cell(c) == CellState::Free)
            .count();
        assert!(
            known_free * 10 >= total_free * 9,
            "{} mapped only {} of {} free cells",
            drone.name(),
            known_free,
            total_free
        );

        // The internal map never contradicts the ground truth.
        for i in 0..cave.len() {
            let cell = cave.unpack(i);
            if cave.cell(cell) == CellState::Occupied {
                assert_ne!(map.cell(cell), CellState::Free);
                assert_ne!(map.cell(cell), CellState::Frontier);
            }
        }
    }
}

/// Drones within communication range actually exchange maps: cells a drone
/// never sensed itself show up via the comm counters.
#[test]
fn test_swarm_shares_knowledge() {
    let cave = make_cave(&[
        "####################",
        "#..................#",
        "#..................#",
        "#..................#",
        "####################",
    ]);
    let config =
        SwarmConfig::with_radii(cave.width(), cave.height(), 2, 3.0, 20.0, 5).expect("config");
    let spawns = [(2.0, 2.0), (17.0, 2.0)];
    let mut sim = SimulationManager::new(config, cave, &spawns, 9).expect("simulation");

    let mut ticks = 0;
    while !sim.is_complete() && ticks < 2000 {
        sim.tick();
        ticks += 1;
    }
    assert!(sim.is_complete());

    let total_comm: usize = sim
        .drones()
        .iter()
        .map(|d| d.stats().comm_free_count + d.stats().comm_occupied_count)
        .sum();
    assert!(total_comm > 0, "drones in range should have merged maps");
}

/// The generator produces a closed cave of the requested size with both open
/// space and rock, reproducibly per seed.
#[test]
fn test_cave_generation() {
    let params = CaveParams::default();
    let mut rng = StdRng::seed_from_u64(5);
    let cave = cave_generator::generate(60, 40, &params, &mut rng);

    assert_eq!(cave.width(), 60);
    assert_eq!(cave.height(), 40);
    for x in 0..60 {
        assert_eq!(cave.at(x, 0), CellState::Occupied);
        assert_eq!(cave.at(x, 39), CellState::Occupied);
    }
    for y in 0..40 {
        assert_eq!(cave.at(0, y), CellState::Occupied);
        assert_eq!(cave.at(59, y), CellState::Occupied);
    }
    let free = cave.count(CellState::Free);
    let occupied = cave.count(CellState::Occupied);
    assert_eq!(free + occupied, 60 * 40);
    assert!(free > 0, "cave should have open space");
    assert!(occupied > free / 20, "cave should have rock");

    let mut rng_again = StdRng::seed_from_u64(5);
    let cave_again = cave_generator::generate(60, 40, &params, &mut rng_again);
    for i in 0..cave.len() {
        let cell = cave.unpack(i);
        assert_eq!(cave.cell(cell), cave_again.cell(cell));
    }
}

/// History of poses grows monotonically in timestep for every drone.
#[test]
fn test_pose_history_is_monotone() {
    let cave = make_cave(&[
        "##########",
        "#........#",
        "#........#",
        "##########",
    ]);
    let config =
        SwarmConfig::with_radii(cave.width(), cave.height(), 2, 2.0, 4.0, 5).expect("config");
    let mut sim =
        SimulationManager::new(config, cave, &[(1.0, 1.0), (8.0, 2.0)], 21).expect("simulation");

    for _ in 0..50 {
        sim.tick();
    }
    for drone in sim.drones() {
        let history = drone.path_history();
        assert!(!history.is_empty());
        assert_eq!(history[0].timestep, 0);
        for pair in history.windows(2) {
            assert_eq!(pair[1].timestep, pair[0].timestep + 1);
        }
    }
}
