use cave_swarm::config::{ConfigError, SwarmConfig};
use cave_swarm::drone::Drone;
use cave_swarm::types::{Cell, CellState, Grid};

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

fn config_for(cave: &Grid, drones: usize, sense: f64, comm: f64, cooldown: u32) -> SwarmConfig {
    SwarmConfig::with_radii(cave.width(), cave.height(), drones, sense, comm, cooldown)
        .expect("valid config")
}

/// Checks the structural invariants that must hold between core calls.
fn assert_invariants(drone: &Drone) {
    let map = drone.internal_map();
    let frontiers = drone.frontier_index();

    let mut frontier_cells = 0;
    for i in 0..map.len() {
        let cell = map.unpack(i);
        match map.cell(cell) {
            CellState::Frontier => {
                frontier_cells += 1;
                assert!(
                    frontiers.contains(i),
                    "frontier cell ({}, {}) missing from index",
                    cell.x,
                    cell.y
                );
                assert!(
                    map.has_unknown_neighbour(cell),
                    "frontier cell ({}, {}) has no unknown neighbour",
                    cell.x,
                    cell.y
                );
            }
            _ => assert!(
                !frontiers.contains(i),
                "index entry for non-frontier cell ({}, {})",
                cell.x,
                cell.y
            ),
        }
    }
    assert_eq!(frontier_cells, frontiers.len());

    // Distance travelled equals the summed pose-history step lengths.
    let history = drone.path_history();
    let travelled: f64 = history
        .windows(2)
        .map(|p| ((p[1].x - p[0].x).powi(2) + (p[1].y - p[0].y).powi(2)).sqrt())
        .sum();
    assert!((travelled - drone.stats().dist_travelled).abs() < 1e-9);
}

/// Frontier bootstrap: after construction the sense disk is mapped free and
/// exactly its unknown-bordering rim is indexed as frontiers.
#[test]
fn test_initial_sense_builds_frontier_rim() {
    let cave = make_cave(&[
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
    ]);
    let config = config_for(&cave, 1, 2.0, 10.0, 25);
    let drone = Drone::new(0, "scout", 5.0, 5.0, &config, &cave, 7).expect("spawn");

    let map = drone.internal_map();
    assert_eq!(map.at(5, 5), CellState::Free);
    assert_eq!(map.at(8, 5), CellState::Unknown, "beyond the sense radius");

    // Every known free cell is interior; every frontier borders unknown.
    for i in 0..map.len() {
        let cell = map.unpack(i);
        match map.cell(cell) {
            CellState::Free => assert!(!map.has_unknown_neighbour(cell)),
            CellState::Frontier => assert!(map.has_unknown_neighbour(cell)),
            _ => {}
        }
    }
    assert!(!drone.frontier_index().is_empty());
    let stats = drone.stats();
    assert_eq!(
        stats.free_count,
        map.count(CellState::Free) + map.count(CellState::Frontier)
    );
    assert_eq!(stats.occupied_count, 0);
    assert_invariants(&drone);
}

/// A frontier reachable only by cutting a corner is pruned and exploration
/// completes when nothing else remains.
#[test]
fn test_unreachable_pocket_frontier_is_pruned() {
    // The pocket at (2,2) is visible diagonally from (1,1) but cannot be
    // entered: both orthogonal cells beside the diagonal are rock.
    let cave = make_cave(&[
        "######",
        "#.####",
        "##..##",
        "######",
    ]);
    let config = config_for(&cave, 1, 10.0, 10.0, 25);
    let drone = Drone::new(0, "scout", 1.0, 1.0, &config, &cave, 7).expect("spawn");

    assert!(drone.is_complete());
    assert!(drone.frontier_index().is_empty());
    assert_eq!(drone.internal_map().at(2, 2), CellState::Free);
    assert_invariants(&drone);
}

/// When a reachable frontier exists alongside an unreachable one, the
/// unreachable one is dropped and the reachable one becomes the target.
#[test]
fn test_prune_then_select_reachable_frontier() {
    // Pocket (4,2) is nearer than the corridor frontier (1,1) so the
    // selector tries it first, fails to plan into it, prunes it and retries.
    let cave = make_cave(&[
        "#######",
        "#...###",
        "####.##",
        "#######",
        "#######",
    ]);
    let config = config_for(&cave, 1, 2.0, 10.0, 25);
    let mut drone = Drone::new(0, "scout", 3.0, 1.0, &config, &cave, 7).expect("spawn");

    assert!(!drone.is_complete());
    let map = drone.internal_map();
    assert_eq!(map.at(4, 2), CellState::Free, "pruned pocket frontier settles as free");
    assert!(!drone.frontier_index().contains(map.pack(4, 2)));
    assert_eq!(drone.current_target().map(|(c, _)| c), Some(Cell::new(1, 1)));
    assert_invariants(&drone);

    // The drone then walks towards the reachable frontier.
    drone.step(&cave); // staggered launch tick
    let before = drone.pose();
    drone.step(&cave);
    let after = drone.pose();
    assert!(after.x < before.x, "drone should move west along the corridor");
    assert_invariants(&drone);
}

/// Completion: a fully visible room is mapped at construction, the drone
/// flips to complete and further steps mutate nothing.
#[test]
fn test_complete_room_is_inert() {
    let cave = make_cave(&[
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
    ]);
    let config = config_for(&cave, 1, 10.0, 10.0, 25);
    let mut drone = Drone::new(0, "scout", 5.0, 5.0, &config, &cave, 7).expect("spawn");

    let stats = drone.stats();
    assert!(stats.complete);
    assert_eq!(stats.free_count, 100);
    assert_eq!(stats.occupied_count, 0);
    assert!(drone.frontier_index().is_empty());

    let history_len = drone.path_history().len();
    let timestep = drone.current_timestep();
    for _ in 0..3 {
        drone.step(&cave);
    }
    assert_eq!(drone.path_history().len(), history_len);
    assert_eq!(drone.current_timestep(), timestep);
    assert!(drone.is_complete());
}

/// A lone drone in a walled room explores it to completion and its counters
/// match its final map.
#[test]
fn test_exploration_runs_to_completion() {
    let cave = make_cave(&[
        "############",
        "#..........#",
        "#....##....#",
        "#..........#",
        "#..........#",
        "############",
    ]);
    let config = config_for(&cave, 1, 3.0, 10.0, 25);
    let mut drone = Drone::new(0, "scout", 2.0, 2.0, &config, &cave, 7).expect("spawn");

    let mut known: Vec<bool> = vec![false; cave.len()];
    for _ in 0..500 {
        drone.step(&cave);
        assert_invariants(&drone);

        // No cell ever reverts to unknown.
        let map = drone.internal_map();
        for i in 0..map.len() {
            let state = map.cell(map.unpack(i));
            if known[i] {
                assert_ne!(state, CellState::Unknown, "cell {} reverted to unknown", i);
            } else if state != CellState::Unknown {
                known[i] = true;
            }
        }
        if drone.is_complete() {
            break;
        }
    }

    assert!(drone.is_complete());
    let map = drone.internal_map();
    // Every reachable free cell was discovered.
    for i in 0..cave.len() {
        let cell = cave.unpack(i);
        if cave.cell(cell) == CellState::Free {
            assert_eq!(map.cell(cell), CellState::Free);
        }
    }
    let stats = drone.stats();
    assert_eq!(stats.free_count, cave.count(CellState::Free));
    assert_eq!(stats.comm_free_count, 0);
    assert_eq!(stats.comm_occupied_count, 0);
}

/// Drones launch staggered by id: drone k idles for its first k + 1 steps.
#[test]
fn test_staggered_launch() {
    let cave = make_cave(&[
        "########",
        "#......#",
        "#......#",
        "########",
    ]);
    let config = config_for(&cave, 3, 2.0, 10.0, 25);
    let mut drone = Drone::new(2, "tail", 1.0, 1.0, &config, &cave, 7).expect("spawn");

    let spawn = drone.pose();
    for _ in 0..3 {
        drone.step(&cave);
        let pose = drone.pose();
        assert_eq!((pose.x, pose.y), (spawn.x, spawn.y));
    }
    assert_eq!(drone.stats().dist_travelled, 0.0);

    drone.step(&cave);
    let pose = drone.pose();
    assert!((pose.x, pose.y) != (spawn.x, spawn.y), "stagger over, drone moves");
    assert_invariants(&drone);
}

/// Construction fails loudly on bad parameters.
#[test]
fn test_constructor_preconditions() {
    let cave = make_cave(&["....", "....", "....", "...."]);

    assert_eq!(
        SwarmConfig::new(0, 4, 1),
        Err(ConfigError::EmptyGrid { width: 0, height: 4 })
    );
    assert_eq!(SwarmConfig::new(4, 4, 0), Err(ConfigError::NoDrones));
    assert!(matches!(
        SwarmConfig::with_radii(4, 4, 1, -1.0, 10.0, 25),
        Err(ConfigError::NonPositiveRadius { name: "sense_radius", .. })
    ));

    let config = SwarmConfig::new(4, 4, 1).expect("valid");
    assert!(matches!(
        Drone::new(0, "scout", 9.0, 1.0, &config, &cave, 7),
        Err(ConfigError::SpawnOutOfBounds { .. })
    ));

    let wrong = make_cave(&["..", ".."]);
    assert!(matches!(
        Drone::new(0, "scout", 1.0, 1.0, &config, &wrong, 7),
        Err(ConfigError::GridMismatch { .. })
    ));
}
