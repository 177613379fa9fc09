/// Drone state machine: sensing, mapping, frontier navigation

pub mod comms;
pub mod mapping;

use std::collections::VecDeque;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{ConfigError, SwarmConfig};
use crate::frontier::FrontierIndex;
use crate::path_planner;
use crate::sensor;
use crate::target_selector;
use crate::types::{Cell, CellState, Grid, Pose, PoseRecord};

/// Exploration counters reported by a drone.
#[derive(Copy, Clone, Debug)]
pub struct DroneStats {
    pub dist_travelled: f64,
    pub free_count: usize,
    pub occupied_count: usize,
    pub comm_free_count: usize,
    pub comm_occupied_count: usize,
    pub complete: bool,
}

/// One autonomous explorer.
///
/// A drone owns its private view of the cave (`internal_map` plus the
/// frontier index over it) and mutates it only from `step` and
/// `combine_with`. The ground truth is read through the sensor alone.
#[derive(Clone, Debug)]
pub struct Drone {
    id: usize,
    name: String,
    config: SwarmConfig,
    pose: Pose,
    complete: bool,
    internal_map: Grid,
    frontier_index: FrontierIndex,
    path_history: Vec<PoseRecord>,
    current_timestep: u32,
    current_target: Option<(Cell, u32)>,
    target_path: VecDeque<Cell>,
    last_comm: Vec<u32>,
    nearby_peers: Vec<(f64, f64)>,
    communicated_this_tick: bool,
    dist_travelled: f64,
    free_count: usize,
    occupied_count: usize,
    comm_free_count: usize,
    comm_occupied_count: usize,
    rng: StdRng,
}

impl Drone {
    /// Creates a drone at the given spawn position.
    ///
    /// The initial sense sweep, frontier classification and first target all
    /// happen here, and the spawn pose becomes `path_history[0]`.
    pub fn new(
        id: usize,
        name: &str,
        x: f64,
        y: f64,
        config: &SwarmConfig,
        cave: &Grid,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if cave.width() != config.width || cave.height() != config.height {
            return Err(ConfigError::GridMismatch {
                width: config.width,
                height: config.height,
                actual_width: cave.width(),
                actual_height: cave.height(),
            });
        }
        if x < 0.0 || y < 0.0 || x > config.width as f64 || y > config.height as f64 {
            return Err(ConfigError::SpawnOutOfBounds { x, y });
        }
        assert!(id < config.drone_count, "drone id {} out of range", id);

        let mut drone = Drone {
            id,
            name: name.to_string(),
            config: *config,
            pose: Pose { x, y, bearing: 0.0 },
            complete: false,
            internal_map: Grid::new(config.width, config.height, CellState::Unknown),
            frontier_index: FrontierIndex::new(),
            path_history: Vec::new(),
            current_timestep: 0,
            current_target: None,
            target_path: VecDeque::new(),
            last_comm: vec![0; config.drone_count],
            nearby_peers: Vec::new(),
            communicated_this_tick: false,
            dist_travelled: 0.0,
            free_count: 0,
            occupied_count: 0,
            comm_free_count: 0,
            comm_occupied_count: 0,
            rng: StdRng::seed_from_u64(seed),
        };

        let (free, occupied) = sensor::sense(&drone.pose, config.sense_radius, cave);
        drone.integrate_sense(&free, &occupied);
        drone.acquire_target();
        drone.record_pose();
        Ok(drone)
    }

    /// Advances the drone by one timestep.
    ///
    /// Completed drones are inert: once the frontier index has emptied no
    /// call here mutates any state.
    pub fn step(&mut self, cave: &Grid) {
        if self.complete {
            return;
        }
        self.tick(cave);
        self.nearby_peers.clear();
    }

    fn tick(&mut self, cave: &Grid) {
        // Staggered launch: drone k idles for k + 1 ticks so the swarm does
        // not depart as a single clump.
        if self.current_timestep <= self.id as u32 + 1 {
            self.record_pose();
            return;
        }

        if self.frontier_index.is_empty() {
            self.finish();
            return;
        }

        // Reselect when the target stopped being a frontier (someone reached
        // or resolved it) or when a merge brought in fresh map knowledge.
        if self.communicated_this_tick || !self.target_is_frontier() {
            self.communicated_this_tick = false;
            self.acquire_target();
            if self.complete {
                return;
            }
        } else if let Some(next) = self.target_path.pop_front() {
            self.set_position(next.x as f64, next.y as f64);
        }

        let (free, occupied) = sensor::sense(&self.pose, self.config.sense_radius, cave);
        self.integrate_sense(&free, &occupied);
        self.record_pose();
    }

    fn target_is_frontier(&self) -> bool {
        match self.current_target {
            Some((cell, _)) => self.internal_map.cell(cell) == CellState::Frontier,
            None => false,
        }
    }

    /// Selects a reachable frontier target and plans the path to it.
    ///
    /// Frontiers that A* cannot reach through known terrain are pruned from
    /// the index (and downgraded to plain free cells) before retrying; when
    /// the index runs dry the drone is complete.
    fn acquire_target(&mut self) {
        loop {
            let selected = target_selector::select_frontier(
                &self.frontier_index,
                &self.internal_map,
                &self.pose,
                &self.nearby_peers,
                &mut self.rng,
            );
            let Some((cell, ts)) = selected else {
                self.finish();
                return;
            };

            let start = self.closest_cell();
            let path = path_planner::find_path(start, cell, &self.internal_map);
            if path.is_empty() {
                self.frontier_index.remove(self.internal_map.pack(cell.x, cell.y));
                self.internal_map.set_cell(cell, CellState::Free);
                debug!(
                    "[{}] frontier ({}, {}) unreachable, pruned",
                    self.name, cell.x, cell.y
                );
                continue;
            }

            // The planner's path runs goal-to-start; walk it reversed with
            // the start cell dropped so the front is the next step towards
            // the goal.
            let mut steps: VecDeque<Cell> = path.into_iter().rev().skip(1).collect();
            if steps.is_empty() {
                steps.push_back(cell);
            }
            debug!(
                "[{}] new target ({}, {}) at {} steps",
                self.name,
                cell.x,
                cell.y,
                steps.len()
            );
            self.target_path = steps;
            self.current_target = Some((cell, ts));
            return;
        }
    }

    /// Moves the drone, updating bearing and total distance.
    fn set_position(&mut self, x: f64, y: f64) {
        let dx = x - self.pose.x;
        let dy = y - self.pose.y;
        self.dist_travelled += (dx * dx + dy * dy).sqrt();
        self.pose.bearing = dx.atan2(dy);
        self.pose.x = x;
        self.pose.y = y;
    }

    /// Snaps the continuous pose to the nearest in-bounds integer cell of
    /// the surrounding 2x2 block.
    fn closest_cell(&self) -> Cell {
        let mut best = None;
        let mut best_dist = f64::MAX;
        for i in (self.pose.x.floor() as i32)..=(self.pose.x.ceil() as i32) {
            for j in (self.pose.y.floor() as i32)..=(self.pose.y.ceil() as i32) {
                if !self.internal_map.in_bounds(i, j) {
                    continue;
                }
                let dist =
                    ((i as f64 - self.pose.x).powi(2) + (j as f64 - self.pose.y).powi(2)).sqrt();
                if dist < best_dist {
                    best_dist = dist;
                    best = Some(Cell::new(i, j));
                }
            }
        }
        // The pose stays within the cave, so the block always holds at least
        // one valid cell.
        best.unwrap_or_else(|| Cell::new(self.pose.x.floor() as i32, self.pose.y.floor() as i32))
    }

    fn record_pose(&mut self) {
        self.path_history.push(PoseRecord {
            timestep: self.current_timestep,
            x: self.pose.x,
            y: self.pose.y,
            bearing: self.pose.bearing,
        });
        self.current_timestep += 1;
    }

    fn finish(&mut self) {
        if self.complete {
            return;
        }
        self.complete = true;
        self.current_target = None;
        self.target_path.clear();
        info!("[{}] search complete", self.name);
        info!(
            "[{}] distance travelled: {:.1} - timesteps: {}",
            self.name, self.dist_travelled, self.current_timestep
        );
        info!(
            "[{}] free cells: {} ({} from peers) - occupied cells: {} ({} from peers)",
            self.name,
            self.free_count,
            self.comm_free_count,
            self.occupied_count,
            self.comm_occupied_count
        );
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn current_timestep(&self) -> u32 {
        self.current_timestep
    }

    pub fn internal_map(&self) -> &Grid {
        &self.internal_map
    }

    pub fn frontier_index(&self) -> &FrontierIndex {
        &self.frontier_index
    }

    pub fn current_target(&self) -> Option<(Cell, u32)> {
        self.current_target
    }

    pub fn path_history(&self) -> &[PoseRecord] {
        &self.path_history
    }

    pub fn stats(&self) -> DroneStats {
        DroneStats {
            dist_travelled: self.dist_travelled,
            free_count: self.free_count,
            occupied_count: self.occupied_count,
            comm_free_count: self.comm_free_count,
            comm_occupied_count: self.comm_occupied_count,
            complete: self.complete,
        }
    }
}
