use log::debug;

use crate::config::{ConfigError, SwarmConfig};
use crate::drone::Drone;
use crate::types::Grid;

/// Manages the simulation environment, drones, and clock.
///
/// The manager owns the ground-truth cave and mediates everything drones may
/// not do themselves: spotting peers within communication range and pairing
/// them up for map merges. Merges happen before the drones step, so no drone
/// is ever mid-step while its state is being combined.
pub struct SimulationManager {
    config: SwarmConfig,
    cave: Grid,
    drones: Vec<Drone>,
}

impl SimulationManager {
    /// Initialises the simulation with one drone per spawn position.
    pub fn new(
        config: SwarmConfig,
        cave: Grid,
        spawns: &[(f64, f64)],
        seed: u64,
    ) -> Result<Self, ConfigError> {
        assert_eq!(
            spawns.len(),
            config.drone_count,
            "one spawn position per drone required"
        );
        let mut drones = Vec::with_capacity(spawns.len());
        for (id, &(x, y)) in spawns.iter().enumerate() {
            let name = format!("drone-{}", id);
            drones.push(Drone::new(id, &name, x, y, &config, &cave, seed + id as u64)?);
        }
        Ok(SimulationManager {
            config,
            cave,
            drones,
        })
    }

    /// Advances the simulation by one tick: peer detection, merges, then one
    /// step per drone. Completed drones no longer participate.
    pub fn tick(&mut self) {
        self.record_nearby_peers();
        self.mediate_merges();
        let cave = &self.cave;
        for drone in &mut self.drones {
            drone.step(cave);
        }
    }

    fn record_nearby_peers(&mut self) {
        let poses: Vec<_> = self.drones.iter().map(|d| d.pose()).collect();
        let active: Vec<bool> = self.drones.iter().map(|d| !d.is_complete()).collect();
        for i in 0..self.drones.len() {
            if !active[i] {
                continue;
            }
            for j in 0..self.drones.len() {
                if i == j || !active[j] {
                    continue;
                }
                let dist =
                    ((poses[i].x - poses[j].x).powi(2) + (poses[i].y - poses[j].y).powi(2)).sqrt();
                if dist <= self.config.comm_radius {
                    self.drones[i].record_nearby_peer(poses[j].x, poses[j].y);
                }
            }
        }
    }

    /// Pairs up in-range drones whose communication cooldowns have elapsed
    /// and merges their maps both ways, from snapshots taken before either
    /// side mutates.
    fn mediate_merges(&mut self) {
        for i in 0..self.drones.len() {
            for j in i + 1..self.drones.len() {
                if self.drones[i].is_complete() || self.drones[j].is_complete() {
                    continue;
                }
                let (pi, pj) = (self.drones[i].pose(), self.drones[j].pose());
                let dist = ((pi.x - pj.x).powi(2) + (pi.y - pj.y).powi(2)).sqrt();
                if dist > self.config.comm_radius {
                    continue;
                }
                if !self.drones[i].may_communicate_with(j)
                    || !self.drones[j].may_communicate_with(i)
                {
                    continue;
                }

                debug!("merging maps of drones {} and {}", i, j);
                let map_i = self.drones[i].internal_map().clone();
                let frontiers_i = self.drones[i].frontier_index().clone();
                let map_j = self.drones[j].internal_map().clone();
                let frontiers_j = self.drones[j].frontier_index().clone();
                self.drones[i].combine_with(&map_j, &frontiers_j, j);
                self.drones[j].combine_with(&map_i, &frontiers_i, i);
            }
        }
    }

    /// True once every drone has exhausted its frontier index.
    pub fn is_complete(&self) -> bool {
        self.drones.iter().all(|d| d.is_complete())
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn cave(&self) -> &Grid {
        &self.cave
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }
}
