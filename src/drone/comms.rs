/// Inter-drone communication: rendezvous bookkeeping and map merging

use log::debug;

use super::Drone;
use crate::frontier::FrontierIndex;
use crate::types::{Cell, CellState, Grid};

impl Drone {
    /// Notes a peer position for this tick; the target selector steers away
    /// from directions peers already cover. Cleared after every step.
    pub fn record_nearby_peer(&mut self, x: f64, y: f64) {
        self.nearby_peers.push((x, y));
    }

    /// True when the cooldown since the last merge with this peer has
    /// elapsed.
    pub fn may_communicate_with(&self, peer_id: usize) -> bool {
        self.current_timestep >= self.last_comm[peer_id] + self.config.comm_cooldown
    }

    /// Merges a peer's map into this drone's state.
    ///
    /// Peer knowledge only ever fills in Unknown cells or settles frontiers;
    /// this drone's own classification dominates everywhere else, and in
    /// particular an Occupied cell is never downgraded by a peer reporting it
    /// Free. Frontiers created by the merge are stamped with timestep 0 so
    /// the recency weighting keeps preferring locally discovered ones.
    ///
    /// The peer's frontier timestamps are not consulted; the parameter
    /// documents the exchanged payload.
    pub fn combine_with(
        &mut self,
        peer_map: &Grid,
        _peer_frontiers: &FrontierIndex,
        peer_id: usize,
    ) {
        assert!(peer_id != self.id, "drone {} merging with itself", self.id);

        let mut recheck: Vec<Cell> = Vec::new();

        for index in 0..peer_map.len() {
            let cell = peer_map.unpack(index);
            let peer_state = peer_map.cell(cell);
            let own_state = self.internal_map.cell(cell);

            match (peer_state, own_state) {
                (CellState::Occupied, CellState::Unknown) => {
                    self.internal_map.set_cell(cell, CellState::Occupied);
                    self.occupied_count += 1;
                    self.comm_occupied_count += 1;
                    self.queue_frontier_neighbours(cell, &mut recheck);
                }
                (CellState::Free, CellState::Unknown) => {
                    self.internal_map.set_cell(cell, CellState::Free);
                    self.free_count += 1;
                    self.comm_free_count += 1;
                    self.queue_frontier_neighbours(cell, &mut recheck);
                }
                (CellState::Free, CellState::Frontier) => {
                    // The peer has seen past this frontier; settle it.
                    self.frontier_index.remove(index);
                    self.internal_map.set_cell(cell, CellState::Free);
                    self.queue_frontier_neighbours(cell, &mut recheck);
                }
                (CellState::Frontier, CellState::Unknown) => {
                    // A peer frontier is free ground; whether it stays a
                    // frontier here depends on this drone's own unknowns.
                    self.internal_map.set_cell(cell, CellState::Free);
                    self.free_count += 1;
                    self.comm_free_count += 1;
                    recheck.push(cell);
                }
                // Everything else: own classification dominates.
                _ => {}
            }
        }

        for cell in recheck {
            let index = self.internal_map.pack(cell.x, cell.y);
            if self.internal_map.has_unknown_neighbour(cell) {
                self.internal_map.set_cell(cell, CellState::Frontier);
                self.frontier_index.insert(index, 0);
            } else if self.internal_map.cell(cell) == CellState::Frontier {
                // The merge filled in this frontier's last unknown.
                self.internal_map.set_cell(cell, CellState::Free);
                self.frontier_index.remove(index);
            }
        }

        self.last_comm[peer_id] = self.current_timestep;
        self.communicated_this_tick = true;
        debug!(
            "[{}] merged map from drone {} at timestep {}",
            self.name, peer_id, self.current_timestep
        );
    }

    /// Queues the frontier cells adjacent to a merged-in cell: their Unknown
    /// border may just have changed.
    fn queue_frontier_neighbours(&mut self, cell: Cell, recheck: &mut Vec<Cell>) {
        for neighbour in cell.neighbours4() {
            if self.internal_map.in_bounds(neighbour.x, neighbour.y)
                && self.internal_map.cell(neighbour) == CellState::Frontier
            {
                recheck.push(neighbour);
            }
        }
    }
}
