/// Internal map updates from sensor sweeps

use super::Drone;
use crate::sensor::SenseCell;
use crate::types::{Cell, CellState};

impl Drone {
    /// Folds one sense sweep into the internal map and refreshes the
    /// frontier classification around it.
    pub(super) fn integrate_sense(&mut self, free: &[SenseCell], occupied: &[SenseCell]) {
        for cell in free {
            if self.internal_map.at(cell.x, cell.y) == CellState::Unknown {
                self.internal_map.set(cell.x, cell.y, CellState::Free);
                self.free_count += 1;
            }
        }
        for cell in occupied {
            if self.internal_map.at(cell.x, cell.y) == CellState::Unknown {
                self.internal_map.set(cell.x, cell.y, CellState::Occupied);
                self.occupied_count += 1;
            }
        }
        self.refresh_frontiers(free, occupied);
    }

    /// Reclassifies frontiers touched by a sense sweep.
    ///
    /// Every sensed free cell, and every previously-frontier neighbour of any
    /// sensed cell, goes through the recheck: cells still bordering Unknown
    /// become (or stay) frontiers stamped with the current timestep, the rest
    /// settle as plain free cells.
    fn refresh_frontiers(&mut self, free: &[SenseCell], occupied: &[SenseCell]) {
        let mut recheck: Vec<Cell> = Vec::new();

        for sensed in free {
            let cell = Cell::new(sensed.x, sensed.y);
            if self.internal_map.cell(cell) == CellState::Frontier {
                self.internal_map.set_cell(cell, CellState::Free);
                self.frontier_index.remove(self.internal_map.pack(cell.x, cell.y));
            }
            self.demote_frontier_neighbours(cell, &mut recheck);
            recheck.push(cell);
        }
        for sensed in occupied {
            let cell = Cell::new(sensed.x, sensed.y);
            self.demote_frontier_neighbours(cell, &mut recheck);
        }

        for cell in recheck {
            if self.internal_map.cell(cell) != CellState::Free {
                continue;
            }
            if self.internal_map.has_unknown_neighbour(cell) {
                self.internal_map.set_cell(cell, CellState::Frontier);
                self.frontier_index
                    .insert(self.internal_map.pack(cell.x, cell.y), self.current_timestep);
            }
        }
    }

    /// Downgrades frontier neighbours of a freshly sensed cell to free and
    /// queues them for reclassification.
    fn demote_frontier_neighbours(&mut self, cell: Cell, recheck: &mut Vec<Cell>) {
        for neighbour in cell.neighbours4() {
            if self.internal_map.in_bounds(neighbour.x, neighbour.y)
                && self.internal_map.cell(neighbour) == CellState::Frontier
            {
                self.internal_map.set_cell(neighbour, CellState::Free);
                self.frontier_index
                    .remove(self.internal_map.pack(neighbour.x, neighbour.y));
                recheck.push(neighbour);
            }
        }
    }
}
