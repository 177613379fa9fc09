use noise::{NoiseFn, Simplex};
use rand::rngs::StdRng;
use rand::Rng;

use crate::types::{CellState, Grid};

/// Tunables for procedural cave generation.
#[derive(Copy, Clone, Debug)]
pub struct CaveParams {
    /// Percentage of the noise field thresholded into rock.
    pub fill_percentage: u32,
    /// A cell turns to rock when it has more occupied neighbours than this.
    pub birth_threshold: u32,
    /// A cell erodes to free space when it has fewer occupied neighbours than this.
    pub death_threshold: u32,
    pub birth_chance: u32,
    pub death_chance: u32,
    /// Zoom factor applied to the noise field; larger values give smaller caverns.
    pub noise_scale: f64,
    /// Width of the always-occupied rock band around the cave.
    pub border: usize,
    pub smoothing_passes: u32,
}

impl Default for CaveParams {
    fn default() -> Self {
        CaveParams {
            fill_percentage: 45,
            birth_threshold: 4,
            death_threshold: 4,
            birth_chance: 100,
            death_chance: 75,
            noise_scale: 40.0,
            border: 3,
            smoothing_passes: 10,
        }
    }
}

/// Generates a ground-truth cave: Simplex noise thresholded into rock and
/// open space, then smoothed with a birth/death cellular automaton. The
/// border band is always rock so the cave is closed.
pub fn generate(width: usize, height: usize, params: &CaveParams, rng: &mut StdRng) -> Grid {
    let mut cave = randomise(width, height, params, rng);
    for _ in 0..params.smoothing_passes {
        cave = smooth(&cave, params, rng);
    }
    cave
}

fn randomise(width: usize, height: usize, params: &CaveParams, rng: &mut StdRng) -> Grid {
    let simplex = Simplex::new(rng.gen());
    let offset_x = rng.gen_range(0.0..100_000.0);
    let offset_y = rng.gen_range(0.0..100_000.0);
    let threshold = params.fill_percentage as f64 / 50.0 - 1.0;

    let mut cave = Grid::new(width, height, CellState::Free);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            if in_border(x, y, width, height, params.border) {
                cave.set(x, y, CellState::Occupied);
                continue;
            }
            let mapped_x = x as f64 / width as f64 * params.noise_scale + offset_x;
            let mapped_y = y as f64 / height as f64 * params.noise_scale + offset_y;
            let noise = simplex.get([mapped_x, mapped_y]);
            let state = if noise <= threshold {
                CellState::Occupied
            } else {
                CellState::Free
            };
            cave.set(x, y, state);
        }
    }
    cave
}

/// One birth/death automaton pass over the cave interior.
fn smooth(cave: &Grid, params: &CaveParams, rng: &mut StdRng) -> Grid {
    let width = cave.width();
    let height = cave.height();
    let mut next = cave.clone();

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            if in_border(x, y, width, height, params.border) {
                continue;
            }
            let neighbours = occupied_neighbours(cave, x, y);
            if neighbours > params.birth_threshold && chance(rng, params.birth_chance) {
                next.set(x, y, CellState::Occupied);
            } else if neighbours < params.death_threshold && chance(rng, params.death_chance) {
                next.set(x, y, CellState::Free);
            }
        }
    }
    next
}

fn occupied_neighbours(cave: &Grid, x: i32, y: i32) -> u32 {
    let mut count = 0;
    for i in x - 1..=x + 1 {
        for j in y - 1..=y + 1 {
            if (i, j) != (x, y) && cave.in_bounds(i, j) && cave.at(i, j) == CellState::Occupied {
                count += 1;
            }
        }
    }
    count
}

fn in_border(x: i32, y: i32, width: usize, height: usize, border: usize) -> bool {
    let border = border as i32;
    x < border || y < border || x >= width as i32 - border || y >= height as i32 - border
}

fn chance(rng: &mut StdRng, percent: u32) -> bool {
    rng.gen_range(0..100) < percent
}
