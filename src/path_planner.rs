use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::types::{Cell, CellState, Grid};

/// Implements A* search over a drone's internal map.
///
/// Free and frontier cells are traversable; the goal itself is normally a
/// frontier. Movement is 8-connected, with a diagonal admitted only when both
/// orthogonal neighbours it cuts between are traversable, so paths cannot
/// squeeze through occupied corners. Edge costs are Euclidean and the
/// heuristic is Manhattan distance, which slightly overestimates on
/// diagonals; the resulting paths may be marginally suboptimal.
///
/// The returned path runs from the goal back to the start (the natural order
/// of the parent-chain walk); callers step along it reversed. An empty vector
/// means the goal is unreachable through known terrain.
pub fn find_path(start: Cell, goal: Cell, map: &Grid) -> Vec<Cell> {
    if start == goal {
        return vec![start];
    }

    let start_i = map.pack(start.x, start.y);
    let goal_i = map.pack(goal.x, goal.y);

    let mut open = BinaryHeap::new();
    let mut closed: HashSet<usize> = HashSet::new();
    let mut previous: HashMap<usize, usize> = HashMap::new();
    let mut g_score: HashMap<usize, f64> = HashMap::new();

    g_score.insert(start_i, 0.0);
    open.push(OpenNode {
        f: manhattan(start, goal),
        index: start_i,
    });

    while let Some(node) = open.pop() {
        if closed.contains(&node.index) {
            continue; // stale queue entry
        }
        if node.index == goal_i {
            return reconstruct(&previous, map, node.index);
        }
        closed.insert(node.index);

        let current = map.unpack(node.index);
        for neighbour in neighbours8(current, map) {
            let neighbour_i = map.pack(neighbour.x, neighbour.y);
            if closed.contains(&neighbour_i) {
                continue;
            }
            let tentative = g_score[&node.index] + euclidean(current, neighbour);
            if tentative < *g_score.get(&neighbour_i).unwrap_or(&f64::INFINITY) {
                previous.insert(neighbour_i, node.index);
                g_score.insert(neighbour_i, tentative);
                open.push(OpenNode {
                    f: tentative + manhattan(neighbour, goal),
                    index: neighbour_i,
                });
            }
        }
    }

    Vec::new()
}

/// Walks the parent chain from the goal back to the start.
fn reconstruct(previous: &HashMap<usize, usize>, map: &Grid, goal_i: usize) -> Vec<Cell> {
    let mut path = vec![map.unpack(goal_i)];
    let mut current = goal_i;
    while let Some(&parent) = previous.get(&current) {
        current = parent;
        path.push(map.unpack(current));
    }
    path
}

fn traversable(map: &Grid, x: i32, y: i32) -> bool {
    map.in_bounds(x, y) && matches!(map.at(x, y), CellState::Free | CellState::Frontier)
}

/// Admissible 8-connected neighbours of a cell.
fn neighbours8(c: Cell, map: &Grid) -> Vec<Cell> {
    let left = traversable(map, c.x - 1, c.y);
    let right = traversable(map, c.x + 1, c.y);
    let down = traversable(map, c.x, c.y - 1);
    let up = traversable(map, c.x, c.y + 1);

    let mut neighbours = Vec::with_capacity(8);
    if left {
        neighbours.push(Cell::new(c.x - 1, c.y));
    }
    if right {
        neighbours.push(Cell::new(c.x + 1, c.y));
    }
    if down {
        neighbours.push(Cell::new(c.x, c.y - 1));
    }
    if up {
        neighbours.push(Cell::new(c.x, c.y + 1));
    }
    // Diagonals must not cut between occupied orthogonals.
    if down && left && traversable(map, c.x - 1, c.y - 1) {
        neighbours.push(Cell::new(c.x - 1, c.y - 1));
    }
    if down && right && traversable(map, c.x + 1, c.y - 1) {
        neighbours.push(Cell::new(c.x + 1, c.y - 1));
    }
    if up && left && traversable(map, c.x - 1, c.y + 1) {
        neighbours.push(Cell::new(c.x - 1, c.y + 1));
    }
    if up && right && traversable(map, c.x + 1, c.y + 1) {
        neighbours.push(Cell::new(c.x + 1, c.y + 1));
    }
    neighbours
}

fn manhattan(a: Cell, b: Cell) -> f64 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) as f64
}

fn euclidean(a: Cell, b: Cell) -> f64 {
    (((a.x - b.x).pow(2) + (a.y - b.y).pow(2)) as f64).sqrt()
}

/// Open-set entry ordered so the heap pops the lowest f-score, breaking ties
/// on the lowest packed index.
#[derive(Copy, Clone, Debug)]
struct OpenNode {
    f: f64,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}
