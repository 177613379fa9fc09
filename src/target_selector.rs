use std::f64::consts::PI;

use rand::Rng;

use crate::constants::PEER_BEARING_SIGMA;
use crate::frontier::FrontierIndex;
use crate::types::{Cell, Grid, Pose};

/// Picks the frontier cell a drone should navigate to next.
///
/// With no nearby peers the most recently discovered frontier wins (ties by
/// proximity). With peers in range the choice is a weighted random sample
/// that favours close, recent frontiers pointing away from the directions
/// peers already cover, which spreads the swarm out. Returns `None` when the
/// index is empty.
pub fn select_frontier<R: Rng>(
    frontiers: &FrontierIndex,
    map: &Grid,
    pose: &Pose,
    peers: &[(f64, f64)],
    rng: &mut R,
) -> Option<(Cell, u32)> {
    let peer_bearings = peer_bearings(pose, peers);
    if peer_bearings.is_empty() {
        return latest_frontier(frontiers, map, pose);
    }

    let (min_ts, max_ts, min_dist, max_dist) = frontier_stats(frontiers, map, pose)?;

    let mut cumulative = 0.0;
    let mut weighted: Vec<(Cell, u32, f64)> = Vec::with_capacity(frontiers.len());

    for (index, ts) in frontiers.iter() {
        let cell = map.unpack(index);
        let dist = dist_to_pose(pose, cell.x as f64, cell.y as f64);
        let bearing = bearing_from(pose, cell.x as f64, cell.y as f64);

        let mut bearing_weight = 1.0;
        for &peer_bearing in &peer_bearings {
            let diff = (bearing - peer_bearing).abs();
            bearing_weight *= 1.0 - normal_pdf(diff, 0.0, PEER_BEARING_SIGMA);
        }
        bearing_weight = bearing_weight.max(0.0);

        let dist_range = max_dist - min_dist;
        let dist_weight = if dist_range == 0.0 {
            1.0
        } else {
            1.0 - (dist - min_dist) / dist_range
        };

        let ts_range = (max_ts - min_ts) as f64;
        let ts_weight = if ts_range == 0.0 {
            1.0
        } else {
            (ts - min_ts) as f64 / ts_range
        };

        let weight = dist_weight * ts_weight.powi(2) * bearing_weight;
        cumulative += weight;
        weighted.push((cell, ts, cumulative));
    }

    if cumulative <= 0.0 {
        return latest_frontier(frontiers, map, pose);
    }

    let sample = rng.gen::<f64>() * cumulative;
    for &(cell, ts, bound) in &weighted {
        if sample <= bound {
            return Some((cell, ts));
        }
    }
    // Rounding can leave the sample a hair past the final bound.
    weighted.last().map(|&(cell, ts, _)| (cell, ts))
}

/// The frontier with the greatest discovery timestep, ties broken by
/// Euclidean distance to the drone.
pub fn latest_frontier(
    frontiers: &FrontierIndex,
    map: &Grid,
    pose: &Pose,
) -> Option<(Cell, u32)> {
    let max_ts = frontiers.iter().map(|(_, ts)| ts).max()?;

    let mut best: Option<(Cell, u32)> = None;
    let mut best_dist = f64::MAX;
    for (index, ts) in frontiers.iter() {
        if ts != max_ts {
            continue;
        }
        let cell = map.unpack(index);
        let dist = dist_to_pose(pose, cell.x as f64, cell.y as f64);
        if dist < best_dist {
            best_dist = dist;
            best = Some((cell, ts));
        }
    }
    best
}

/// Min/max discovery timestep and distance across all frontiers.
fn frontier_stats(
    frontiers: &FrontierIndex,
    map: &Grid,
    pose: &Pose,
) -> Option<(u32, u32, f64, f64)> {
    let mut min_ts = u32::MAX;
    let mut max_ts = 0;
    let mut min_dist = f64::MAX;
    let mut max_dist = 0.0_f64;

    for (index, ts) in frontiers.iter() {
        min_ts = min_ts.min(ts);
        max_ts = max_ts.max(ts);
        let cell = map.unpack(index);
        let dist = dist_to_pose(pose, cell.x as f64, cell.y as f64);
        min_dist = min_dist.min(dist);
        max_dist = max_dist.max(dist);
    }

    if frontiers.is_empty() {
        None
    } else {
        Some((min_ts, max_ts, min_dist, max_dist))
    }
}

/// Bearings from the drone to each nearby peer, skipping peers that share
/// the drone's exact position.
fn peer_bearings(pose: &Pose, peers: &[(f64, f64)]) -> Vec<f64> {
    peers
        .iter()
        .filter(|&&(x, y)| x != pose.x || y != pose.y)
        .map(|&(x, y)| bearing_from(pose, x, y))
        .collect()
}

/// Bearing from the pose to a point, normalised to [0, 2*PI).
fn bearing_from(pose: &Pose, x: f64, y: f64) -> f64 {
    let theta = (x - pose.x).atan2(y - pose.y);
    if theta < 0.0 {
        theta + 2.0 * PI
    } else {
        theta
    }
}

fn dist_to_pose(pose: &Pose, x: f64, y: f64) -> f64 {
    ((x - pose.x).powi(2) + (y - pose.y).powi(2)).sqrt()
}

/// Probability density of a normal distribution.
fn normal_pdf(x: f64, mean: f64, std: f64) -> f64 {
    let var = std * std;
    let coeff = 1.0 / (2.0 * PI * var).sqrt();
    coeff * (-(x - mean).powi(2) / (2.0 * var)).exp()
}
