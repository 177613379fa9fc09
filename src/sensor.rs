use crate::types::{CellState, Grid, Pose};

/// A ground-truth cell observed by the sensor, with its range from the drone.
#[derive(Copy, Clone, Debug)]
pub struct SenseCell {
    pub x: i32,
    pub y: i32,
    pub range: f64,
}

/// Senses the cave around a pose, honouring line-of-sight occlusion.
///
/// Returns the visible free cells and visible occupied cells within `radius`
/// of the pose. Candidates are swept near-to-far so that every occupied cell
/// is registered as a shadow caster before anything it could hide is tested.
/// Occluded cells are never returned, but occluded occupied cells still cast
/// shadows of their own.
pub fn sense(pose: &Pose, radius: f64, cave: &Grid) -> (Vec<SenseCell>, Vec<SenseCell>) {
    let mut free_cells = Vec::new();
    let mut occupied_cells = Vec::new();
    // Occupied cells found so far, visible or not.
    let mut casters: Vec<SenseCell> = Vec::new();

    let mut candidates = collect_candidates(pose, radius, cave);
    candidates.sort_by(|a, b| a.range.partial_cmp(&b.range).unwrap_or(std::cmp::Ordering::Equal));

    for dest in candidates {
        // Adjacent cells are always visible.
        let visible = dest.range <= 1.0
            || !casters
                .iter()
                .any(|caster| segment_hits_cell(pose, &dest, caster));

        if cave.at(dest.x, dest.y) == CellState::Free {
            if visible {
                free_cells.push(dest);
            }
        } else {
            if visible {
                occupied_cells.push(dest);
            }
            casters.push(dest);
        }
    }

    (free_cells, occupied_cells)
}

/// Enumerates in-range cells inside the bounding box of the sense disk,
/// clipped to the grid.
fn collect_candidates(pose: &Pose, radius: f64, cave: &Grid) -> Vec<SenseCell> {
    let x_lo = ((pose.x - radius).floor() as i32).max(0);
    let x_hi = ((pose.x + radius).ceil() as i32).min(cave.width() as i32 - 1);
    let y_lo = ((pose.y - radius).floor() as i32).max(0);
    let y_hi = ((pose.y + radius).ceil() as i32).min(cave.height() as i32 - 1);

    let mut candidates = Vec::new();
    for x in x_lo..=x_hi {
        for y in y_lo..=y_hi {
            let range = ((x as f64 - pose.x).powi(2) + (y as f64 - pose.y).powi(2)).sqrt();
            if range <= radius {
                candidates.push(SenseCell { x, y, range });
            }
        }
    }
    candidates
}

/// Tests whether the segment from the pose to `dest`'s centre crosses the
/// unit square of `caster`.
///
/// The segment is parameterised as (pose + t * delta) for t in [0, 1]; each of
/// the four edge planes of the square is intersected and the hit accepted if
/// the complementary coordinate falls strictly inside the half-width of the
/// square, so a segment grazing a corner exactly does not occlude.
/// Degenerate axis-parallel segments produce infinite or NaN t values whose
/// comparisons all fail, so they need no special casing.
fn segment_hits_cell(pose: &Pose, dest: &SenseCell, caster: &SenseCell) -> bool {
    let dx = dest.x as f64 - pose.x;
    let dy = dest.y as f64 - pose.y;
    let cx = caster.x as f64;
    let cy = caster.y as f64;

    for face_x in [cx - 0.5, cx + 0.5] {
        let t = (face_x - pose.x) / dx;
        if (0.0..=1.0).contains(&t) {
            let y_hit = pose.y + t * dy;
            if y_hit > cy - 0.5 && y_hit < cy + 0.5 {
                return true;
            }
        }
    }
    for face_y in [cy - 0.5, cy + 0.5] {
        let t = (face_y - pose.y) / dy;
        if (0.0..=1.0).contains(&t) {
            let x_hit = pose.x + t * dx;
            if x_hit > cx - 0.5 && x_hit < cx + 0.5 {
                return true;
            }
        }
    }
    false
}
