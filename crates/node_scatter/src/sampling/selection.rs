//! Area-weighted selection of triangulation cells.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::sampling::rand01;

/// Pick an index with probability proportional to `areas[i]`.
///
/// Draws u ~ U[0, total) and scans the cumulative sum for the containing
/// interval. Degenerate (zero-area) entries are never selected. A
/// non-positive or non-finite total is an [Error::InvalidConfig], not a
/// division by zero.
pub fn pick_area_weighted(areas: &[f64], rng: &mut dyn RngCore) -> Result<usize> {
    let total: f64 = areas.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(Error::InvalidConfig(
            "total triangulated area is zero or non-finite".into(),
        ));
    }

    let mut roll = rand01(rng) * total;
    for (i, &area) in areas.iter().enumerate() {
        if area <= 0.0 {
            continue;
        }
        roll -= area;
        if roll <= 0.0 {
            return Ok(i);
        }
    }

    // Floating-point slack can leave a sliver of roll; fall back to the last
    // non-degenerate cell.
    areas
        .iter()
        .rposition(|&a| a > 0.0)
        .ok_or_else(|| Error::InvalidConfig("no cell with positive area".into()))
}
