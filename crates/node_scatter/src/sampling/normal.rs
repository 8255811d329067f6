//! Normally distributed scatter around a center coordinate.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::geom::{point_at_bearing_distance, Coordinate};
use crate::sampling::{normal01, rand01, NodeSampling};

/// Great-circle normal scatter, unconstrained: per point, bearing ~
/// U(0°, 360°) and radial offset ~ N(0, std_dev_m). Negative offsets land on
/// the reciprocal bearing, so the distribution is symmetric about the
/// center.
#[derive(Debug, Clone)]
pub struct NormalSampling {
    pub center: Coordinate,
    /// Standard deviation of the radial offset, in meters.
    pub std_dev_m: f64,
}

impl NormalSampling {
    pub fn new(center: Coordinate, std_dev_m: f64) -> Self {
        Self { center, std_dev_m }
    }
}

impl NodeSampling for NormalSampling {
    fn sample(&self, count: usize, rng: &mut dyn RngCore) -> Result<Vec<Coordinate>> {
        check_std_dev(self.std_dev_m)?;

        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(draw_around(self.center, self.std_dev_m, rng));
        }
        Ok(out)
    }
}

pub(crate) fn check_std_dev(std_dev_m: f64) -> Result<()> {
    if !std_dev_m.is_finite() || std_dev_m <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "std_dev_m must be finite and > 0, got {std_dev_m}"
        )));
    }
    Ok(())
}

/// One (bearing, offset) draw resolved to a coordinate.
pub(crate) fn draw_around(center: Coordinate, std_dev_m: f64, rng: &mut dyn RngCore) -> Coordinate {
    let bearing = rand01(rng) * 360.0;
    let offset = normal01(rng) * std_dev_m;
    point_at_bearing_distance(center, bearing, offset)
}
