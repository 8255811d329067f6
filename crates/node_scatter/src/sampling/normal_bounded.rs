//! Polygon-truncated normal scatter.
use rand::RngCore;
use tracing::warn;

use crate::error::{Error, Result};
use crate::geom::{Coordinate, Polygon};
use crate::sampling::normal::{check_std_dev, draw_around};
use crate::sampling::NodeSampling;

const WARN_AFTER_ATTEMPTS: u64 = 100_000;

/// Normal scatter with reject-and-resample against a bounding polygon: every
/// returned point satisfies the point-in-polygon test.
///
/// By default the rejection loop is unbounded, matching the reference
/// behavior; a boundary far from the center relative to `std_dev_m` may
/// never produce an acceptable draw. `with_max_attempts` caps the draws per
/// point and turns exhaustion into [Error::SamplingExhausted].
#[derive(Debug, Clone)]
pub struct NormalBoundedSampling {
    pub center: Coordinate,
    /// Standard deviation of the radial offset, in meters.
    pub std_dev_m: f64,
    /// Region every returned point must fall in.
    pub boundary: Polygon,
    /// Optional per-point cap on rejection draws.
    pub max_attempts: Option<u64>,
}

impl NormalBoundedSampling {
    pub fn new(center: Coordinate, std_dev_m: f64, boundary: Polygon) -> Self {
        Self {
            center,
            std_dev_m,
            boundary,
            max_attempts: None,
        }
    }

    /// Cap the rejection draws per point (builder-style).
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

impl NodeSampling for NormalBoundedSampling {
    fn sample(&self, count: usize, rng: &mut dyn RngCore) -> Result<Vec<Coordinate>> {
        check_std_dev(self.std_dev_m)?;

        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let mut attempts: u64 = 0;
            loop {
                let candidate = draw_around(self.center, self.std_dev_m, rng);
                attempts += 1;

                if self.boundary.contains(candidate) {
                    out.push(candidate);
                    break;
                }

                if let Some(cap) = self.max_attempts {
                    if attempts >= cap {
                        return Err(Error::SamplingExhausted { attempts });
                    }
                }

                if attempts == WARN_AFTER_ATTEMPTS {
                    warn!(
                        attempts,
                        "bounded normal rejection loop running hot; boundary may be unreachable from the center"
                    );
                }
            }
        }
        Ok(out)
    }
}
