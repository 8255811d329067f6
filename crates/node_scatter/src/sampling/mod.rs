//! Sampling strategies for generating node coordinates.
//!
//! This module defines the trait and concrete strategies used by the
//! generator to produce coordinate batches for a chosen spatial
//! distribution. All randomness flows through a caller-supplied
//! [rand::RngCore], so concurrent callers and tests control their own seeds.
use rand::RngCore;

use crate::error::Result;
use crate::geom::Coordinate;

pub mod normal;
pub mod normal_bounded;
pub mod road_proximity;
pub mod selection;
pub mod uniform_polygon;

pub use normal::NormalSampling;
pub use normal_bounded::NormalBoundedSampling;
pub use road_proximity::RoadProximitySampling;
pub use uniform_polygon::UniformPolygonSampling;

/// Trait for node coordinate sampling.
///
/// Implementations return exactly `count` coordinates or an error; batches
/// are never silently truncated.
pub trait NodeSampling: Send + Sync {
    fn sample(&self, count: usize, rng: &mut dyn RngCore) -> Result<Vec<Coordinate>>;
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() as f64) / ((u64::MAX as f64) + 1.0)
}

/// Standard normal draw via the Box-Muller transform.
#[inline]
pub(crate) fn normal01(rng: &mut dyn RngCore) -> f64 {
    let u1 = (1.0 - rand01(rng)).clamp(f64::MIN_POSITIVE, 1.0);
    let u2 = rand01(rng);

    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
