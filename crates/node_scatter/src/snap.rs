//! Road-network snap adapter boundary.
//!
//! Concrete providers (OSRM, pgRouting, ...) live outside this crate; the
//! generator only depends on this trait.
use crate::error::Result;
use crate::geom::Coordinate;

/// Maps coordinates to their nearest road-network points.
///
/// `snap_batch` must return one output per input, in input order, each the
/// nearest road-network point for the corresponding input. Provider failure
/// surfaces as [crate::error::Error::Snap] and is never retried here; the
/// caller may re-invoke.
pub trait RoadSnap: Send + Sync {
    fn snap_batch(&self, locs: &[Coordinate]) -> Result<Vec<Coordinate>>;
}
