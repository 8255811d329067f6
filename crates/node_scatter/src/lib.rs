#![forbid(unsafe_code)]
//! node_scatter: synthetic geographic point sets by spatial distribution.
//!
//! Modules:
//! - geom: coordinate/polygon value types, planar primitives, ear-clipping triangulation
//! - sampling: distribution strategies (uniform-in-polygon, normal, bounded normal, road proximity)
//! - snap: road-network snap adapter boundary
//! - generate: distribution specs, configuration, and the orchestrating generator
//!
//! All randomness is injected via [rand::RngCore]; there is no process-wide
//! generator, so seeded runs reproduce exactly and concurrent callers do not
//! contend.
pub mod error;
pub mod generate;
pub mod geom;
pub mod sampling;
pub mod snap;

/// Convenient re-exports for common types. Import with `use node_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::generate::{Distribution, GenerateConfig, NodeGenerator};
    pub use crate::geom::{
        planar_distance, point_at_bearing_distance, point_in_polygon, triangle_area, triangulate,
        Coordinate, Polygon, Triangle, EARTH_RADIUS_M,
    };
    pub use crate::sampling::selection::pick_area_weighted;
    pub use crate::sampling::{
        NodeSampling, NormalBoundedSampling, NormalSampling, RoadProximitySampling,
        UniformPolygonSampling,
    };
    pub use crate::snap::RoadSnap;
}
