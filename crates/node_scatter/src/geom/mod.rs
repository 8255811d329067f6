//! Geographic value types and planar geometry primitives.
//!
//! Latitudes and longitudes are decimal degrees. Area and distance helpers
//! treat (lat, lon) as Cartesian coordinates, a flat-earth approximation that
//! degrades near the poles and for regions spanning large fractions of the
//! globe; only [point_at_bearing_distance] works on the sphere.
use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod triangulate;

pub use triangulate::triangulate;

/// Mean Earth radius in meters, used by the direct geodesic formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic location: latitude/longitude in decimal degrees plus meters
/// above ground (0 when unspecified).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
    pub alt_m: f64,
}

impl Coordinate {
    /// Create a coordinate at ground level.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            alt_m: 0.0,
        }
    }

    /// Create a coordinate with an explicit altitude in meters.
    pub fn with_alt(lat: f64, lon: f64, alt_m: f64) -> Self {
        Self { lat, lon, alt_m }
    }

    /// Planar projection used by the Cartesian-approximation helpers:
    /// x = lon, y = lat.
    #[inline]
    pub(crate) fn planar(&self) -> DVec2 {
        DVec2::new(self.lon, self.lat)
    }
}

/// A simple closed ring of at least 3 vertices, no holes. The first and last
/// vertex are implicitly connected; a duplicated closing vertex is dropped on
/// construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon {
    vertices: Vec<Coordinate>,
}

impl Polygon {
    /// Validates and builds a polygon from an ordered ring of vertices.
    ///
    /// Rejects rings with fewer than 3 distinct vertices, non-finite
    /// coordinates, or zero planar area (all vertices collinear, or a ring
    /// like a bowtie whose signed area cancels).
    pub fn new(mut vertices: Vec<Coordinate>) -> Result<Self> {
        if vertices.len() >= 2 {
            let first = vertices[0];
            let last = vertices[vertices.len() - 1];
            if first.lat == last.lat && first.lon == last.lon {
                vertices.pop();
            }
        }

        if vertices.len() < 3 {
            return Err(Error::InvalidConfig(
                "bounding polygon needs at least 3 distinct vertices".into(),
            ));
        }

        if vertices
            .iter()
            .any(|v| !v.lat.is_finite() || !v.lon.is_finite())
        {
            return Err(Error::InvalidConfig(
                "bounding polygon has non-finite vertex coordinates".into(),
            ));
        }

        if signed_ring_area(&vertices).abs() <= f64::EPSILON {
            return Err(Error::InvalidConfig(
                "bounding polygon has zero planar area".into(),
            ));
        }

        Ok(Self { vertices })
    }

    /// The ring vertices, without a duplicated closing vertex.
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Absolute planar (shoelace) area of the ring.
    pub fn ring_area(&self) -> f64 {
        signed_ring_area(&self.vertices).abs()
    }

    /// Whether `point` lies inside the ring; see [point_in_polygon].
    pub fn contains(&self, point: Coordinate) -> bool {
        point_in_polygon(point, self)
    }
}

/// Exactly three coordinates; produced by triangulating a [Polygon]. The
/// planar area is used only for relative weighting between triangles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    pub a: Coordinate,
    pub b: Coordinate,
    pub c: Coordinate,
}

impl Triangle {
    pub fn new(a: Coordinate, b: Coordinate, c: Coordinate) -> Self {
        Self { a, b, c }
    }

    /// Planar area; see [triangle_area].
    pub fn area(&self) -> f64 {
        triangle_area(self.a, self.b, self.c)
    }
}

/// Planar (shoelace) area of triangle a-b-c with (lat, lon) treated as
/// Cartesian. Collinear vertices yield 0.
pub fn triangle_area(a: Coordinate, b: Coordinate, c: Coordinate) -> f64 {
    let ab = b.planar() - a.planar();
    let ac = c.planar() - a.planar();
    ab.perp_dot(ac).abs() * 0.5
}

/// Euclidean distance on the (lat, lon) plane treated as Cartesian, in
/// degree units. Not a geodesic distance; intended only for comparisons
/// against small thresholds such as a snap-to-road tolerance.
pub fn planar_distance(a: Coordinate, b: Coordinate) -> f64 {
    a.planar().distance(b.planar())
}

/// The coordinate reached by travelling `distance_m` meters along a great
/// circle from `origin` at compass bearing `bearing_deg` (0 = north,
/// clockwise). A negative distance travels the reciprocal bearing. Altitude
/// is carried through from the origin.
pub fn point_at_bearing_distance(
    origin: Coordinate,
    bearing_deg: f64,
    distance_m: f64,
) -> Coordinate {
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    Coordinate::with_alt(
        lat2.to_degrees(),
        normalize_lon(lon2.to_degrees()),
        origin.alt_m,
    )
}

/// Ray-casting point-in-polygon test. Points exactly on an edge (vertices
/// included) count as inside, so bounded samplers never reject a boundary
/// point.
pub fn point_in_polygon(point: Coordinate, polygon: &Polygon) -> bool {
    let p = point.planar();
    let verts = polygon.vertices();
    let n = verts.len();

    for i in 0..n {
        let a = verts[i].planar();
        let b = verts[(i + 1) % n].planar();
        if on_segment(p, a, b) {
            return true;
        }
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = verts[i].planar();
        let vj = verts[j].planar();
        if (vi.y > p.y) != (vj.y > p.y) {
            let x_cross = vj.x + (p.y - vj.y) / (vi.y - vj.y) * (vi.x - vj.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn on_segment(p: DVec2, a: DVec2, b: DVec2) -> bool {
    let ab = b - a;
    let ap = p - a;
    if ab.perp_dot(ap).abs() > 1e-12 {
        return false;
    }
    let t = ap.dot(ab);
    t >= 0.0 && t <= ab.length_squared()
}

/// Normalize a longitude into [-180, 180).
fn normalize_lon(lon: f64) -> f64 {
    let mut l = (lon + 180.0) % 360.0;
    if l < 0.0 {
        l += 360.0;
    }
    l - 180.0
}

/// Signed shoelace area of an open ring (positive for counter-clockwise in
/// the x = lon, y = lat plane).
pub(crate) fn signed_ring_area(vertices: &[Coordinate]) -> f64 {
    let n = vertices.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i].planar();
        let b = vertices[(i + 1) % n].planar();
        sum += a.perp_dot(b);
    }
    sum * 0.5
}
