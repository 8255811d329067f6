//! Uniform sampling within a polygonal region.
use rand::RngCore;

use crate::error::Result;
use crate::geom::{triangulate, Coordinate, Polygon, Triangle};
use crate::sampling::selection::pick_area_weighted;
use crate::sampling::{rand01, NodeSampling};

/// Area-uniform i.i.d. sampling inside a bounding polygon.
///
/// The boundary is triangulated once per `sample` call; each point then
/// picks a triangle with probability proportional to its planar area and is
/// placed by the sqrt-barycentric transform, which keeps the density uniform
/// over the whole region.
#[derive(Debug, Clone)]
pub struct UniformPolygonSampling {
    /// The bounding region; points are generated within this ring.
    pub boundary: Polygon,
}

impl UniformPolygonSampling {
    pub fn new(boundary: Polygon) -> Self {
        Self { boundary }
    }
}

impl NodeSampling for UniformPolygonSampling {
    fn sample(&self, count: usize, rng: &mut dyn RngCore) -> Result<Vec<Coordinate>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let triangles = triangulate(&self.boundary)?;
        let areas: Vec<f64> = triangles.iter().map(Triangle::area).collect();

        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let index = pick_area_weighted(&areas, rng)?;
            out.push(uniform_in_triangle(&triangles[index], rng));
        }
        Ok(out)
    }
}

/// Uniform point in a triangle: P = (1-√r1)·A + √r1·(1-r2)·B + √r1·r2·C,
/// applied componentwise to lat and lon (Osada et al.).
pub(crate) fn uniform_in_triangle(triangle: &Triangle, rng: &mut dyn RngCore) -> Coordinate {
    let r1 = rand01(rng);
    let r2 = rand01(rng);
    let s1 = r1.sqrt();

    let lat = (1.0 - s1) * triangle.a.lat
        + s1 * (1.0 - r2) * triangle.b.lat
        + s1 * r2 * triangle.c.lat;
    let lon = (1.0 - s1) * triangle.a.lon
        + s1 * (1.0 - r2) * triangle.b.lon
        + s1 * r2 * triangle.c.lon;

    Coordinate::new(lat, lon)
}
