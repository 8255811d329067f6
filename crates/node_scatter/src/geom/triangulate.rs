//! Ear-clipping triangulation of simple polygons.
use glam::DVec2;

use crate::error::{Error, Result};
use crate::geom::{signed_ring_area, Polygon, Triangle};

/// Decompose `polygon` into non-overlapping triangles whose union covers the
/// ring: repeatedly clip a convex vertex whose ear triangle contains no other
/// ring vertex until three vertices remain.
///
/// A full pass that finds no clippable ear aborts with
/// [Error::Triangulation] instead of spinning; that only happens for input
/// the [Polygon] constructor cannot catch, such as a self-intersecting ring.
pub fn triangulate(polygon: &Polygon) -> Result<Vec<Triangle>> {
    let verts = polygon.vertices();
    let ccw = signed_ring_area(verts) > 0.0;

    let mut ring: Vec<usize> = (0..verts.len()).collect();
    let mut triangles = Vec::with_capacity(verts.len() - 2);

    while ring.len() > 3 {
        let mut clipped = false;
        for i in 0..ring.len() {
            let prev = ring[(i + ring.len() - 1) % ring.len()];
            let curr = ring[i];
            let next = ring[(i + 1) % ring.len()];

            if is_ear(polygon, &ring, prev, curr, next, ccw) {
                triangles.push(Triangle::new(verts[prev], verts[curr], verts[next]));
                ring.remove(i);
                clipped = true;
                break;
            }
        }

        if !clipped {
            return Err(Error::Triangulation(
                "no clippable ear found; polygon is likely self-intersecting".into(),
            ));
        }
    }

    triangles.push(Triangle::new(
        verts[ring[0]],
        verts[ring[1]],
        verts[ring[2]],
    ));
    Ok(triangles)
}

fn is_ear(
    polygon: &Polygon,
    ring: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    ccw: bool,
) -> bool {
    let verts = polygon.vertices();
    let a = verts[prev].planar();
    let b = verts[curr].planar();
    let c = verts[next].planar();

    let cross = (b - a).perp_dot(c - a);
    let convex = if ccw { cross > 0.0 } else { cross < 0.0 };
    if !convex {
        return false;
    }

    ring.iter().all(|&idx| {
        idx == prev
            || idx == curr
            || idx == next
            || !strictly_inside_triangle(verts[idx].planar(), a, b, c)
    })
}

fn strictly_inside_triangle(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    (d1 > 0.0 && d2 > 0.0 && d3 > 0.0) || (d1 < 0.0 && d2 < 0.0 && d3 < 0.0)
}
