//! Road-proximity uniform sampling.
use rand::RngCore;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geom::{planar_distance, Coordinate, Polygon};
use crate::sampling::{NodeSampling, UniformPolygonSampling};
use crate::snap::RoadSnap;

/// Uniform-in-polygon sampling filtered to points near the road network.
///
/// Each round draws only as many uniform candidates as are still missing,
/// snaps the whole batch in a single adapter call, and keeps candidates
/// whose [planar_distance] to their snapped location is within
/// `dist_to_road` (same planar degree units as the distance itself). Kept
/// points retain their pre-snap coordinates; the snapped location is used
/// only for the distance test.
///
/// Rounds are unbounded by default, matching the reference behavior;
/// `with_max_rounds` turns exhaustion into [Error::SamplingExhausted].
/// Adapter failures propagate unchanged, with no retry.
pub struct RoadProximitySampling<'a> {
    /// The bounding region candidates are drawn from.
    pub boundary: Polygon,
    /// Acceptance threshold on the candidate-to-snap planar distance.
    pub dist_to_road: f64,
    /// Road-network snap provider.
    pub snap: &'a dyn RoadSnap,
    /// Optional cap on snap rounds.
    pub max_rounds: Option<u64>,
}

impl<'a> RoadProximitySampling<'a> {
    pub fn new(boundary: Polygon, dist_to_road: f64, snap: &'a dyn RoadSnap) -> Self {
        Self {
            boundary,
            dist_to_road,
            snap,
            max_rounds: None,
        }
    }

    /// Cap the number of snap rounds (builder-style).
    pub fn with_max_rounds(mut self, max_rounds: u64) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }
}

pub(crate) fn check_dist_to_road(dist_to_road: f64) -> Result<()> {
    if !dist_to_road.is_finite() || dist_to_road < 0.0 {
        return Err(Error::InvalidConfig(format!(
            "dist_to_road must be finite and >= 0, got {dist_to_road}"
        )));
    }
    Ok(())
}

impl NodeSampling for RoadProximitySampling<'_> {
    fn sample(&self, count: usize, rng: &mut dyn RngCore) -> Result<Vec<Coordinate>> {
        check_dist_to_road(self.dist_to_road)?;

        if count == 0 {
            return Ok(Vec::new());
        }

        let uniform = UniformPolygonSampling::new(self.boundary.clone());

        let mut out = Vec::with_capacity(count);
        let mut rounds: u64 = 0;
        while out.len() < count {
            if let Some(cap) = self.max_rounds {
                if rounds >= cap {
                    return Err(Error::SamplingExhausted { attempts: rounds });
                }
            }

            let candidates = uniform.sample(count - out.len(), rng)?;
            let snapped = self.snap.snap_batch(&candidates)?;
            if snapped.len() != candidates.len() {
                return Err(Error::Snap(format!(
                    "snap batch length mismatch: sent {}, received {}",
                    candidates.len(),
                    snapped.len()
                )));
            }

            for (candidate, snap_loc) in candidates.iter().zip(&snapped) {
                if planar_distance(*candidate, *snap_loc) <= self.dist_to_road {
                    out.push(*candidate);
                }
            }

            rounds += 1;
            debug!(
                rounds,
                accepted = out.len(),
                requested = count,
                "road proximity round complete"
            );
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Coordinate::new(42.0, -78.0),
            Coordinate::new(42.0, -77.0),
            Coordinate::new(43.0, -77.0),
            Coordinate::new(43.0, -78.0),
        ])
        .expect("bounding square is valid")
    }

    /// Fake road network: north-south roads every 0.2 degrees of longitude.
    struct GridRoads;

    impl RoadSnap for GridRoads {
        fn snap_batch(&self, locs: &[Coordinate]) -> Result<Vec<Coordinate>> {
            Ok(locs
                .iter()
                .map(|p| Coordinate::new(p.lat, (p.lon / 0.2).round() * 0.2))
                .collect())
        }
    }

    struct FailingRoads;

    impl RoadSnap for FailingRoads {
        fn snap_batch(&self, _locs: &[Coordinate]) -> Result<Vec<Coordinate>> {
            Err(Error::Snap("provider unreachable".into()))
        }
    }

    struct TruncatingRoads;

    impl RoadSnap for TruncatingRoads {
        fn snap_batch(&self, locs: &[Coordinate]) -> Result<Vec<Coordinate>> {
            Ok(locs.iter().skip(1).copied().collect())
        }
    }

    #[test]
    fn accepted_points_are_near_a_road_and_inside_the_boundary() {
        let boundary = square();
        let snap = GridRoads;
        let s = RoadProximitySampling::new(boundary.clone(), 0.02, &snap);

        let mut rng = StdRng::seed_from_u64(17);
        let pts = s.sample(60, &mut rng).unwrap();
        assert_eq!(pts.len(), 60);

        let requeried = snap.snap_batch(&pts).unwrap();
        for (p, r) in pts.iter().zip(&requeried) {
            assert!(planar_distance(*p, *r) <= 0.02, "{p:?} too far from road");
            assert!(boundary.contains(*p), "{p:?} escaped the boundary");
            // Pre-snap coordinates are retained, not the snapped ones.
            assert_ne!(p, r);
        }
    }

    #[test]
    fn impossible_threshold_exhausts_the_round_cap() {
        let snap = GridRoads;
        let s = RoadProximitySampling::new(square(), 0.0, &snap).with_max_rounds(4);

        let mut rng = StdRng::seed_from_u64(2);
        let err = s.sample(5, &mut rng).unwrap_err();
        assert!(matches!(err, Error::SamplingExhausted { attempts: 4 }));
    }

    #[test]
    fn provider_failure_propagates_unchanged() {
        let snap = FailingRoads;
        let s = RoadProximitySampling::new(square(), 0.1, &snap);

        let mut rng = StdRng::seed_from_u64(8);
        let err = s.sample(3, &mut rng).unwrap_err();
        assert!(matches!(err, Error::Snap(ref msg) if msg == "provider unreachable"));
    }

    #[test]
    fn short_snap_batches_are_rejected() {
        let snap = TruncatingRoads;
        let s = RoadProximitySampling::new(square(), 10.0, &snap);

        let mut rng = StdRng::seed_from_u64(4);
        let err = s.sample(3, &mut rng).unwrap_err();
        assert!(matches!(err, Error::Snap(_)));
    }

    #[test]
    fn negative_threshold_is_a_configuration_error() {
        let snap = GridRoads;
        let s = RoadProximitySampling::new(square(), -1.0, &snap);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            s.sample(1, &mut rng).unwrap_err(),
            Error::InvalidConfig(_)
        ));
    }
}
