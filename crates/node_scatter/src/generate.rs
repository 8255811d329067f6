//! Distribution specs, configuration, and the orchestrating generator.
use rand::RngCore;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geom::{Coordinate, Polygon};
use crate::sampling::normal::check_std_dev;
use crate::sampling::road_proximity::check_dist_to_road;
use crate::sampling::{
    NodeSampling, NormalBoundedSampling, NormalSampling, RoadProximitySampling,
    UniformPolygonSampling,
};
use crate::snap::RoadSnap;

/// Spatial distribution for a generated node set. Each variant carries the
/// parameters its sampler requires, so a missing parameter is unrepresentable;
/// [Distribution::validate] covers the numeric ranges.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Distribution {
    /// Area-uniform within a bounding polygon.
    UniformPolygon { boundary: Polygon },
    /// Normal scatter around a center, unconstrained.
    Normal { center: Coordinate, std_dev_m: f64 },
    /// Normal scatter truncated to a bounding polygon.
    NormalBounded {
        center: Coordinate,
        std_dev_m: f64,
        boundary: Polygon,
    },
    /// Area-uniform within a polygon, kept only near the road network.
    RoadProximity {
        boundary: Polygon,
        /// Acceptance threshold in planar degree units; see
        /// [crate::geom::planar_distance].
        dist_to_road: f64,
    },
}

impl Distribution {
    /// Validates numeric parameters. Runs before any random draw, so invalid
    /// input never consumes RNG state or performs partial work.
    pub fn validate(&self) -> Result<()> {
        match self {
            Distribution::UniformPolygon { .. } => Ok(()),
            Distribution::Normal { center, std_dev_m } => {
                check_center(*center)?;
                check_std_dev(*std_dev_m)
            }
            Distribution::NormalBounded {
                center, std_dev_m, ..
            } => {
                check_center(*center)?;
                check_std_dev(*std_dev_m)
            }
            Distribution::RoadProximity { dist_to_road, .. } => check_dist_to_road(*dist_to_road),
        }
    }
}

fn check_center(center: Coordinate) -> Result<()> {
    if !(-90.0..=90.0).contains(&center.lat) || !(-180.0..=180.0).contains(&center.lon) {
        return Err(Error::InvalidConfig(format!(
            "center [{}, {}] is outside valid lat/lon ranges",
            center.lat, center.lon
        )));
    }
    Ok(())
}

/// Configuration for generating a node batch.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenerateConfig {
    /// Number of nodes to generate.
    pub count: usize,
    /// Per-point cap on bounded-normal rejection draws; unbounded when
    /// `None` (the reference behavior).
    pub max_attempts: Option<u64>,
    /// Cap on road-proximity snap rounds; unbounded when `None`.
    pub max_rounds: Option<u64>,
    /// Snap the finished batch onto the road network; requires a provider.
    pub snap_to_road: bool,
}

impl GenerateConfig {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            max_attempts: None,
            max_rounds: None,
            snap_to_road: false,
        }
    }

    /// Cap bounded-normal rejection draws per point.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Cap road-proximity snap rounds.
    pub fn with_max_rounds(mut self, max_rounds: u64) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Snap the finished batch onto the road network.
    pub fn with_snap_to_road(mut self, snap_to_road: bool) -> Self {
        self.snap_to_road = snap_to_road;
        self
    }
}

/// Dispatches a [Distribution] to its sampler and returns the coordinate
/// batch, optionally snapping the finished batch to the road network.
pub struct NodeGenerator<'a> {
    /// Configuration applied to every run.
    pub config: GenerateConfig,
    snap: Option<&'a dyn RoadSnap>,
}

impl<'a> NodeGenerator<'a> {
    pub fn new(config: GenerateConfig) -> Self {
        Self { config, snap: None }
    }

    /// Attach a road-network snap provider (builder-style). Required for
    /// [Distribution::RoadProximity] and for `snap_to_road`.
    pub fn with_snap(mut self, snap: &'a dyn RoadSnap) -> Self {
        self.snap = Some(snap);
        self
    }

    /// Generates exactly `config.count` coordinates from `distribution`.
    ///
    /// Validation runs before any random draw; on error no partial batch is
    /// returned.
    pub fn run(
        &self,
        distribution: &Distribution,
        rng: &mut impl RngCore,
    ) -> Result<Vec<Coordinate>> {
        distribution.validate()?;
        self.require_snap_if_needed(distribution)?;

        let count = self.config.count;
        let mut locs = match distribution {
            Distribution::UniformPolygon { boundary } => {
                UniformPolygonSampling::new(boundary.clone()).sample(count, rng)?
            }
            Distribution::Normal { center, std_dev_m } => {
                NormalSampling::new(*center, *std_dev_m).sample(count, rng)?
            }
            Distribution::NormalBounded {
                center,
                std_dev_m,
                boundary,
            } => {
                let mut sampler =
                    NormalBoundedSampling::new(*center, *std_dev_m, boundary.clone());
                sampler.max_attempts = self.config.max_attempts;
                sampler.sample(count, rng)?
            }
            Distribution::RoadProximity {
                boundary,
                dist_to_road,
            } => {
                let snap = self.snap_provider()?;
                let mut sampler =
                    RoadProximitySampling::new(boundary.clone(), *dist_to_road, snap);
                sampler.max_rounds = self.config.max_rounds;
                sampler.sample(count, rng)?
            }
        };

        if self.config.snap_to_road {
            let snap = self.snap_provider()?;
            let snapped = snap.snap_batch(&locs)?;
            if snapped.len() != locs.len() {
                return Err(Error::Snap(format!(
                    "snap batch length mismatch: sent {}, received {}",
                    locs.len(),
                    snapped.len()
                )));
            }
            locs = snapped;
        }

        info!(count = locs.len(), "generated node batch");
        Ok(locs)
    }

    fn require_snap_if_needed(&self, distribution: &Distribution) -> Result<()> {
        let needs_snap =
            matches!(distribution, Distribution::RoadProximity { .. }) || self.config.snap_to_road;
        if needs_snap && self.snap.is_none() {
            return Err(Error::InvalidConfig(
                "a road snap provider is required for road-based generation".into(),
            ));
        }
        Ok(())
    }

    fn snap_provider(&self) -> Result<&'a dyn RoadSnap> {
        self.snap.ok_or_else(|| {
            Error::InvalidConfig("a road snap provider is required for road-based generation".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::test_support::CountingRng;

    fn square() -> Polygon {
        Polygon::new(vec![
            Coordinate::new(42.0, -78.0),
            Coordinate::new(42.0, -77.0),
            Coordinate::new(43.0, -77.0),
            Coordinate::new(43.0, -78.0),
        ])
        .expect("bounding square is valid")
    }

    struct GridRoads;

    impl RoadSnap for GridRoads {
        fn snap_batch(&self, locs: &[Coordinate]) -> Result<Vec<Coordinate>> {
            Ok(locs
                .iter()
                .map(|p| Coordinate::new(p.lat, (p.lon / 0.2).round() * 0.2))
                .collect())
        }
    }

    #[test]
    fn uniform_dispatch_returns_requested_count() {
        let generator = NodeGenerator::new(GenerateConfig::new(100));
        let dist = Distribution::UniformPolygon { boundary: square() };

        let mut rng = StdRng::seed_from_u64(1);
        let locs = generator.run(&dist, &mut rng).unwrap();
        assert_eq!(locs.len(), 100);
        for p in &locs {
            assert!(square().contains(*p));
        }
    }

    #[test]
    fn normal_bounded_dispatch_honors_the_boundary() {
        let generator = NodeGenerator::new(GenerateConfig::new(50));
        let dist = Distribution::NormalBounded {
            center: Coordinate::new(42.5, -77.5),
            std_dev_m: 20_000.0,
            boundary: square(),
        };

        let mut rng = StdRng::seed_from_u64(6);
        let locs = generator.run(&dist, &mut rng).unwrap();
        assert_eq!(locs.len(), 50);
        for p in &locs {
            assert!(square().contains(*p));
        }
    }

    #[test]
    fn invalid_parameters_fail_before_any_random_draw() {
        let generator = NodeGenerator::new(GenerateConfig::new(10));
        let dist = Distribution::Normal {
            center: Coordinate::new(42.0, -78.0),
            std_dev_m: -100.0,
        };

        let mut rng = CountingRng { calls: 0 };
        let err = generator.run(&dist, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(rng.calls, 0);
    }

    #[test]
    fn out_of_range_center_is_rejected() {
        let generator = NodeGenerator::new(GenerateConfig::new(10));
        let dist = Distribution::Normal {
            center: Coordinate::new(91.0, 0.0),
            std_dev_m: 100.0,
        };

        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generator.run(&dist, &mut rng).unwrap_err(),
            Error::InvalidConfig(_)
        ));
    }

    #[test]
    fn road_proximity_without_provider_is_rejected_before_sampling() {
        let generator = NodeGenerator::new(GenerateConfig::new(10));
        let dist = Distribution::RoadProximity {
            boundary: square(),
            dist_to_road: 0.05,
        };

        let mut rng = CountingRng { calls: 0 };
        let err = generator.run(&dist, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(rng.calls, 0);
    }

    #[test]
    fn road_proximity_dispatch_uses_the_provider() {
        let snap = GridRoads;
        let generator = NodeGenerator::new(GenerateConfig::new(20)).with_snap(&snap);
        let dist = Distribution::RoadProximity {
            boundary: square(),
            dist_to_road: 0.05,
        };

        let mut rng = StdRng::seed_from_u64(13);
        let locs = generator.run(&dist, &mut rng).unwrap();
        assert_eq!(locs.len(), 20);

        let requeried = snap.snap_batch(&locs).unwrap();
        for (p, r) in locs.iter().zip(&requeried) {
            assert!(crate::geom::planar_distance(*p, *r) <= 0.05);
        }
    }

    #[test]
    fn snap_to_road_replaces_coordinates_with_snapped_ones() {
        let snap = GridRoads;
        let generator = NodeGenerator::new(GenerateConfig::new(30).with_snap_to_road(true))
            .with_snap(&snap);
        let dist = Distribution::UniformPolygon { boundary: square() };

        let mut rng = StdRng::seed_from_u64(3);
        let locs = generator.run(&dist, &mut rng).unwrap();
        assert_eq!(locs.len(), 30);
        for p in &locs {
            let nearest_road = (p.lon / 0.2).round() * 0.2;
            assert!((p.lon - nearest_road).abs() < 1e-9, "{p:?} is not on a road");
        }
    }

    #[test]
    fn config_caps_reach_the_samplers() {
        let generator = NodeGenerator::new(GenerateConfig::new(5).with_max_attempts(10));
        let dist = Distribution::NormalBounded {
            center: Coordinate::new(-42.0, 100.0),
            std_dev_m: 1.0,
            boundary: square(),
        };

        let mut rng = StdRng::seed_from_u64(4);
        assert!(matches!(
            generator.run(&dist, &mut rng).unwrap_err(),
            Error::SamplingExhausted { .. }
        ));
    }
}
