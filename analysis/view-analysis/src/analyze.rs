//! Bundle casting and aggregation.

use geom_types::Point3;
use graph_core::Graph;
use rayon::prelude::*;
use trace_bvh::Scene;
use tracing::{debug, info};

use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::sample::fibonacci_directions;

/// Distance recorded for rays that hit nothing within range.
pub const MISS_DISTANCE: f32 = -1.0;

/// How to reduce an origin's hit distances to one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewAggregation {
    /// Mean hit distance.
    Average,
    /// Sum of hit distances.
    Sum,
    /// Number of rays that hit.
    Count,
    /// Mean of reciprocal hit distances.
    AverageInverse,
    /// Longest hit distance.
    Max,
    /// Shortest hit distance.
    Min,
}

/// Per-origin scores plus the aggregation that produced them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreArray {
    scores: Vec<f32>,
    aggregation: ViewAggregation,
}

impl ScoreArray {
    /// One score per origin, in input order.
    #[must_use]
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// The aggregation that produced the scores.
    #[must_use]
    pub const fn aggregation(&self) -> ViewAggregation {
        self.aggregation
    }

    /// Consume the array, returning the raw scores.
    #[must_use]
    pub fn into_scores(self) -> Vec<f32> {
        self.scores
    }
}

/// One ray's outcome in a per-ray scan.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaySample {
    /// Whether the ray hit within range.
    pub hit: bool,
    /// Hit distance, or [`MISS_DISTANCE`] on a miss.
    pub distance: f32,
    /// Id of the hit mesh; 0 on a miss.
    pub mesh: u32,
}

/// The full per-ray result grid of a scan, row-major by origin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewGrid {
    origin_count: usize,
    rays_per_origin: usize,
    samples: Vec<RaySample>,
}

impl ViewGrid {
    /// Number of origins scanned.
    #[must_use]
    pub const fn origin_count(&self) -> usize {
        self.origin_count
    }

    /// Effective rays per origin after the field-of-view clamp.
    #[must_use]
    pub const fn rays_per_origin(&self) -> usize {
        self.rays_per_origin
    }

    /// All samples, row-major by origin.
    #[must_use]
    pub fn samples(&self) -> &[RaySample] {
        &self.samples
    }

    /// The samples of one origin.
    ///
    /// Returns an empty slice for an out-of-range origin.
    #[must_use]
    pub fn row(&self, origin: usize) -> &[RaySample] {
        if origin >= self.origin_count {
            return &[];
        }
        let start = origin * self.rays_per_origin;
        &self.samples[start..start + self.rays_per_origin]
    }
}

/// The positions of a graph's nodes, for use as scan origins.
#[must_use]
pub fn node_origins(graph: &Graph) -> Vec<Point3<f32>> {
    graph.nodes().iter().map(|n| n.position).collect()
}

/// Cast a direction bundle from every origin and reduce each origin's
/// hits to one score.
///
/// Origins are lifted by the configured height before casting. Only rays
/// that hit within the max distance contribute; an origin with no hits
/// scores 0.
///
/// # Errors
///
/// [`ViewError::InvalidConfig`] for out-of-range parameters and
/// [`ViewError::EmptyBundle`] when the field of view discards every
/// direction.
pub fn score_views(
    scene: &Scene,
    origins: &[Point3<f32>],
    aggregation: ViewAggregation,
    config: &ViewConfig,
) -> Result<ScoreArray, ViewError> {
    let directions = bundle(config)?;

    info!(
        origins = origins.len(),
        rays = directions.len(),
        ?aggregation,
        "scoring views"
    );

    let scores = origins
        .par_iter()
        .map(|&origin| {
            let eye = Point3::new(origin.x, origin.y, origin.z + config.height());
            let mut hits = 0u32;
            let mut sum = 0.0f32;
            let mut inverse_sum = 0.0f32;
            let mut shortest = f32::INFINITY;
            let mut longest = 0.0f32;

            for direction in &directions {
                let Some(hit) = scene.intersect(eye, *direction) else {
                    continue;
                };
                if hit.distance > config.max_distance() {
                    continue;
                }
                hits += 1;
                sum += hit.distance;
                inverse_sum += 1.0 / hit.distance;
                shortest = shortest.min(hit.distance);
                longest = longest.max(hit.distance);
            }

            if hits == 0 {
                return 0.0;
            }
            #[allow(clippy::cast_precision_loss)]
            // Precision: hit counts are far below f32's integer range
            let count = hits as f32;
            match aggregation {
                ViewAggregation::Average => sum / count,
                ViewAggregation::Sum => sum,
                ViewAggregation::Count => count,
                ViewAggregation::AverageInverse => inverse_sum / count,
                ViewAggregation::Max => longest,
                ViewAggregation::Min => shortest,
            }
        })
        .collect();

    Ok(ScoreArray {
        scores,
        aggregation,
    })
}

/// Cast a direction bundle from every origin and keep every ray's
/// outcome.
///
/// The grid is row-major by origin; within a row, samples follow the
/// bundle's deterministic direction order.
///
/// # Errors
///
/// See [`score_views`].
pub fn scan_views(
    scene: &Scene,
    origins: &[Point3<f32>],
    config: &ViewConfig,
) -> Result<ViewGrid, ViewError> {
    let directions = bundle(config)?;
    let rays_per_origin = directions.len();

    debug!(
        origins = origins.len(),
        rays = rays_per_origin,
        "scanning views"
    );

    let samples: Vec<RaySample> = origins
        .par_iter()
        .flat_map_iter(|&origin| {
            let eye = Point3::new(origin.x, origin.y, origin.z + config.height());
            directions.iter().map(move |direction| {
                match scene.intersect(eye, *direction) {
                    Some(hit) if hit.distance <= config.max_distance() => RaySample {
                        hit: true,
                        distance: hit.distance,
                        mesh: hit.mesh,
                    },
                    _ => RaySample {
                        hit: false,
                        distance: MISS_DISTANCE,
                        mesh: 0,
                    },
                }
            })
        })
        .collect();

    Ok(ViewGrid {
        origin_count: origins.len(),
        rays_per_origin,
        samples,
    })
}

fn bundle(config: &ViewConfig) -> Result<Vec<geom_types::Vector3<f32>>, ViewError> {
    config.validate()?;
    let directions = fibonacci_directions(config.ray_count(), config.up_fov(), config.down_fov());
    if directions.is_empty() {
        return Err(ViewError::EmptyBundle);
    }
    Ok(directions)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_precision_loss, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geom_types::{plane, unit_cube, IndexedMesh};

    fn full_sphere(rays: usize) -> ViewConfig {
        ViewConfig::default()
            .with_ray_count(rays)
            .with_height(0.0)
            .with_fov(90.0, 90.0)
    }

    /// Latitude/longitude sphere centered at the origin.
    fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        for stack in 0..=stacks {
            let theta = std::f32::consts::PI * stack as f32 / stacks as f32;
            for slice in 0..slices {
                let phi = 2.0 * std::f32::consts::PI * slice as f32 / slices as f32;
                mesh.vertices.push(Point3::new(
                    radius * theta.sin() * phi.cos(),
                    radius * theta.sin() * phi.sin(),
                    radius * theta.cos(),
                ));
            }
        }
        for stack in 0..stacks {
            for slice in 0..slices {
                let next_slice = (slice + 1) % slices;
                let a = stack * slices + slice;
                let b = stack * slices + next_slice;
                let c = (stack + 1) * slices + next_slice;
                let d = (stack + 1) * slices + slice;
                mesh.faces.push([a, b, c]);
                mesh.faces.push([a, c, d]);
            }
        }
        mesh
    }

    #[test]
    fn cube_interior_all_rays_hit() {
        let scene = Scene::from_mesh(&unit_cube()).unwrap();
        let origins = [Point3::new(0.5, 0.5, 0.5)];
        let config = full_sphere(2000);

        let counts = score_views(&scene, &origins, ViewAggregation::Count, &config).unwrap();
        assert_eq!(counts.scores()[0], 2000.0);

        // Distances from the center range from 0.5 (face) to ~0.866 (corner)
        let min = score_views(&scene, &origins, ViewAggregation::Min, &config).unwrap();
        assert_relative_eq!(min.scores()[0], 0.5, epsilon = 1e-3);
        let max = score_views(&scene, &origins, ViewAggregation::Max, &config).unwrap();
        assert!(max.scores()[0] <= 0.867);

        let average = score_views(&scene, &origins, ViewAggregation::Average, &config).unwrap();
        assert!(
            average.scores()[0] > 0.5 && average.scores()[0] < 0.867,
            "average {}",
            average.scores()[0]
        );
    }

    #[test]
    fn sphere_interior_average_matches_radius() {
        let scene = Scene::from_mesh(&uv_sphere(2.0, 48, 96)).unwrap();
        let origins = [Point3::origin()];
        let config = full_sphere(10_000);

        let average = score_views(&scene, &origins, ViewAggregation::Average, &config).unwrap();
        assert_relative_eq!(average.scores()[0], 2.0, epsilon = 0.02);

        let inverse = score_views(&scene, &origins, ViewAggregation::AverageInverse, &config)
            .unwrap();
        assert_relative_eq!(inverse.scores()[0], 0.5, epsilon = 0.01);

        let sum = score_views(&scene, &origins, ViewAggregation::Sum, &config).unwrap();
        assert_relative_eq!(sum.scores()[0], 2.0 * 10_000.0, epsilon = 200.0);
    }

    #[test]
    fn open_sky_scores_zero_upward() {
        // Above a bare ground plane, only downward rays hit
        let scene = Scene::from_mesh(&plane(-50.0, -50.0, 50.0, 50.0, 0.0)).unwrap();
        let origins = [Point3::new(0.0, 0.0, 1.0)];
        let config = full_sphere(1000);

        let counts = score_views(&scene, &origins, ViewAggregation::Count, &config).unwrap();
        assert!(counts.scores()[0] > 0.0);
        assert!(counts.scores()[0] < 1000.0);
    }

    #[test]
    fn no_hits_scores_zero() {
        let scene = Scene::from_mesh(&plane(-1.0, -1.0, 1.0, 1.0, 0.0)).unwrap();
        // Far from the plane, looking only upward
        let origins = [Point3::new(100.0, 100.0, 10.0)];
        let config = ViewConfig::default()
            .with_ray_count(100)
            .with_height(0.0)
            .with_fov(90.0, 90.0);

        for aggregation in [
            ViewAggregation::Average,
            ViewAggregation::Sum,
            ViewAggregation::Count,
            ViewAggregation::AverageInverse,
            ViewAggregation::Max,
            ViewAggregation::Min,
        ] {
            let scores = score_views(&scene, &origins, aggregation, &config).unwrap();
            assert_eq!(scores.scores()[0], 0.0);
        }
    }

    #[test]
    fn max_distance_turns_hits_into_misses() {
        let scene = Scene::from_mesh(&plane(-50.0, -50.0, 50.0, 50.0, 0.0)).unwrap();
        let origins = [Point3::new(0.0, 0.0, 5.0)];
        let near = full_sphere(1000).with_max_distance(2.0);

        let counts = score_views(&scene, &origins, ViewAggregation::Count, &near).unwrap();
        assert_eq!(counts.scores()[0], 0.0); // ground is 5 away, limit is 2

        let far = full_sphere(1000).with_max_distance(100.0);
        let counts = score_views(&scene, &origins, ViewAggregation::Count, &far).unwrap();
        assert!(counts.scores()[0] > 0.0);
    }

    #[test]
    fn height_offset_lifts_origin() {
        let scene = Scene::from_mesh(&plane(-50.0, -50.0, 50.0, 50.0, 0.0)).unwrap();
        let origins = [Point3::new(0.0, 0.0, 0.0)];
        let config = ViewConfig::default()
            .with_ray_count(64)
            .with_height(1.7)
            .with_fov(90.0, 90.0);

        // The straight-down ray measures the eye height
        let min = score_views(&scene, &origins, ViewAggregation::Min, &config).unwrap();
        assert!(min.scores()[0] >= 1.69);
    }

    #[test]
    fn scan_grid_shape_and_order() {
        let low = plane(-50.0, -50.0, 50.0, 50.0, 0.0);
        let scene = Scene::from_mesh(&low).unwrap();
        let origins = [Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 0.0, 3.0)];
        let config = full_sphere(500);

        let grid = scan_views(&scene, &origins, &config).unwrap();
        assert_eq!(grid.origin_count(), 2);
        assert_eq!(grid.rays_per_origin(), 500);
        assert_eq!(grid.samples().len(), 1000);

        // Both rows mix hits (downward) and misses (skyward)
        for origin in 0..2 {
            let row = grid.row(origin);
            assert!(row.iter().any(|s| s.hit));
            assert!(row.iter().any(|s| !s.hit));
            for sample in row {
                if sample.hit {
                    assert!(sample.distance > 0.0);
                } else {
                    assert_eq!(sample.distance, MISS_DISTANCE);
                }
            }
        }

        // The same bundle index points the same way for both origins, so
        // the higher origin's down-facing hits are farther
        let down_index = (0..500)
            .find(|&i| grid.row(0)[i].hit && grid.row(1)[i].hit)
            .unwrap();
        assert!(grid.row(1)[down_index].distance > grid.row(0)[down_index].distance);
    }

    #[test]
    fn scan_reports_mesh_ids() {
        let low = plane(-50.0, -50.0, 50.0, 50.0, 0.0);
        let high = plane(-50.0, -50.0, 50.0, 50.0, 10.0);
        let scene = Scene::build(&[low, high]).unwrap();
        let origins = [Point3::new(0.0, 0.0, 5.0)];

        let grid = scan_views(&scene, &origins, &full_sphere(200)).unwrap();
        let meshes: Vec<u32> = grid
            .row(0)
            .iter()
            .filter(|s| s.hit)
            .map(|s| s.mesh)
            .collect();
        assert!(meshes.contains(&0));
        assert!(meshes.contains(&1));
    }

    #[test]
    fn empty_bundle_rejected() {
        let scene = Scene::from_mesh(&unit_cube()).unwrap();
        // Two rays land at z = +-0.5, both outside a 5-degree band
        let config = ViewConfig::default().with_ray_count(2).with_fov(5.0, 5.0);
        let result = score_views(&scene, &[Point3::origin()], ViewAggregation::Count, &config);
        assert!(matches!(result, Err(ViewError::EmptyBundle)));
    }

    #[test]
    fn node_origin_extraction() {
        let mut graph = Graph::new();
        graph
            .add_edge(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 1.0)
            .unwrap();
        graph.compress();

        let origins = node_origins(&graph);
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], Point3::new(1.0, 0.0, 0.0));
    }
}
