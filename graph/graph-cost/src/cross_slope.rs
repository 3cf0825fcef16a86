//! Cross-slope cost layer.

use geom_types::Point3;
use graph_core::{Graph, DEFAULT_LAYER};
use rayon::prelude::*;
use trace_bvh::Scene;
use tracing::debug;

use crate::error::CostError;

/// Name of the cross-slope cost layer.
pub const CROSS_SLOPE_LAYER: &str = "cross_slope";

/// Configuration for cross-slope probing.
///
/// # Example
///
/// ```
/// use graph_cost::CrossSlopeConfig;
///
/// let config = CrossSlopeConfig::default().with_probe_height(2.0);
/// assert!((config.probe_height() - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CrossSlopeConfig {
    /// Height above the edge midpoint from which probe rays are dropped.
    probe_height: f32,
    /// Lower bound on the lateral probe span.
    min_span: f32,
}

impl Default for CrossSlopeConfig {
    fn default() -> Self {
        Self {
            probe_height: 1.0,
            min_span: 0.05,
        }
    }
}

impl CrossSlopeConfig {
    /// Set the probe drop height above the edge midpoint.
    #[must_use]
    pub const fn with_probe_height(mut self, probe_height: f32) -> Self {
        self.probe_height = probe_height;
        self
    }

    /// Set the minimum lateral probe span.
    #[must_use]
    pub const fn with_min_span(mut self, min_span: f32) -> Self {
        self.min_span = min_span;
        self
    }

    /// The probe drop height.
    #[must_use]
    pub const fn probe_height(&self) -> f32 {
        self.probe_height
    }

    /// The minimum lateral probe span.
    #[must_use]
    pub const fn min_span(&self) -> f32 {
        self.min_span
    }
}

/// Attach the `"cross_slope"` layer: terrain gradient across each edge.
///
/// For every default-layer edge, two rays are dropped onto the terrain
/// beside the edge midpoint, perpendicular to the walking direction at
/// half the horizontal edge length (bounded below by the configured
/// minimum span). The layer weight is the absolute gradient between the
/// two ground samples. Edges with no horizontal run, or whose probes
/// find no ground, are omitted from the layer.
///
/// # Errors
///
/// [`CostError::Graph`] when the graph is uncompressed.
///
/// # Example
///
/// ```
/// use geom_types::{plane, Point3};
/// use graph_core::Graph;
/// use graph_cost::{attach_cross_slope, CrossSlopeConfig, CROSS_SLOPE_LAYER};
/// use trace_bvh::Scene;
///
/// let scene = Scene::from_mesh(&plane(-5.0, -5.0, 5.0, 5.0, 0.0)).unwrap();
/// let mut graph = Graph::new();
/// graph.add_edge(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 1.0).unwrap();
/// graph.compress();
///
/// attach_cross_slope(&mut graph, &scene, &CrossSlopeConfig::default()).unwrap();
/// // Flat ground has zero cross slope
/// let layer = graph.csr(CROSS_SLOPE_LAYER).unwrap();
/// assert!(layer.get(0, 1).unwrap().abs() < 1e-4);
/// ```
pub fn attach_cross_slope(
    graph: &mut Graph,
    scene: &Scene,
    config: &CrossSlopeConfig,
) -> Result<(), CostError> {
    let edges = graph.csr(DEFAULT_LAYER)?.to_triplets();
    let nodes = graph.nodes();

    let triplets: Vec<(u32, u32, f32)> = edges
        .par_iter()
        .filter_map(|&(parent, child, _)| {
            let a = nodes[parent as usize].position;
            let b = nodes[child as usize].position;
            let gradient = probe_cross_gradient(scene, &a, &b, config)?;
            Some((parent, child, gradient))
        })
        .collect();

    debug!(
        edges = triplets.len(),
        skipped = edges.len() - triplets.len(),
        "derived cross-slope layer"
    );
    graph.attach_cost_layer(CROSS_SLOPE_LAYER, &triplets)?;
    Ok(())
}

/// Terrain gradient across the walking direction between two positions.
fn probe_cross_gradient(
    scene: &Scene,
    a: &Point3<f32>,
    b: &Point3<f32>,
    config: &CrossSlopeConfig,
) -> Option<f32> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let horizontal = dx.hypot(dy);
    if horizontal <= f32::EPSILON {
        return None;
    }

    // Unit perpendicular to the walking direction, in the plan plane
    let perp_x = -dy / horizontal;
    let perp_y = dx / horizontal;
    let span = (horizontal * 0.5).max(config.min_span());

    let mid = Point3::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5, (a.z + b.z) * 0.5);
    let drop_z = mid.z + config.probe_height();

    let left = scene.drop_to_ground(Point3::new(
        mid.x + perp_x * span,
        mid.y + perp_y * span,
        drop_z,
    ))?;
    let right = scene.drop_to_ground(Point3::new(
        mid.x - perp_x * span,
        mid.y - perp_y * span,
        drop_z,
    ))?;

    Some((left.point.z - right.point.z).abs() / (2.0 * span))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geom_types::{plane, IndexedMesh};

    /// A plane tilted laterally: z = slope * y.
    fn tilted_scene(slope: f32) -> Scene {
        let mesh = IndexedMesh::from_parts(
            vec![
                Point3::new(-5.0, -5.0, -5.0 * slope),
                Point3::new(5.0, -5.0, -5.0 * slope),
                Point3::new(5.0, 5.0, 5.0 * slope),
                Point3::new(-5.0, 5.0, 5.0 * slope),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        );
        Scene::from_mesh(&mesh).unwrap()
    }

    fn east_edge_graph() -> Graph {
        let mut graph = Graph::new();
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        graph.add_edge(a, b, 1.0).unwrap();
        graph.add_edge(b, a, 1.0).unwrap();
        graph.compress();
        graph
    }

    #[test]
    fn flat_ground_zero_gradient() {
        let scene = Scene::from_mesh(&plane(-5.0, -5.0, 5.0, 5.0, 0.0)).unwrap();
        let mut graph = east_edge_graph();
        attach_cross_slope(&mut graph, &scene, &CrossSlopeConfig::default()).unwrap();

        let layer = graph.csr(CROSS_SLOPE_LAYER).unwrap();
        assert!(layer.get(0, 1).unwrap().abs() < 1e-4);
        assert!(layer.get(1, 0).unwrap().abs() < 1e-4);
    }

    #[test]
    fn lateral_tilt_measured() {
        // Walking east across a 0.2 rise-per-meter northward tilt
        let scene = tilted_scene(0.2);
        let mut graph = east_edge_graph();
        attach_cross_slope(&mut graph, &scene, &CrossSlopeConfig::default()).unwrap();

        let layer = graph.csr(CROSS_SLOPE_LAYER).unwrap();
        assert_relative_eq!(layer.get(0, 1).unwrap(), 0.2, epsilon = 1e-3);
        // The reverse direction crosses the same terrain
        assert_relative_eq!(layer.get(1, 0).unwrap(), 0.2, epsilon = 1e-3);
    }

    #[test]
    fn probes_off_terrain_omit_edge() {
        // A plane so narrow the lateral probes fall off both sides
        let scene = Scene::from_mesh(&plane(-5.0, -0.1, 5.0, 0.1, 0.0)).unwrap();
        let mut graph = east_edge_graph();
        attach_cross_slope(&mut graph, &scene, &CrossSlopeConfig::default()).unwrap();

        let layer = graph.csr(CROSS_SLOPE_LAYER).unwrap();
        assert_eq!(layer.nnz(), 0);
    }

    #[test]
    fn vertical_pair_omitted() {
        let scene = Scene::from_mesh(&plane(-5.0, -5.0, 5.0, 5.0, 0.0)).unwrap();
        let mut graph = Graph::new();
        let a = Point3::new(0.0, 0.0, 0.0);
        let above = Point3::new(0.0, 0.0, 1.0);
        graph.add_edge(a, above, 1.0).unwrap();
        graph.compress();

        attach_cross_slope(&mut graph, &scene, &CrossSlopeConfig::default()).unwrap();
        assert_eq!(graph.csr(CROSS_SLOPE_LAYER).unwrap().nnz(), 0);
    }

    #[test]
    fn uncompressed_graph_rejected() {
        let scene = Scene::from_mesh(&plane(-1.0, -1.0, 1.0, 1.0, 0.0)).unwrap();
        let mut graph = Graph::new();
        graph
            .add_edge(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 1.0)
            .unwrap();
        assert!(attach_cross_slope(&mut graph, &scene, &CrossSlopeConfig::default()).is_err());
    }
}
