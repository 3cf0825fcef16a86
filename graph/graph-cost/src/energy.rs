//! Pedestrian energy-expenditure cost layer.

use graph_core::{Graph, DEFAULT_LAYER};
use tracing::debug;

use crate::error::CostError;

/// Name of the energy cost layer.
pub const ENERGY_LAYER: &str = "energy";

/// Metabolic cost of walking on a gradient, in J/(kg·m).
///
/// The pedestrian energy-expenditure curve of Minetti et al. (2002), a
/// fifth-order polynomial in the gradient `g` (rise over horizontal
/// run). The curve is calibrated for gradients roughly in [-0.5, 0.5];
/// outside that range it is extrapolated and clamped at zero, since a
/// negative metabolic cost is meaningless (and would also be rejected by
/// shortest-path searches).
///
/// # Example
///
/// ```
/// use graph_cost::energy_cost;
///
/// // Level walking costs about 2.5 J/(kg·m)
/// assert!((energy_cost(0.0) - 2.5).abs() < 1e-6);
/// // Climbing costs more than descending
/// assert!(energy_cost(0.2) > energy_cost(-0.2));
/// ```
#[must_use]
pub fn energy_cost(gradient: f32) -> f32 {
    let g = gradient;
    let cost = 280.5 * g.powi(5) - 58.7 * g.powi(4) - 76.8 * g.powi(3) + 51.9 * g.powi(2)
        + 19.6 * g
        + 2.5;
    cost.max(0.0)
}

/// Attach the `"energy"` layer using the default Minetti curve.
///
/// # Errors
///
/// See [`attach_energy_with`].
pub fn attach_energy(graph: &mut Graph) -> Result<(), CostError> {
    attach_energy_with(graph, energy_cost)
}

/// Attach the `"energy"` layer using a custom gradient-to-cost curve.
///
/// For every default-layer edge, the gradient is the elevation change
/// divided by the horizontal run between the endpoint nodes; the layer
/// weight is `curve(gradient)` times the edge's geometric length. Edges
/// with no horizontal run (vertical pairs) have no defined gradient and
/// are omitted from the layer.
///
/// # Errors
///
/// [`CostError::Graph`] when the graph is uncompressed or the produced
/// weights are rejected (a curve returning NaN, for example).
pub fn attach_energy_with(
    graph: &mut Graph,
    curve: impl Fn(f32) -> f32,
) -> Result<(), CostError> {
    let triplets: Vec<(u32, u32, f32)> = graph
        .csr(DEFAULT_LAYER)?
        .to_triplets()
        .into_iter()
        .filter_map(|(parent, child, length)| {
            let a = graph.nodes()[parent as usize].position;
            let b = graph.nodes()[child as usize].position;
            let horizontal = (b.x - a.x).hypot(b.y - a.y);
            if horizontal <= f32::EPSILON {
                return None;
            }
            let gradient = (b.z - a.z) / horizontal;
            Some((parent, child, curve(gradient) * length))
        })
        .collect();

    debug!(edges = triplets.len(), "derived energy layer");
    graph.attach_cost_layer(ENERGY_LAYER, &triplets)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geom_types::Point3;

    #[test]
    fn level_walking_baseline() {
        assert_relative_eq!(energy_cost(0.0), 2.5);
    }

    #[test]
    fn known_curve_values() {
        // C(0.5) = 280.5/32 - 58.7/16 - 76.8/8 + 51.9/4 + 9.8 + 2.5
        assert_relative_eq!(energy_cost(0.5), 20.771_875, epsilon = 1e-4);
        // Gentle descent is cheaper than level ground
        assert!(energy_cost(-0.1) < energy_cost(0.0));
    }

    #[test]
    fn steep_descent_clamps_at_zero() {
        assert_relative_eq!(energy_cost(-1.0), 0.0);
    }

    #[test]
    fn layer_weights_scale_with_length() {
        let mut graph = Graph::new();
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        graph.add_edge(a, b, 2.0).unwrap();
        graph.add_edge(b, a, 2.0).unwrap();
        graph.compress();

        attach_energy(&mut graph).unwrap();
        let energy = graph.csr(ENERGY_LAYER).unwrap();
        assert_relative_eq!(energy.get(0, 1).unwrap(), 5.0); // 2.5 * 2.0
        assert_relative_eq!(energy.get(1, 0).unwrap(), 5.0);
    }

    #[test]
    fn climb_and_descent_differ() {
        let mut graph = Graph::new();
        let low = Point3::new(0.0, 0.0, 0.0);
        let high = Point3::new(1.0, 0.0, 0.5);
        let length = 1.25_f32.sqrt();
        graph.add_edge(low, high, length).unwrap();
        graph.add_edge(high, low, length).unwrap();
        graph.compress();

        attach_energy(&mut graph).unwrap();
        let energy = graph.csr(ENERGY_LAYER).unwrap();
        let up = energy.get(0, 1).unwrap();
        let down = energy.get(1, 0).unwrap();
        assert_relative_eq!(up, energy_cost(0.5) * length, epsilon = 1e-4);
        assert_relative_eq!(down, energy_cost(-0.5) * length, epsilon = 1e-4);
        assert!(up > down);
    }

    #[test]
    fn vertical_edges_omitted() {
        let mut graph = Graph::new();
        let a = Point3::new(0.0, 0.0, 0.0);
        let above = Point3::new(0.0, 0.0, 1.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        graph.add_edge(a, above, 1.0).unwrap();
        graph.add_edge(a, b, 1.0).unwrap();
        graph.compress();

        attach_energy(&mut graph).unwrap();
        let energy = graph.csr(ENERGY_LAYER).unwrap();
        assert_eq!(energy.get(0, 1), None); // the vertical pair
        assert!(energy.get(0, 2).is_some());
    }

    #[test]
    fn uncompressed_graph_rejected() {
        let mut graph = Graph::new();
        graph
            .add_edge(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 1.0)
            .unwrap();
        assert!(attach_energy(&mut graph).is_err());
    }

    #[test]
    fn custom_curve() {
        let mut graph = Graph::new();
        graph
            .add_edge(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), 1.0)
            .unwrap();
        graph.compress();

        attach_energy_with(&mut graph, |_| 7.0).unwrap();
        assert_relative_eq!(
            graph.csr(ENERGY_LAYER).unwrap().get(0, 1).unwrap(),
            7.0
        );
    }
}
