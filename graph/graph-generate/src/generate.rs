//! Breadth-frontier expansion of walkable nodes.

use geom_types::{distance, Point3, Vector3};
use graph_core::{CancelToken, Graph, DEFAULT_LAYER};
use hashbrown::HashMap;
use rayon::prelude::*;
use trace_bvh::Scene;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::GenerateError;

/// Compass offsets explored around each node, clockwise from north.
const DIRECTIONS: [(f32, f32); 8] = [
    (0.0, 1.0),
    (1.0, 1.0),
    (1.0, 0.0),
    (1.0, -1.0),
    (0.0, -1.0),
    (-1.0, -1.0),
    (-1.0, 0.0),
    (-1.0, 1.0),
];

/// Lift applied to every probe origin so rays never start exactly on the
/// surface they are probing.
const PROBE_LIFT: f32 = 1e-3;

/// Slack for step-height comparisons against ray-cast elevations.
const STEP_TOLERANCE: f32 = 1e-4;

/// Generate a walkable graph from a scene.
///
/// Equivalent to [`generate_with_cancel`] with a token that never fires.
///
/// # Errors
///
/// See [`generate_with_cancel`].
pub fn generate(scene: &Scene, config: &GeneratorConfig) -> Result<Graph, GenerateError> {
    generate_with_cancel(scene, config, &CancelToken::new())
}

/// Generate a walkable graph, polling `cancel` between frontier rounds.
///
/// The seed is projected onto the mesh by a downward ray and becomes
/// node 0. Expansion proceeds in breadth-first rounds until the frontier
/// empties or the node bound is reached; nodes that end up with fewer
/// than `min_connections` outgoing edges are dropped afterwards.
///
/// # Errors
///
/// - [`GenerateError::InvalidConfig`] for out-of-range parameters.
/// - [`GenerateError::NoGround`] when the seed has no ground below it.
/// - [`GenerateError::NoGraph`] when no node survives the connection
///   filter.
/// - [`GenerateError::Cancelled`] when `cancel` fires; partial results
///   are discarded.
/// - [`GenerateError::WorkerPool`] when a pinned thread pool cannot be
///   built.
pub fn generate_with_cancel(
    scene: &Scene,
    config: &GeneratorConfig,
    cancel: &CancelToken,
) -> Result<Graph, GenerateError> {
    config.validate()?;
    match config.core_count() {
        Some(threads) if threads > 0 => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pool.install(|| expand(scene, config, cancel))
        }
        _ => expand(scene, config, cancel),
    }
}

fn expand(
    scene: &Scene,
    config: &GeneratorConfig,
    cancel: &CancelToken,
) -> Result<Graph, GenerateError> {
    let seed_hit = scene
        .drop_to_ground(config.start())
        .ok_or(GenerateError::NoGround)?;
    let seed = seed_hit.point;

    info!(
        start = ?config.start(),
        seed = ?seed,
        max_nodes = config.max_nodes(),
        "generating walkable graph"
    );

    let half_x = config.spacing().x * 0.5;
    let half_y = config.spacing().y * 0.5;

    let mut graph = Graph::new();
    let mut visited: HashMap<(i64, i64), u32> = HashMap::new();

    let seed_id = graph.get_or_assign_id(seed);
    visited.insert(plan_key(&seed, half_x, half_y), seed_id);

    let mut frontier = vec![seed_id];
    let mut rounds = 0usize;

    while !frontier.is_empty() {
        if cancel.is_cancelled() {
            return Err(GenerateError::Cancelled);
        }
        if config.max_nodes() > 0 && graph.len() >= config.max_nodes() {
            break;
        }

        // Workers compute candidate geometry only; collect() keeps the
        // batches in frontier order for deterministic id assignment
        let parents: Vec<Point3<f32>> = frontier
            .iter()
            .map(|&id| graph.nodes()[id as usize].position)
            .collect();
        let batches: Vec<Vec<Point3<f32>>> = parents
            .par_iter()
            .map(|&parent| expand_node(scene, parent, config))
            .collect();

        let mut next = Vec::new();
        'drain: for (&parent_id, candidates) in frontier.iter().zip(&batches) {
            let parent_pos = graph.nodes()[parent_id as usize].position;
            for &candidate in candidates {
                let key = plan_key(&candidate, half_x, half_y);
                let child_id = if let Some(&existing) = visited.get(&key) {
                    existing
                } else {
                    if config.max_nodes() > 0 && graph.len() >= config.max_nodes() {
                        break 'drain;
                    }
                    let id = graph.get_or_assign_id(candidate);
                    visited.insert(key, id);
                    next.push(id);
                    id
                };
                if child_id == parent_id {
                    continue;
                }
                let child_pos = graph.nodes()[child_id as usize].position;
                let weight = distance(&parent_pos, &child_pos);
                graph.add_edge_by_id(parent_id, child_id, weight)?;
                graph.add_edge_by_id(child_id, parent_id, weight)?;
            }
        }

        frontier = next;
        rounds += 1;
        debug!(
            round = rounds,
            nodes = graph.len(),
            frontier = frontier.len(),
            "expanded frontier"
        );
    }

    graph.compress();
    let graph = filter_min_connections(graph, config.min_connections())?;
    if graph.is_empty() {
        return Err(GenerateError::NoGraph);
    }

    info!(
        nodes = graph.len(),
        edges = graph.csr(DEFAULT_LAYER)?.nnz(),
        rounds,
        "generated walkable graph"
    );
    Ok(graph)
}

/// Probe the compass neighbors of one node.
///
/// Per direction, up to `max_step_connections` attempts drop a ray onto
/// the candidate column, each from a higher origin so low obstructions
/// between the node and the column can be cleared. A ground hit must
/// pass the step-height and slope rules to become a candidate.
fn expand_node(scene: &Scene, parent: Point3<f32>, config: &GeneratorConfig) -> Vec<Point3<f32>> {
    let spacing = config.spacing();
    let mut accepted = Vec::new();

    for (dx, dy) in DIRECTIONS {
        let target_x = parent.x + dx * spacing.x;
        let target_y = parent.y + dy * spacing.y;
        let horizontal = (dx * spacing.x).hypot(dy * spacing.y);

        for attempt in 1..=config.max_step_connections() {
            #[allow(clippy::cast_precision_loss)]
            // Precision: attempt counts are tiny
            let probe_z = parent.z + config.up_step() * attempt as f32 + PROBE_LIFT;

            // A wall between the node and the candidate column blocks
            // this attempt; the next one probes higher
            let eye = Point3::new(parent.x, parent.y, probe_z);
            let toward = Vector3::new(target_x - parent.x, target_y - parent.y, 0.0);
            if scene.occluded(eye, toward, horizontal) {
                continue;
            }

            let Some(hit) = scene.drop_to_ground(Point3::new(target_x, target_y, probe_z)) else {
                // Nothing below this column at all
                break;
            };
            let candidate = hit.point;
            let rise = candidate.z - parent.z;

            // Step-height rule; a higher probe can only find the same or
            // higher ground, so a violation ends the direction
            if rise > config.up_step() + STEP_TOLERANCE {
                break;
            }
            if -rise > config.down_step() + STEP_TOLERANCE {
                break;
            }

            // Slope rule
            let angle = rise.abs().atan2(horizontal).to_degrees();
            if rise > STEP_TOLERANCE && angle > config.up_slope() {
                break;
            }
            if rise < -STEP_TOLERANCE && angle > config.down_slope() {
                break;
            }

            accepted.push(candidate);
            break;
        }
    }

    accepted
}

/// Quantized plan-position key at half the grid spacing.
#[allow(clippy::cast_possible_truncation)]
// Truncation: quantized coordinates fit i64 for any representable f32
fn plan_key(point: &Point3<f32>, half_x: f32, half_y: f32) -> (i64, i64) {
    (
        (f64::from(point.x) / f64::from(half_x)).round() as i64,
        (f64::from(point.y) / f64::from(half_y)).round() as i64,
    )
}

/// Drop nodes with fewer than `min_connections` outgoing edges and
/// rebuild the graph with dense ids.
fn filter_min_connections(graph: Graph, min_connections: u32) -> Result<Graph, GenerateError> {
    if min_connections == 0 {
        return Ok(graph);
    }
    let keep: Vec<bool> = {
        let csr = graph.csr(DEFAULT_LAYER)?;
        (0..graph.len())
            .map(|id| csr.row(id).0.len() >= min_connections as usize)
            .collect()
    };
    if keep.iter().all(|&k| k) {
        return Ok(graph);
    }

    let dropped = keep.iter().filter(|&&k| !k).count();
    debug!(dropped, "dropping under-connected nodes");

    let mut remap: Vec<Option<u32>> = vec![None; graph.len()];
    let mut rebuilt = Graph::with_tolerance(graph.tolerance());
    for (old, node) in graph.nodes().iter().enumerate() {
        if keep[old] {
            remap[old] = Some(rebuilt.add_node(node.position, node.kind));
        }
    }
    for (parent, child, weight) in graph.csr(DEFAULT_LAYER)?.to_triplets() {
        if let (Some(new_parent), Some(new_child)) =
            (remap[parent as usize], remap[child as usize])
        {
            rebuilt.add_edge_by_id(new_parent, new_child, weight)?;
        }
    }
    rebuilt.compress();
    Ok(rebuilt)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use geom_types::plane;

    fn flat_scene() -> Scene {
        Scene::from_mesh(&plane(-5.5, -5.5, 5.5, 5.5, 0.0)).unwrap()
    }

    fn flat_config() -> GeneratorConfig {
        GeneratorConfig::default()
            .with_start(Point3::new(0.0, 0.0, 1.0))
            .with_slopes(45.0, 45.0)
            .with_steps(0.1, 0.1)
    }

    #[test]
    fn seed_projects_onto_ground() {
        let graph = generate(&flat_scene(), &flat_config()).unwrap();
        let seed = graph.nodes()[0].position;
        assert!((seed.x).abs() < 1e-4);
        assert!((seed.y).abs() < 1e-4);
        assert!((seed.z).abs() < 1e-3);
    }

    #[test]
    fn grid_covers_plane() {
        let graph = generate(&flat_scene(), &flat_config()).unwrap();
        // x and y in -5..=5 at unit spacing
        assert_eq!(graph.len(), 121);
    }

    #[test]
    fn free_space_start_fails() {
        let scene = flat_scene();
        let config = flat_config().with_start(Point3::new(0.0, 0.0, -1.0));
        // The only surface is above the start; the downward ray misses
        let result = generate(&scene, &config);
        assert!(matches!(result, Err(GenerateError::NoGround)));
        assert!(result.unwrap_err().is_no_graph());
    }

    #[test]
    fn max_nodes_one_keeps_seed_only() {
        let config = flat_config().with_max_nodes(1).with_min_connections(0);
        let graph = generate(&flat_scene(), &config).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.csr(DEFAULT_LAYER).unwrap().nnz(), 0);
    }

    #[test]
    fn max_nodes_bounds_growth() {
        let config = flat_config().with_max_nodes(10).with_min_connections(0);
        let graph = generate(&flat_scene(), &config).unwrap();
        assert!(graph.len() <= 10);
    }

    #[test]
    fn cancellation_discards_work() {
        let token = CancelToken::new();
        token.cancel();
        let result = generate_with_cancel(&flat_scene(), &flat_config(), &token);
        assert!(matches!(result, Err(GenerateError::Cancelled)));
    }

    #[test]
    fn determinism_across_worker_counts() {
        let scene = flat_scene();
        let one = generate(&scene, &flat_config().with_core_count(Some(1))).unwrap();
        let many = generate(&scene, &flat_config().with_core_count(Some(4))).unwrap();

        assert_eq!(one.len(), many.len());
        for (a, b) in one.nodes().iter().zip(many.nodes()) {
            assert_eq!(a.id, b.id);
            assert!(geom_types::points_equal(&a.position, &b.position, 1e-5));
        }
        assert_eq!(
            one.csr(DEFAULT_LAYER).unwrap().to_triplets(),
            many.csr(DEFAULT_LAYER).unwrap().to_triplets()
        );
    }

    #[test]
    fn min_connections_filter_drops_corners() {
        // Corners of the grid have 3 neighbors, border nodes 5, interior 8
        let config = flat_config().with_min_connections(4);
        let graph = generate(&flat_scene(), &config).unwrap();
        assert_eq!(graph.len(), 121 - 4);
        // Ids stay dense after the rebuild
        for (index, node) in graph.nodes().iter().enumerate() {
            assert_eq!(node.id as usize, index);
        }
    }

    #[test]
    fn impossible_min_connections_yields_no_graph() {
        let config = flat_config().with_min_connections(9);
        let result = generate(&flat_scene(), &config);
        assert!(matches!(result, Err(GenerateError::NoGraph)));
    }

    #[test]
    fn invalid_config_rejected_before_tracing() {
        let config = flat_config().with_spacing(Vector3::new(-1.0, 1.0, 1.0));
        assert!(matches!(
            generate(&flat_scene(), &config),
            Err(GenerateError::InvalidConfig(_))
        ));
    }
}
