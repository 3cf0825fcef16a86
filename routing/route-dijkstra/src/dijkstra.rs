//! Dijkstra searches over a cost-layer CSR.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use graph_core::{CancelToken, Csr, Graph};
use rayon::prelude::*;
use tracing::debug;

use crate::error::RouteError;
use crate::path::{Path, PathMember};

/// Sentinel for "no predecessor".
const NO_PRED: u32 = u32::MAX;

/// Heap entry for the priority queue.
#[derive(Debug, Clone, Copy)]
struct State {
    cost: f32,
    node: u32,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && (self.cost - other.cost).abs() < f32::EPSILON
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; cost ties settle toward the lower id
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Shortest path from `start` to `end` over the named layer.
///
/// The empty layer name selects the default distance layer. Returns
/// `Ok(None)` when `end` is unreachable; `start == end` yields the
/// single-member path of cost 0.
///
/// # Errors
///
/// [`RouteError::Graph`] for an uncompressed graph, unknown layer, or
/// unknown node id; [`RouteError::NegativeWeight`] when the layer holds
/// a negative weight.
pub fn shortest_path(
    graph: &Graph,
    start: u32,
    end: u32,
    layer: &str,
) -> Result<Option<Path>, RouteError> {
    let csr = prepare(graph, &[start, end], layer)?;
    Ok(single(csr, start, end))
}

/// Shortest paths for starts and ends paired by index.
///
/// # Errors
///
/// See [`shortest_paths_with_cancel`].
pub fn shortest_paths(
    graph: &Graph,
    starts: &[u32],
    ends: &[u32],
    layer: &str,
) -> Result<Vec<Option<Path>>, RouteError> {
    shortest_paths_with_cancel(graph, starts, ends, layer, &CancelToken::new())
}

/// Shortest paths for starts and ends paired by index, solved in
/// parallel, polling `cancel` between pairs.
///
/// Results are indexed by input order regardless of completion order.
///
/// # Errors
///
/// [`RouteError::ShapeMismatch`] when the arrays differ in length;
/// [`RouteError::Cancelled`] when `cancel` fires; otherwise as
/// [`shortest_path`].
pub fn shortest_paths_with_cancel(
    graph: &Graph,
    starts: &[u32],
    ends: &[u32],
    layer: &str,
    cancel: &CancelToken,
) -> Result<Vec<Option<Path>>, RouteError> {
    if starts.len() != ends.len() {
        return Err(RouteError::ShapeMismatch {
            starts: starts.len(),
            ends: ends.len(),
        });
    }
    let mut ids: Vec<u32> = starts.to_vec();
    ids.extend_from_slice(ends);
    let csr = prepare(graph, &ids, layer)?;

    debug!(pairs = starts.len(), layer, "solving paired shortest paths");
    starts
        .par_iter()
        .zip(ends.par_iter())
        .map(|(&start, &end)| {
            if cancel.is_cancelled() {
                return Err(RouteError::Cancelled);
            }
            Ok(single(csr, start, end))
        })
        .collect()
}

/// Shortest paths between every ordered node pair.
///
/// # Errors
///
/// See [`all_to_all_with_cancel`].
pub fn all_to_all(graph: &Graph, layer: &str) -> Result<Vec<Option<Path>>, RouteError> {
    all_to_all_with_cancel(graph, layer, &CancelToken::new())
}

/// Shortest paths between every ordered node pair, parallel over
/// sources, polling `cancel` between them.
///
/// The result is row-major: entry `i * n + j` is the path from node `i`
/// to node `j`. Diagonal entries are `None` (the empty path), and so are
/// unreachable pairs.
///
/// # Errors
///
/// [`RouteError::Cancelled`] when `cancel` fires; otherwise as
/// [`shortest_path`].
pub fn all_to_all_with_cancel(
    graph: &Graph,
    layer: &str,
    cancel: &CancelToken,
) -> Result<Vec<Option<Path>>, RouteError> {
    let csr = prepare(graph, &[], layer)?;
    let n = graph.len();

    debug!(nodes = n, layer, "solving all-to-all shortest paths");
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: node count fits u32 by construction
    let rows: Vec<Vec<Option<Path>>> = (0..n as u32)
        .into_par_iter()
        .map(|source| {
            if cancel.is_cancelled() {
                return Err(RouteError::Cancelled);
            }
            let (dist, pred) = solve(csr, source, None);
            let row = (0..n as u32)
                .map(|target| {
                    if target == source || dist[target as usize].is_infinite() {
                        None
                    } else {
                        reconstruct(csr, &pred, source, target)
                    }
                })
                .collect();
            Ok(row)
        })
        .collect::<Result<_, _>>()?;

    Ok(rows.into_iter().flatten().collect())
}

/// Resolve the layer CSR, validate ids, and reject negative weights.
fn prepare<'g>(graph: &'g Graph, ids: &[u32], layer: &str) -> Result<&'g Csr, RouteError> {
    let csr = graph.csr(layer)?;
    for &id in ids {
        graph.node_from_id(id)?;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // Casts: ids originate from u32 assignment
    for row in 0..csr.rows() {
        let (cols, vals) = csr.row(row);
        for (&col, &weight) in cols.iter().zip(vals) {
            if weight < 0.0 {
                return Err(RouteError::NegativeWeight {
                    parent: row as u32,
                    child: col as u32,
                    weight,
                });
            }
        }
    }
    Ok(csr)
}

fn single(csr: &Csr, start: u32, end: u32) -> Option<Path> {
    if start == end {
        return Some(Path::new(vec![PathMember {
            node: start,
            cost_from_parent: 0.0,
        }]));
    }
    let (dist, pred) = solve(csr, start, Some(end));
    if dist.get(end as usize)?.is_infinite() {
        return None;
    }
    reconstruct(csr, &pred, start, end)
}

/// Dijkstra relaxation from one source. Returns tentative distances and
/// predecessors (`u32::MAX` = none). Stops early once `target` settles.
fn solve(csr: &Csr, source: u32, target: Option<u32>) -> (Vec<f32>, Vec<u32>) {
    let n = csr.rows();
    let mut dist = vec![f32::INFINITY; n];
    let mut pred = vec![NO_PRED; n];
    if source as usize >= n {
        return (dist, pred);
    }

    let mut heap = BinaryHeap::new();
    dist[source as usize] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: source,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if cost > dist[node as usize] {
            continue;
        }
        if target == Some(node) {
            break;
        }
        let (cols, vals) = csr.row(node as usize);
        for (&child, &weight) in cols.iter().zip(vals) {
            #[allow(clippy::cast_sign_loss)]
            // Sign loss: column entries originate from u32 ids
            let child = child as u32;
            let next = cost + weight;
            if next < dist[child as usize] {
                dist[child as usize] = next;
                pred[child as usize] = node;
                heap.push(State {
                    cost: next,
                    node: child,
                });
            }
        }
    }

    (dist, pred)
}

/// Walk predecessors from `end` back to `start` and emit members with
/// their layer edge costs.
fn reconstruct(csr: &Csr, pred: &[u32], start: u32, end: u32) -> Option<Path> {
    let mut chain = vec![end];
    let mut current = end;
    while current != start {
        current = *pred.get(current as usize)?;
        if current == NO_PRED {
            return None;
        }
        chain.push(current);
    }
    chain.reverse();

    let mut members = Vec::with_capacity(chain.len());
    members.push(PathMember {
        node: chain[0],
        cost_from_parent: 0.0,
    });
    for pair in chain.windows(2) {
        let cost = csr.get(pair[0], pair[1])?;
        members.push(PathMember {
            node: pair[1],
            cost_from_parent: cost,
        });
    }
    Some(Path::new(members))
}
