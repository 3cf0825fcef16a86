//! Shortest-path search over walkable-graph cost layers.
//!
//! All searches run Dijkstra's algorithm over the CSR of a chosen cost
//! layer (the empty string selects the default distance layer). Three
//! forms are provided:
//!
//! - [`shortest_path`]: one start, one end.
//! - [`shortest_paths`]: starts and ends paired by index, solved in
//!   parallel.
//! - [`all_to_all`]: every ordered node pair, row-major, solved in
//!   parallel over sources.
//!
//! "No path exists" is an `Ok(None)` result, not an error: unreachable
//! pairs are an ordinary outcome of disconnected graphs.
//!
//! # Determinism
//!
//! Ties in tentative cost settle toward the lower node id, so equal-cost
//! alternatives always resolve to the same path.
//!
//! # Example
//!
//! ```
//! use geom_types::Point3;
//! use graph_core::Graph;
//! use route_dijkstra::shortest_path;
//!
//! let nodes = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//! ];
//! let edges = [vec![1], vec![2], vec![]];
//! let weights = [vec![1.0], vec![1.5], vec![]];
//! let graph = Graph::from_parts(&nodes, &edges, &weights).unwrap();
//!
//! let path = shortest_path(&graph, 0, 2, "").unwrap().unwrap();
//! assert_eq!(path.len(), 3);
//! assert!((path.total_cost() - 2.5).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod dijkstra;
mod error;
mod path;

pub use dijkstra::{
    all_to_all, all_to_all_with_cancel, shortest_path, shortest_paths, shortest_paths_with_cancel,
};
pub use error::RouteError;
pub use path::{Path, PathMember};
