//! Spatial graph storage for walkability analysis.
//!
//! A [`Graph`] maps 3D positions to dense integer ids and stores directed
//! weighted edges in compressed sparse row (CSR) form. Beyond the default
//! layer (geometric distance), any number of named cost layers can
//! overlay the same topology, so pathfinding can optimize for distance,
//! energy, slope exposure, or any other per-edge cost without duplicating
//! the graph.
//!
//! # Lifecycle
//!
//! A graph is mutated through [`Graph::add_edge`] (which stages triplets)
//! and becomes queryable after [`Graph::compress`]. Further mutation is
//! allowed; queries between a mutation and the next compression fail with
//! [`GraphError::Uncompressed`].
//!
//! # Example
//!
//! ```
//! use graph_core::{CostAggregation, Graph};
//! use geom_types::Point3;
//!
//! let mut graph = Graph::new();
//! let a = Point3::new(0.0, 0.0, 0.0);
//! let b = Point3::new(1.0, 0.0, 0.0);
//! let c = Point3::new(1.0, 1.0, 0.0);
//!
//! graph.add_edge(a, b, 1.0).unwrap();
//! graph.add_edge(b, c, 1.0).unwrap();
//! graph.compress();
//!
//! assert_eq!(graph.len(), 3);
//! assert!(graph.has_edge(&a, &b, false).unwrap());
//! assert!(!graph.has_edge(&b, &a, false).unwrap());
//! assert!(graph.has_edge(&b, &a, true).unwrap());
//!
//! let sums = graph.aggregate(CostAggregation::Sum, true).unwrap();
//! assert_eq!(sums, vec![1.0, 1.0, 0.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod cancel;
mod csr;
mod error;
mod graph;
mod node;

pub use cancel::CancelToken;
pub use csr::{Csr, CsrView};
pub use error::GraphError;
pub use graph::{CostAggregation, Graph, DEFAULT_LAYER};
pub use node::{Edge, EdgeSet, LinkedEdge, Node, NodeKind};
