//! Derived edge-cost layers for walkable graphs.
//!
//! The generator's default layer carries geometric distance. The
//! functions here read that layer (and, for terrain probing, the
//! ray-tracing scene) and attach alternate layers sharing the same
//! topology:
//!
//! - [`attach_energy`]: metabolic cost of walking each edge, from the
//!   pedestrian energy-expenditure curve of Minetti et al. (2002).
//! - [`attach_cross_slope`]: terrain gradient across the walking
//!   direction, probed by paired ray drops beside each edge midpoint.
//!
//! Both layers may be sparser than the default layer: edges whose cost
//! is undefined (no walking direction, no terrain beside the path) are
//! omitted rather than given a placeholder weight.
//!
//! # Example
//!
//! ```
//! use geom_types::Point3;
//! use graph_core::Graph;
//! use graph_cost::{attach_energy, ENERGY_LAYER};
//!
//! let mut graph = Graph::new();
//! let a = Point3::new(0.0, 0.0, 0.0);
//! let b = Point3::new(1.0, 0.0, 0.1);
//! graph.add_edge(a, b, 1.005).unwrap();
//! graph.compress();
//!
//! attach_energy(&mut graph).unwrap();
//! let energy = graph.csr(ENERGY_LAYER).unwrap();
//! assert!(energy.get(0, 1).unwrap() > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod cross_slope;
mod energy;
mod error;

pub use cross_slope::{attach_cross_slope, CrossSlopeConfig, CROSS_SLOPE_LAYER};
pub use energy::{attach_energy, attach_energy_with, energy_cost, ENERGY_LAYER};
pub use error::CostError;
