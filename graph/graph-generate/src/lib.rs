//! Walkable graph discovery over ray-traced meshes.
//!
//! Starting from a seed position projected onto the mesh, the generator
//! expands a breadth frontier of candidate standing positions. Each
//! frontier node probes its compass neighbors by dropping rays onto the
//! terrain; candidates must satisfy step-height, slope, and occlusion
//! rules to become nodes. Accepted neighbors are connected with
//! symmetric edges weighted by Euclidean distance.
//!
//! # Determinism
//!
//! Candidate geometry is computed in parallel, but node ids are assigned
//! in one serial drain per frontier round, iterating worker batches in
//! (parent order, compass order). The same scene and configuration
//! produce the same graph for any worker count.
//!
//! # Example
//!
//! ```
//! use geom_types::{plane, Point3, Vector3};
//! use graph_generate::{generate, GeneratorConfig};
//! use trace_bvh::Scene;
//!
//! let ground = plane(-2.5, -2.5, 2.5, 2.5, 0.0);
//! let scene = Scene::from_mesh(&ground).unwrap();
//!
//! let config = GeneratorConfig::default()
//!     .with_start(Point3::new(0.0, 0.0, 1.0))
//!     .with_spacing(Vector3::new(1.0, 1.0, 1.0));
//!
//! let graph = generate(&scene, &config).unwrap();
//! assert_eq!(graph.len(), 25); // a 5x5 grid fits the plane
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod config;
mod error;
mod generate;

pub use config::GeneratorConfig;
pub use error::GenerateError;
pub use generate::{generate, generate_with_cancel};
