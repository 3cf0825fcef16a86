//! Ray-cast view analysis from sampled positions.
//!
//! From each origin (typically a walkable-graph node offset to eye
//! height), a deterministic near-uniform bundle of directions is cast
//! against the scene. Two result shapes are offered:
//!
//! - [`score_views`]: one scalar per origin, reducing the hit distances
//!   with a chosen [`ViewAggregation`].
//! - [`scan_views`]: the full per-ray grid of hit/distance/mesh records.
//!
//! Directions come from a Fibonacci spiral over the sphere, optionally
//! clamped to a field of view above and below the horizon; the effective
//! ray count per origin is whatever survives the clamp.
//!
//! # Example
//!
//! ```
//! use geom_types::{unit_cube, Point3};
//! use trace_bvh::Scene;
//! use view_analysis::{score_views, ViewAggregation, ViewConfig};
//!
//! let scene = Scene::from_mesh(&unit_cube()).unwrap();
//! let config = ViewConfig::default()
//!     .with_ray_count(500)
//!     .with_height(0.0)
//!     .with_fov(90.0, 90.0);
//!
//! // From the cube's center every ray hits a wall
//! let origins = [Point3::new(0.5, 0.5, 0.5)];
//! let scores = score_views(&scene, &origins, ViewAggregation::Count, &config).unwrap();
//! assert_eq!(scores.scores()[0], 500.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod analyze;
mod config;
mod error;
mod sample;

pub use analyze::{
    node_origins, scan_views, score_views, RaySample, ScoreArray, ViewAggregation, ViewGrid,
    MISS_DISTANCE,
};
pub use config::ViewConfig;
pub use error::ViewError;
pub use sample::fibonacci_directions;
