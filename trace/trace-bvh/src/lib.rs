//! BVH-accelerated ray tracing against triangle meshes.
//!
//! This crate provides the ray-query backend for the walkshed workspace:
//! the graph generator drops rays to find walkable ground, and view
//! analysis fires stratified direction bundles to measure visibility.
//!
//! # Overview
//!
//! - [`Scene`]: one or more triangle meshes behind a bounding volume
//!   hierarchy. Immutable once built and safe to share across threads.
//! - [`Scene::intersect`]: closest hit along a ray.
//! - [`Scene::occluded`]: any-hit test within a bounded distance.
//! - [`Scene::fire_bundle`] / [`Scene::occlusion_bundle`]: batched,
//!   parallel forms whose results preserve input order.
//!
//! # Surface Robustness
//!
//! Query origins frequently sit exactly on geometry produced by a
//! previous query. Hits closer than [`SELF_INTERSECT_EPSILON`] along the
//! ray are ignored so such origins do not re-hit their own surface.
//!
//! # Example
//!
//! ```
//! use trace_bvh::{Ray, Scene};
//! use geom_types::{unit_cube, Point3, Vector3};
//!
//! let scene = Scene::from_mesh(&unit_cube()).unwrap();
//!
//! // From the cube's center, the ceiling is 0.5 above
//! let hit = scene
//!     .intersect(Point3::new(0.5, 0.5, 0.5), Vector3::z())
//!     .unwrap();
//! assert!((hit.distance - 0.5).abs() < 1e-5);
//!
//! // Nothing blocks a short hop that stays inside the cube
//! assert!(!scene.occluded(Point3::new(0.5, 0.5, 0.5), Vector3::x(), 0.25));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bvh;
mod error;
mod intersect;
mod ray;
mod scene;

pub use error::TraceError;
pub use ray::{Ray, RayHit};
pub use scene::Scene;

/// Minimum hit parameter accepted by ray queries.
///
/// Hits closer than this along the ray are treated as the origin's own
/// surface and skipped.
pub const SELF_INTERSECT_EPSILON: f32 = 1e-4;
