//! Core geometric types for walkability analysis.
//!
//! This crate provides the foundational types shared by the walkshed
//! workspace:
//!
//! - [`PointKey`] - Tolerance-quantized hash key for 3D positions
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Units and Precision
//!
//! All coordinates are `f32`, matching the interop contract with host
//! tooling (vertex buffers arrive as `f32[3·V]`). The library is
//! unit-agnostic; callers are responsible for consistent units.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** with Z up:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down)
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//! Normals point outward by the right-hand rule.
//!
//! # Tolerance
//!
//! Position equality throughout the workspace is tolerance-based:
//! two points are the same position when every component differs by at
//! most [`DEFAULT_TOLERANCE`]. [`PointKey`] quantizes coordinates so that
//! equal-under-tolerance points share a hash bucket.
//!
//! # Example
//!
//! ```
//! use geom_types::{IndexedMesh, Point3, distance};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!((distance(&mesh.vertices[0], &mesh.vertices[1]) - 1.0).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod error;
mod key;
mod mesh;
mod triangle;

pub use bounds::Aabb;
pub use error::MeshError;
pub use key::{distance, normalize_or_zero, points_equal, PointKey, DEFAULT_TOLERANCE};
pub use mesh::{plane, unit_cube, IndexedMesh};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
