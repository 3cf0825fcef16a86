//! Tolerance-based position comparison and hashing.
//!
//! Positions produced by ray casting rarely match bit-for-bit, so every
//! structure keyed by position (the graph's id map, the generator's
//! visited set) compares under an absolute per-component tolerance and
//! hashes through quantized integer keys.

use nalgebra::{Point3, Vector3};

/// Default absolute tolerance for position equality, per component.
pub const DEFAULT_TOLERANCE: f32 = 1e-4;

/// Euclidean (L2) distance between two points.
///
/// # Example
///
/// ```
/// use geom_types::{distance, Point3};
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(3.0, 4.0, 0.0);
/// assert!((distance(&a, &b) - 5.0).abs() < 1e-6);
/// ```
#[inline]
#[must_use]
pub fn distance(a: &Point3<f32>, b: &Point3<f32>) -> f32 {
    (b - a).norm()
}

/// Normalize a vector, returning the zero vector on zero-length input.
///
/// Callers that cannot tolerate a zero direction must check the result.
///
/// # Example
///
/// ```
/// use geom_types::{normalize_or_zero, Vector3};
///
/// let v = normalize_or_zero(Vector3::new(0.0, 0.0, 2.0));
/// assert!((v.z - 1.0).abs() < 1e-6);
///
/// let zero = normalize_or_zero(Vector3::zeros());
/// assert_eq!(zero, Vector3::zeros());
/// ```
#[inline]
#[must_use]
pub fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let norm = v.norm();
    if norm <= f32::EPSILON {
        return Vector3::zeros();
    }
    v / norm
}

/// Componentwise equality under an absolute tolerance.
///
/// # Example
///
/// ```
/// use geom_types::{points_equal, Point3, DEFAULT_TOLERANCE};
///
/// let a = Point3::new(1.0, 2.0, 3.0);
/// let b = Point3::new(1.00005, 2.0, 3.0);
/// assert!(points_equal(&a, &b, DEFAULT_TOLERANCE));
/// assert!(!points_equal(&a, &b, 1e-6));
/// ```
#[inline]
#[must_use]
pub fn points_equal(a: &Point3<f32>, b: &Point3<f32>, tolerance: f32) -> bool {
    (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance && (a.z - b.z).abs() <= tolerance
}

/// A hashable key derived from a position quantized to a tolerance grid.
///
/// Coordinates are divided by the tolerance and rounded to the nearest
/// integer, so positions equal under the tolerance land in the same
/// bucket. Quantization happens in `f64` to keep the rounding stable for
/// coordinates far from the origin.
///
/// # Example
///
/// ```
/// use geom_types::{Point3, PointKey, DEFAULT_TOLERANCE};
///
/// let a = PointKey::quantize(&Point3::new(1.0, 2.0, 3.0), DEFAULT_TOLERANCE);
/// let b = PointKey::quantize(&Point3::new(1.00002, 2.0, 3.0), DEFAULT_TOLERANCE);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointKey {
    x: i64,
    y: i64,
    z: i64,
}

impl PointKey {
    /// Quantize a position onto the tolerance grid.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: quantized coordinates fit i64 for any representable f32
    pub fn quantize(point: &Point3<f32>, tolerance: f32) -> Self {
        let inv = 1.0 / f64::from(tolerance);
        Self {
            x: (f64::from(point.x) * inv).round() as i64,
            y: (f64::from(point.y) * inv).round() as i64,
            z: (f64::from(point.z) * inv).round() as i64,
        }
    }
}
