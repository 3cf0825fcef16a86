//! Ray and hit-record types.

use geom_types::{normalize_or_zero, Point3, Vector3};

/// A ray defined by an origin point and a direction vector.
///
/// The direction does not need to be normalized; queries normalize it
/// internally. A zero direction never hits anything.
///
/// # Example
///
/// ```
/// use trace_bvh::Ray;
/// use geom_types::{Point3, Vector3};
///
/// let ray = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -1.0));
/// let p = ray.point_at(1.5);
/// assert!((p.z - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin of the ray.
    pub origin: Point3<f32>,
    /// The direction of the ray (not necessarily normalized).
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a new ray with the given origin and direction.
    #[inline]
    #[must_use]
    pub const fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    /// Creates a ray pointing straight down (-Z) from `origin`.
    ///
    /// This is the ground-probe shape used throughout graph generation.
    #[inline]
    #[must_use]
    pub fn down(origin: Point3<f32>) -> Self {
        Self::new(origin, -Vector3::z())
    }

    /// Returns the point along the ray at parameter `t`.
    #[inline]
    #[must_use]
    pub fn point_at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Returns the direction normalized to unit length.
    ///
    /// Returns the zero vector for a zero direction.
    #[inline]
    #[must_use]
    pub fn direction_normalized(&self) -> Vector3<f32> {
        normalize_or_zero(self.direction)
    }
}

/// Result of a closest-hit ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the (offset) origin to the hit point, in world units.
    pub distance: f32,
    /// The world-space hit point.
    pub point: Point3<f32>,
    /// Index of the hit triangle within its mesh.
    pub triangle: u32,
    /// Id of the mesh the triangle belongs to (order of scene construction).
    pub mesh: u32,
}
