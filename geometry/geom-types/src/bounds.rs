//! Axis-aligned bounding box.

use nalgebra::Point3;

/// An axis-aligned bounding box in 3D space.
///
/// An empty box is represented with inverted bounds (`min > max`) so
/// that expanding it with any point or box yields that point or box.
///
/// # Example
///
/// ```
/// use geom_types::{Aabb, Point3};
///
/// let mut bbox = Aabb::empty();
/// bbox.expand_point(&Point3::new(1.0, 2.0, 3.0));
/// bbox.expand_point(&Point3::new(-1.0, 0.0, 0.0));
///
/// assert!((bbox.min.x - -1.0).abs() < 1e-6);
/// assert!((bbox.max.z - 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3<f32>,
    /// Maximum corner of the bounding box.
    pub max: Point3<f32>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Create an empty (inverted) bounding box.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min: Point3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Point3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    /// Create a bounding box from min and max corners.
    #[must_use]
    pub const fn from_min_max(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Create the bounding box of a triangle.
    #[must_use]
    pub fn from_triangle(v0: &Point3<f32>, v1: &Point3<f32>, v2: &Point3<f32>) -> Self {
        Self {
            min: Point3::new(
                v0.x.min(v1.x).min(v2.x),
                v0.y.min(v1.y).min(v2.y),
                v0.z.min(v1.z).min(v2.z),
            ),
            max: Point3::new(
                v0.x.max(v1.x).max(v2.x),
                v0.y.max(v1.y).max(v2.y),
                v0.z.max(v1.z).max(v2.z),
            ),
        }
    }

    /// Expand this bounding box to include another.
    pub fn expand(&mut self, other: &Self) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.min.z = self.min.z.min(other.min.z);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
        self.max.z = self.max.z.max(other.max.z);
    }

    /// Expand this bounding box to include a point.
    pub fn expand_point(&mut self, point: &Point3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Check if this bounding box intersects another.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.max.x < other.min.x
            || other.max.x < self.min.x
            || self.max.y < other.min.y
            || other.max.y < self.min.y
            || self.max.z < other.min.z
            || other.max.z < self.min.z)
    }

    /// Get the center of this bounding box.
    #[must_use]
    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Get the index of the longest axis (0=X, 1=Y, 2=Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let dx = self.max.x - self.min.x;
        let dy = self.max.y - self.min.y;
        let dz = self.max.z - self.min.z;

        if dx >= dy && dx >= dz {
            0
        } else if dy >= dz {
            1
        } else {
            2
        }
    }

    /// Check if this bounding box is valid (non-empty).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_invalid() {
        assert!(!Aabb::empty().is_valid());
    }

    #[test]
    fn from_triangle_bounds() {
        let bbox = Aabb::from_triangle(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.5, 1.0, 0.5),
        );
        assert_eq!(bbox.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bbox.max, Point3::new(1.0, 1.0, 0.5));
    }

    #[test]
    fn expand_grows_bounds() {
        let mut a = Aabb::from_min_max(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::from_min_max(Point3::new(-1.0, 0.5, 0.5), Point3::new(0.5, 2.0, 0.5));
        a.expand(&b);
        assert_eq!(a.min.x, -1.0);
        assert_eq!(a.max.y, 2.0);
    }

    #[test]
    fn intersection_tests() {
        let a = Aabb::from_min_max(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::from_min_max(Point3::new(0.5, 0.5, 0.5), Point3::new(1.5, 1.5, 1.5));
        let c = Aabb::from_min_max(Point3::new(2.0, 2.0, 2.0), Point3::new(3.0, 3.0, 3.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn longest_axis_selection() {
        let x = Aabb::from_min_max(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 1.0, 1.0));
        let y = Aabb::from_min_max(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 10.0, 1.0));
        let z = Aabb::from_min_max(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 10.0));
        assert_eq!(x.longest_axis(), 0);
        assert_eq!(y.longest_axis(), 1);
        assert_eq!(z.longest_axis(), 2);
    }

    #[test]
    fn center_midpoint() {
        let bbox = Aabb::from_min_max(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0));
        let c = bbox.center();
        assert_eq!(c, Point3::new(1.0, 2.0, 3.0));
    }
}
