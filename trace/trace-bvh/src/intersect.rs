//! Low-level intersection primitives.

use geom_types::{Aabb, Point3, Triangle, Vector3};

/// Determinant threshold below which a ray is considered parallel to a
/// triangle's plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Möller–Trumbore ray/triangle intersection.
///
/// `direction` must be unit length for the returned parameter to be a
/// distance. Triangles are double-sided: hits are reported regardless of
/// winding relative to the ray. Hits with `t < t_min` are rejected.
pub(crate) fn ray_triangle(
    origin: &Point3<f32>,
    direction: &Vector3<f32>,
    triangle: &Triangle,
    t_min: f32,
) -> Option<f32> {
    let e1 = triangle.v1 - triangle.v0;
    let e2 = triangle.v2 - triangle.v0;

    let pvec = direction.cross(&e2);
    let det = e1.dot(&pvec);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = origin - triangle.v0;
    let u = tvec.dot(&pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(&e1);
    let v = direction.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(&qvec) * inv_det;
    (t >= t_min).then_some(t)
}

/// Slab test: the entry parameter of a ray against a bounding box.
///
/// `inv_direction` is the componentwise reciprocal of a unit direction.
/// Returns `None` when the ray misses the box or the box lies entirely
/// beyond `max_t`; otherwise the (non-negative) entry parameter.
pub(crate) fn ray_aabb_entry(
    bbox: &Aabb,
    origin: &Point3<f32>,
    inv_direction: &Vector3<f32>,
    max_t: f32,
) -> Option<f32> {
    let tx1 = (bbox.min.x - origin.x) * inv_direction.x;
    let tx2 = (bbox.max.x - origin.x) * inv_direction.x;
    let mut t_near = tx1.min(tx2);
    let mut t_far = tx1.max(tx2);

    let ty1 = (bbox.min.y - origin.y) * inv_direction.y;
    let ty2 = (bbox.max.y - origin.y) * inv_direction.y;
    t_near = t_near.max(ty1.min(ty2));
    t_far = t_far.min(ty1.max(ty2));

    let tz1 = (bbox.min.z - origin.z) * inv_direction.z;
    let tz2 = (bbox.max.z - origin.z) * inv_direction.z;
    t_near = t_near.max(tz1.min(tz2));
    t_far = t_far.min(tz1.max(tz2));

    if t_far < t_near.max(0.0) || t_near > max_t {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Componentwise reciprocal of a direction, mapping zero components to
/// infinity so the slab test degenerates correctly.
pub(crate) fn invert_direction(direction: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(
        if direction.x.abs() > f32::EPSILON {
            1.0 / direction.x
        } else {
            f32::INFINITY.copysign(direction.x)
        },
        if direction.y.abs() > f32::EPSILON {
            1.0 / direction.y
        } else {
            f32::INFINITY.copysign(direction.y)
        },
        if direction.z.abs() > f32::EPSILON {
            1.0 / direction.z
        } else {
            f32::INFINITY.copysign(direction.z)
        },
    )
}
