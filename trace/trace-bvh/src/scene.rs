//! Multi-mesh ray-tracing scene.

use geom_types::{Aabb, IndexedMesh, Point3, Triangle, Vector3};
use rayon::prelude::*;
use tracing::debug;

use crate::bvh::BvhNode;
use crate::error::TraceError;
use crate::intersect::{invert_direction, ray_aabb_entry, ray_triangle};
use crate::ray::{Ray, RayHit};
use crate::SELF_INTERSECT_EPSILON;

/// A triangle flattened into the scene, tagged with its source mesh.
#[derive(Debug, Clone, Copy)]
struct SceneTriangle {
    triangle: Triangle,
    mesh: u32,
    local_index: u32,
}

/// One or more triangle meshes behind a BVH, ready for ray queries.
///
/// A scene is immutable once built. All queries take `&self` and the
/// scene is `Send + Sync`, so it can be shared freely between worker
/// threads.
///
/// Meshes keep their identity: hits report the index of the mesh (in
/// build order) and the triangle index within that mesh.
///
/// # Example
///
/// ```
/// use trace_bvh::Scene;
/// use geom_types::{plane, Point3, Vector3};
///
/// let ground = plane(-10.0, -10.0, 10.0, 10.0, 0.0);
/// let scene = Scene::from_mesh(&ground).unwrap();
///
/// let hit = scene
///     .intersect(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0))
///     .unwrap();
/// assert!((hit.distance - 5.0).abs() < 1e-4);
/// assert_eq!(hit.mesh, 0);
/// ```
#[derive(Debug)]
pub struct Scene {
    triangles: Vec<SceneTriangle>,
    root: BvhNode,
    mesh_count: usize,
    bounds: Aabb,
}

impl Scene {
    /// Build a scene from a single mesh.
    ///
    /// # Errors
    ///
    /// See [`Scene::build`].
    pub fn from_mesh(mesh: &IndexedMesh) -> Result<Self, TraceError> {
        Self::build(std::slice::from_ref(mesh))
    }

    /// Build a scene from multiple meshes.
    ///
    /// Meshes are assigned ids in input order; hits report the id so
    /// callers can tell sub-geometries apart.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidMesh`] if any mesh has out-of-range
    /// indices or no triangles, and [`TraceError::EmptyScene`] when no
    /// meshes are given.
    pub fn build(meshes: &[IndexedMesh]) -> Result<Self, TraceError> {
        if meshes.is_empty() {
            return Err(TraceError::EmptyScene);
        }

        let mut triangles = Vec::new();
        for (mesh_index, mesh) in meshes.iter().enumerate() {
            mesh.validate().map_err(|source| TraceError::InvalidMesh {
                mesh: mesh_index,
                source,
            })?;
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: scenes with >4B meshes or triangles are unsupported
            for (face, triangle) in mesh.triangles().enumerate() {
                triangles.push(SceneTriangle {
                    triangle,
                    mesh: mesh_index as u32,
                    local_index: face as u32,
                });
            }
        }
        if triangles.is_empty() {
            return Err(TraceError::EmptyScene);
        }

        let boxes: Vec<Aabb> = triangles
            .par_iter()
            .map(|t| Aabb::from_triangle(&t.triangle.v0, &t.triangle.v1, &t.triangle.v2))
            .collect();

        let root = BvhNode::build(&boxes, (0..triangles.len()).collect(), true);
        let bounds = *root.bbox();

        let (leaves, depth) = root.stats();
        debug!(
            meshes = meshes.len(),
            triangles = triangles.len(),
            leaves,
            depth,
            "built ray-tracing scene"
        );

        Ok(Self {
            triangles,
            root,
            mesh_count: meshes.len(),
            bounds,
        })
    }

    /// Total number of triangles in the scene.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of meshes in the scene.
    #[must_use]
    pub const fn mesh_count(&self) -> usize {
        self.mesh_count
    }

    /// Bounding box of the whole scene.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Closest hit along a ray.
    ///
    /// The direction need not be normalized. Returns `None` on a miss or
    /// a zero direction. The reported distance is measured in world units
    /// from the origin; hits closer than [`SELF_INTERSECT_EPSILON`] are
    /// ignored.
    ///
    /// [`SELF_INTERSECT_EPSILON`]: crate::SELF_INTERSECT_EPSILON
    #[must_use]
    pub fn intersect(&self, origin: Point3<f32>, direction: Vector3<f32>) -> Option<RayHit> {
        let dir = geom_types::normalize_or_zero(direction);
        if dir == Vector3::zeros() {
            return None;
        }
        let inv = invert_direction(&dir);

        let mut best: Option<(f32, usize)> = None;
        self.closest_hit(&self.root, &origin, &dir, &inv, &mut best);

        best.map(|(t, index)| {
            let tri = &self.triangles[index];
            RayHit {
                distance: t,
                point: origin + dir * t,
                triangle: tri.local_index,
                mesh: tri.mesh,
            }
        })
    }

    /// Any-hit occlusion test within `[0, max_distance]`.
    ///
    /// Cheaper than [`Scene::intersect`]: traversal stops at the first
    /// hit found, in no particular order.
    #[must_use]
    pub fn occluded(&self, origin: Point3<f32>, direction: Vector3<f32>, max_distance: f32) -> bool {
        let dir = geom_types::normalize_or_zero(direction);
        if dir == Vector3::zeros() {
            return false;
        }
        let inv = invert_direction(&dir);
        self.any_hit(&self.root, &origin, &dir, &inv, max_distance)
    }

    /// Fire a batch of closest-hit rays in parallel.
    ///
    /// Results are returned in input order.
    ///
    /// # Example
    ///
    /// ```
    /// use trace_bvh::{Ray, Scene};
    /// use geom_types::{plane, Point3, Vector3};
    ///
    /// let scene = Scene::from_mesh(&plane(-5.0, -5.0, 5.0, 5.0, 0.0)).unwrap();
    /// let rays = vec![
    ///     Ray::down(Point3::new(0.0, 0.0, 2.0)),
    ///     Ray::down(Point3::new(100.0, 0.0, 2.0)), // off the plane
    /// ];
    /// let hits = scene.fire_bundle(&rays);
    /// assert!(hits[0].is_some());
    /// assert!(hits[1].is_none());
    /// ```
    #[must_use]
    pub fn fire_bundle(&self, rays: &[Ray]) -> Vec<Option<RayHit>> {
        rays.par_iter()
            .map(|ray| self.intersect(ray.origin, ray.direction))
            .collect()
    }

    /// Run a batch of occlusion tests in parallel.
    ///
    /// Results are returned in input order.
    #[must_use]
    pub fn occlusion_bundle(&self, rays: &[Ray], max_distance: f32) -> Vec<bool> {
        rays.par_iter()
            .map(|ray| self.occluded(ray.origin, ray.direction, max_distance))
            .collect()
    }

    /// Drop a ray straight down from `origin` and return the ground hit.
    #[must_use]
    pub fn drop_to_ground(&self, origin: Point3<f32>) -> Option<RayHit> {
        self.intersect(origin, -Vector3::z())
    }

    fn closest_hit(
        &self,
        node: &BvhNode,
        origin: &Point3<f32>,
        dir: &Vector3<f32>,
        inv: &Vector3<f32>,
        best: &mut Option<(f32, usize)>,
    ) {
        let max_t = best.map_or(f32::MAX, |(t, _)| t);
        match node {
            BvhNode::Leaf { bbox, triangles } => {
                if ray_aabb_entry(bbox, origin, inv, max_t).is_none() {
                    return;
                }
                for &index in triangles {
                    let index = index as usize;
                    let tri = &self.triangles[index].triangle;
                    if let Some(t) = ray_triangle(origin, dir, tri, SELF_INTERSECT_EPSILON) {
                        if best.map_or(true, |(bt, _)| t < bt) {
                            *best = Some((t, index));
                        }
                    }
                }
            }
            BvhNode::Internal { bbox, left, right } => {
                if ray_aabb_entry(bbox, origin, inv, max_t).is_none() {
                    return;
                }
                // Visit the nearer child first so the far child can be
                // culled against a tightened best distance
                let left_entry = ray_aabb_entry(left.bbox(), origin, inv, max_t);
                let right_entry = ray_aabb_entry(right.bbox(), origin, inv, max_t);
                match (left_entry, right_entry) {
                    (Some(lt), Some(rt)) => {
                        if lt <= rt {
                            self.closest_hit(left, origin, dir, inv, best);
                            self.closest_hit(right, origin, dir, inv, best);
                        } else {
                            self.closest_hit(right, origin, dir, inv, best);
                            self.closest_hit(left, origin, dir, inv, best);
                        }
                    }
                    (Some(_), None) => self.closest_hit(left, origin, dir, inv, best),
                    (None, Some(_)) => self.closest_hit(right, origin, dir, inv, best),
                    (None, None) => {}
                }
            }
        }
    }

    fn any_hit(
        &self,
        node: &BvhNode,
        origin: &Point3<f32>,
        dir: &Vector3<f32>,
        inv: &Vector3<f32>,
        max_t: f32,
    ) -> bool {
        if ray_aabb_entry(node.bbox(), origin, inv, max_t).is_none() {
            return false;
        }
        match node {
            BvhNode::Leaf { triangles, .. } => triangles.iter().any(|&index| {
                let tri = &self.triangles[index as usize].triangle;
                ray_triangle(origin, dir, tri, SELF_INTERSECT_EPSILON)
                    .is_some_and(|t| t <= max_t)
            }),
            BvhNode::Internal { left, right, .. } => {
                self.any_hit(left, origin, dir, inv, max_t)
                    || self.any_hit(right, origin, dir, inv, max_t)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use geom_types::{plane, unit_cube};

    #[test]
    fn empty_inputs_fail() {
        assert!(matches!(Scene::build(&[]), Err(TraceError::EmptyScene)));
        assert!(matches!(
            Scene::from_mesh(&IndexedMesh::new()),
            Err(TraceError::InvalidMesh { mesh: 0, .. })
        ));
    }

    #[test]
    fn dangling_index_fails() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        assert!(matches!(
            Scene::from_mesh(&mesh),
            Err(TraceError::InvalidMesh { mesh: 0, .. })
        ));
    }

    #[test]
    fn closest_hit_from_cube_center() {
        let scene = Scene::from_mesh(&unit_cube()).unwrap();
        let center = Point3::new(0.5, 0.5, 0.5);

        for dir in [
            Vector3::x(),
            -Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
        ] {
            let hit = scene.intersect(center, dir).unwrap();
            assert!(
                (hit.distance - 0.5).abs() < 1e-5,
                "expected 0.5 along {dir:?}, got {}",
                hit.distance
            );
        }
    }

    #[test]
    fn unnormalized_direction_reports_world_distance() {
        let scene = Scene::from_mesh(&unit_cube()).unwrap();
        let hit = scene
            .intersect(Point3::new(0.5, 0.5, 0.5), Vector3::new(0.0, 0.0, 10.0))
            .unwrap();
        assert!((hit.distance - 0.5).abs() < 1e-5);
    }

    #[test]
    fn miss_returns_none() {
        let scene = Scene::from_mesh(&plane(-1.0, -1.0, 1.0, 1.0, 0.0)).unwrap();
        assert!(scene
            .intersect(Point3::new(5.0, 5.0, 1.0), -Vector3::z())
            .is_none());
        assert!(scene
            .intersect(Point3::new(0.0, 0.0, 1.0), Vector3::z())
            .is_none());
    }

    #[test]
    fn zero_direction_never_hits() {
        let scene = Scene::from_mesh(&unit_cube()).unwrap();
        assert!(scene
            .intersect(Point3::new(0.5, 0.5, 0.5), Vector3::zeros())
            .is_none());
        assert!(!scene.occluded(Point3::new(0.5, 0.5, 0.5), Vector3::zeros(), 10.0));
    }

    #[test]
    fn origin_on_surface_skips_own_face() {
        let scene = Scene::from_mesh(&plane(-1.0, -1.0, 1.0, 1.0, 0.0)).unwrap();
        // Origin exactly on the plane, pointing up: the plane itself
        // must not be reported as a hit at t=0
        assert!(scene
            .intersect(Point3::new(0.0, 0.0, 0.0), Vector3::z())
            .is_none());
    }

    #[test]
    fn occlusion_respects_max_distance() {
        let scene = Scene::from_mesh(&plane(-1.0, -1.0, 1.0, 1.0, 0.0)).unwrap();
        let origin = Point3::new(0.0, 0.0, 5.0);
        assert!(scene.occluded(origin, -Vector3::z(), 10.0));
        assert!(!scene.occluded(origin, -Vector3::z(), 4.0));
    }

    #[test]
    fn multi_mesh_ids() {
        let low = plane(-1.0, -1.0, 1.0, 1.0, 0.0);
        let high = plane(-1.0, -1.0, 1.0, 1.0, 2.0);
        let scene = Scene::build(&[low, high]).unwrap();
        assert_eq!(scene.mesh_count(), 2);

        // The first surface below is the high plane
        let hit = scene.drop_to_ground(Point3::new(0.0, 0.0, 5.0)).unwrap();
        assert_eq!(hit.mesh, 1);
        assert!((hit.point.z - 2.0).abs() < 1e-4);

        // From between the planes, the low plane is hit
        let hit = scene.drop_to_ground(Point3::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(hit.mesh, 0);
    }

    #[test]
    fn bundle_preserves_input_order() {
        let scene = Scene::from_mesh(&plane(-10.0, -10.0, 10.0, 10.0, 0.0)).unwrap();
        #[allow(clippy::cast_precision_loss)]
        let rays: Vec<Ray> = (0..64)
            .map(|i| Ray::down(Point3::new(i as f32 * 0.1, 0.0, 1.0 + i as f32)))
            .collect();
        let hits = scene.fire_bundle(&rays);
        assert_eq!(hits.len(), 64);
        for (i, hit) in hits.iter().enumerate() {
            let hit = hit.unwrap();
            #[allow(clippy::cast_precision_loss)]
            let expected = 1.0 + i as f32;
            assert!(
                (hit.distance - expected).abs() < 1e-3,
                "ray {i}: expected {expected}, got {}",
                hit.distance
            );
        }
    }

    #[test]
    fn occlusion_bundle_order() {
        let scene = Scene::from_mesh(&plane(-1.0, -1.0, 1.0, 1.0, 0.0)).unwrap();
        let rays = vec![
            Ray::down(Point3::new(0.0, 0.0, 0.5)),
            Ray::down(Point3::new(5.0, 0.0, 0.5)),
            Ray::down(Point3::new(0.5, 0.5, 0.5)),
        ];
        assert_eq!(scene.occlusion_bundle(&rays, 1.0), vec![true, false, true]);
    }

    #[test]
    fn hit_reports_local_triangle_index() {
        let scene = Scene::from_mesh(&unit_cube()).unwrap();
        let hit = scene.drop_to_ground(Point3::new(0.5, 0.5, 0.5)).unwrap();
        // Bottom face triangles are local indices 0 and 1
        assert!(hit.triangle < 2);
        assert_eq!(hit.mesh, 0);
    }
}
