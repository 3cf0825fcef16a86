//! Indexed triangle mesh.

use nalgebra::Point3;

use crate::bounds::Aabb;
use crate::error::MeshError;
use crate::triangle::Triangle;

/// An indexed triangle mesh.
///
/// Stores vertices and faces separately, with faces referencing vertices
/// by index. This is the geometry input to the ray-tracing scene; the
/// host's OBJ loader hands its flat buffers to [`IndexedMesh::from_raw`].
///
/// # Winding Order
///
/// Faces use **counter-clockwise (CCW) winding** when viewed from
/// outside. Normals point outward by the right-hand rule.
///
/// # Example
///
/// ```
/// use geom_types::{IndexedMesh, Point3};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// assert!(mesh.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexedMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f32>>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f32>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from the loader's flat coordinate and index buffers.
    ///
    /// # Arguments
    ///
    /// * `positions` - Flat vertex positions `[x0, y0, z0, x1, y1, z1, ...]`
    /// * `indices` - Flat face indices `[a0, b0, c0, a1, b1, c1, ...]`
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::RaggedPositions`] or [`MeshError::RaggedIndices`]
    /// when a buffer length is not a multiple of 3, and
    /// [`MeshError::IndexOutOfRange`] when a face references a missing
    /// vertex.
    ///
    /// # Example
    ///
    /// ```
    /// use geom_types::IndexedMesh;
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let indices = [0, 1, 2];
    ///
    /// let mesh = IndexedMesh::from_raw(&positions, &indices).unwrap();
    /// assert_eq!(mesh.vertex_count(), 3);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    pub fn from_raw(positions: &[f32], indices: &[u32]) -> Result<Self, MeshError> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::RaggedPositions(positions.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(indices.len()));
        }

        let vertices: Vec<Point3<f32>> = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces: Vec<[u32; 3]> = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangle faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if the mesh has no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Get the concrete triangle for a face index.
    ///
    /// Returns `None` if the face index is out of range or the face
    /// references missing vertices.
    #[must_use]
    pub fn triangle(&self, face: usize) -> Option<Triangle> {
        let [a, b, c] = *self.faces.get(face)?;
        Some(Triangle::new(
            *self.vertices.get(a as usize)?,
            *self.vertices.get(b as usize)?,
            *self.vertices.get(c as usize)?,
        ))
    }

    /// Iterate over all concrete triangles.
    ///
    /// Faces with out-of-range indices are skipped; call [`Self::validate`]
    /// first if that matters.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(move |i| self.triangle(i))
    }

    /// Compute the bounding box of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let mut bbox = Aabb::empty();
        for v in &self.vertices {
            bbox.expand_point(v);
        }
        bbox
    }

    /// Validate the mesh: at least one face, all indices in range.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Empty`] for a faceless mesh and
    /// [`MeshError::IndexOutOfRange`] for a dangling face index.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.faces.is_empty() {
            return Err(MeshError::Empty);
        }
        let vertex_count = self.vertices.len();
        for (face, idx) in self.faces.iter().enumerate() {
            for &index in idx {
                if index as usize >= vertex_count {
                    return Err(MeshError::IndexOutOfRange {
                        face,
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Create a unit cube spanning `[0, 1]³`.
///
/// 8 vertices, 12 triangles, CCW winding viewed from outside.
///
/// # Example
///
/// ```
/// use geom_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let mut mesh = IndexedMesh::with_capacity(8, 12);

    mesh.vertices.push(Point3::new(0.0, 0.0, 0.0)); // 0
    mesh.vertices.push(Point3::new(1.0, 0.0, 0.0)); // 1
    mesh.vertices.push(Point3::new(1.0, 1.0, 0.0)); // 2
    mesh.vertices.push(Point3::new(0.0, 1.0, 0.0)); // 3
    mesh.vertices.push(Point3::new(0.0, 0.0, 1.0)); // 4
    mesh.vertices.push(Point3::new(1.0, 0.0, 1.0)); // 5
    mesh.vertices.push(Point3::new(1.0, 1.0, 1.0)); // 6
    mesh.vertices.push(Point3::new(0.0, 1.0, 1.0)); // 7

    // Bottom face (z=0) - normal points -Z
    mesh.faces.push([0, 2, 1]);
    mesh.faces.push([0, 3, 2]);

    // Top face (z=1) - normal points +Z
    mesh.faces.push([4, 5, 6]);
    mesh.faces.push([4, 6, 7]);

    // Front face (y=0) - normal points -Y
    mesh.faces.push([0, 1, 5]);
    mesh.faces.push([0, 5, 4]);

    // Back face (y=1) - normal points +Y
    mesh.faces.push([3, 7, 6]);
    mesh.faces.push([3, 6, 2]);

    // Left face (x=0) - normal points -X
    mesh.faces.push([0, 4, 7]);
    mesh.faces.push([0, 7, 3]);

    // Right face (x=1) - normal points +X
    mesh.faces.push([1, 2, 6]);
    mesh.faces.push([1, 6, 5]);

    mesh
}

/// Create a horizontal rectangular plane at height `z`.
///
/// Two triangles with normals pointing +Z.
///
/// # Example
///
/// ```
/// use geom_types::plane;
///
/// let ground = plane(-5.0, -5.0, 5.0, 5.0, 0.0);
/// assert_eq!(ground.face_count(), 2);
/// ```
#[must_use]
pub fn plane(min_x: f32, min_y: f32, max_x: f32, max_y: f32, z: f32) -> IndexedMesh {
    let mut mesh = IndexedMesh::with_capacity(4, 2);
    mesh.vertices.push(Point3::new(min_x, min_y, z)); // 0
    mesh.vertices.push(Point3::new(max_x, min_y, z)); // 1
    mesh.vertices.push(Point3::new(max_x, max_y, z)); // 2
    mesh.vertices.push(Point3::new(min_x, max_y, z)); // 3
    mesh.faces.push([0, 1, 2]);
    mesh.faces.push([0, 2, 3]);
    mesh
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_round_trip() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = [0, 1, 2];
        let mesh = IndexedMesh::from_raw(&positions, &indices).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn from_raw_rejects_ragged_buffers() {
        assert!(matches!(
            IndexedMesh::from_raw(&[0.0, 0.0], &[0, 1, 2]),
            Err(MeshError::RaggedPositions(2))
        ));
        assert!(matches!(
            IndexedMesh::from_raw(&[0.0, 0.0, 0.0], &[0, 1]),
            Err(MeshError::RaggedIndices(2))
        ));
    }

    #[test]
    fn from_raw_rejects_dangling_index() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let result = IndexedMesh::from_raw(&positions, &[0, 1, 7]);
        assert!(matches!(
            result,
            Err(MeshError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn validate_empty() {
        let mesh = IndexedMesh::new();
        assert!(matches!(mesh.validate(), Err(MeshError::Empty)));
    }

    #[test]
    fn triangle_lookup() {
        let cube = unit_cube();
        assert!(cube.triangle(0).is_some());
        assert!(cube.triangle(12).is_none());
        assert_eq!(cube.triangles().count(), 12);
    }

    #[test]
    fn cube_bounds() {
        let cube = unit_cube();
        let bbox = cube.bounds();
        assert!((bbox.min.x - 0.0).abs() < 1e-6);
        assert!((bbox.max.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn plane_covers_rectangle() {
        let p = plane(-1.0, -2.0, 3.0, 4.0, 0.5);
        let bbox = p.bounds();
        assert!((bbox.min.x - -1.0).abs() < 1e-6);
        assert!((bbox.max.y - 4.0).abs() < 1e-6);
        assert!((bbox.min.z - 0.5).abs() < 1e-6);
        assert!(p.validate().is_ok());
    }
}
