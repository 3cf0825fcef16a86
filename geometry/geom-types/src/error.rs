//! Error types for mesh construction and validation.

/// Errors raised when constructing or validating an [`IndexedMesh`].
///
/// [`IndexedMesh`]: crate::IndexedMesh
///
/// # Example
///
/// ```
/// use geom_types::IndexedMesh;
///
/// // Index buffer length must be a multiple of 3
/// let result = IndexedMesh::from_raw(&[0.0, 0.0, 0.0], &[0, 0]);
/// assert!(result.is_err());
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MeshError {
    /// The flat position buffer length is not a multiple of 3.
    #[error("position buffer length {0} is not a multiple of 3")]
    RaggedPositions(usize),

    /// The flat index buffer length is not a multiple of 3.
    #[error("index buffer length {0} is not a multiple of 3")]
    RaggedIndices(usize),

    /// A face references a vertex beyond the vertex buffer.
    #[error("face {face} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// The mesh contains no triangles.
    #[error("mesh contains no triangles")]
    Empty,
}

impl MeshError {
    /// Returns `true` if this error indicates an empty mesh.
    #[must_use]
    pub const fn is_empty_mesh(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = MeshError::IndexOutOfRange {
            face: 2,
            index: 9,
            vertex_count: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("face 2"));
        assert!(msg.contains("vertex 9"));

        assert!(MeshError::Empty.to_string().contains("no triangles"));
        assert!(MeshError::Empty.is_empty_mesh());
        assert!(!err.is_empty_mesh());
    }
}
