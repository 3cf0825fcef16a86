//! Error types for scene construction.

use geom_types::MeshError;

/// Errors raised when building a ray-tracing [`Scene`].
///
/// [`Scene`]: crate::Scene
///
/// # Example
///
/// ```
/// use trace_bvh::{Scene, TraceError};
///
/// let result = Scene::build(&[]);
/// assert!(matches!(result, Err(TraceError::EmptyScene)));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TraceError {
    /// A mesh failed validation (dangling indices or no triangles).
    #[error("mesh {mesh} is invalid")]
    InvalidMesh {
        /// Index of the offending mesh in the build input.
        mesh: usize,
        /// The underlying validation failure.
        #[source]
        source: MeshError,
    },

    /// The scene contains no triangles at all.
    #[error("scene contains no triangles")]
    EmptyScene,
}

impl TraceError {
    /// Returns `true` if this error indicates an empty scene.
    #[must_use]
    pub const fn is_empty_scene(&self) -> bool {
        matches!(self, Self::EmptyScene)
    }
}
