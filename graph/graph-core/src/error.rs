//! Error types for graph operations.

/// Errors raised by [`Graph`] operations.
///
/// [`Graph`]: crate::Graph
///
/// # Example
///
/// ```
/// use graph_core::{Graph, GraphError};
/// use geom_types::Point3;
///
/// let mut graph = Graph::new();
/// let result = graph.add_edge(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     f32::NAN,
/// );
/// assert!(matches!(result, Err(GraphError::InvalidWeight(_))));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    /// The weight is NaN or infinite and cannot enter a cost table.
    #[error("invalid edge weight {0}")]
    InvalidWeight(f32),

    /// The graph has staged edges and must be compressed before querying.
    #[error("graph requires compression before queries")]
    Uncompressed,

    /// No node exists at the given position (under the graph tolerance).
    #[error("no node at position ({x}, {y}, {z})")]
    NodeNotFound {
        /// X coordinate of the missing position.
        x: f32,
        /// Y coordinate of the missing position.
        y: f32,
        /// Z coordinate of the missing position.
        z: f32,
    },

    /// The id was never assigned by this graph.
    #[error("node id {0} is out of range")]
    UnknownId(u32),

    /// No cost layer with this name is attached.
    #[error("unknown cost layer {0:?}")]
    UnknownLayer(String),

    /// A cost-layer edge has no counterpart in the default layer.
    #[error("edge {parent} -> {child} does not exist in the default layer")]
    NoSuchEdge {
        /// Parent id of the offending edge.
        parent: u32,
        /// Child id of the offending edge.
        child: u32,
    },

    /// Paired input arrays differ in length.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch {
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        actual: usize,
    },

    /// The empty layer name is reserved for the default distance layer.
    #[error("the empty layer name is reserved for the default layer")]
    ReservedLayer,

    /// Two input nodes collapse to one position under the tolerance.
    #[error("node {index} duplicates an earlier node under the graph tolerance")]
    DuplicateNode {
        /// Index of the duplicate node in the input.
        index: usize,
    },
}

impl GraphError {
    /// Returns `true` if this error reports an uncompressed graph.
    #[must_use]
    pub const fn is_uncompressed(&self) -> bool {
        matches!(self, Self::Uncompressed)
    }
}
