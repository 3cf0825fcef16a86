//! Error types for pathfinding.

use graph_core::GraphError;

/// Errors raised by shortest-path searches.
///
/// An unreachable destination is **not** an error; searches report it as
/// `Ok(None)`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RouteError {
    /// The starts and ends of a paired search differ in length.
    #[error("paired search needs equal counts: {starts} starts, {ends} ends")]
    ShapeMismatch {
        /// Number of start ids given.
        starts: usize,
        /// Number of end ids given.
        ends: usize,
    },

    /// The chosen layer contains a negative edge weight.
    #[error("negative weight {weight} on edge {parent} -> {child}")]
    NegativeWeight {
        /// Parent id of the offending edge.
        parent: u32,
        /// Child id of the offending edge.
        child: u32,
        /// The negative weight.
        weight: f32,
    },

    /// The batch was cancelled; partial results were discarded.
    #[error("path search was cancelled")]
    Cancelled,

    /// The graph rejected the request (uncompressed, unknown layer, or
    /// unknown node id).
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = RouteError::ShapeMismatch { starts: 3, ends: 2 };
        assert!(err.to_string().contains("3 starts"));

        let err = RouteError::NegativeWeight {
            parent: 1,
            child: 2,
            weight: -0.5,
        };
        assert!(err.to_string().contains("-0.5"));
        assert!(err.to_string().contains("1 -> 2"));
    }
}
