//! Error types for graph generation.

use graph_core::GraphError;

/// Errors raised during walkable-graph generation.
///
/// # Example
///
/// ```
/// use graph_generate::GenerateError;
///
/// let err = GenerateError::invalid_config("spacing must be positive");
/// assert!(err.to_string().contains("spacing"));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The seed position has no ground beneath it.
    #[error("no ground found below the start position")]
    NoGround,

    /// Generation produced no surviving nodes.
    #[error("generation produced an empty graph")]
    NoGraph,

    /// The operation was cancelled; partial results were discarded.
    #[error("generation was cancelled")]
    Cancelled,

    /// The pinned worker pool could not be created.
    #[error("failed to build worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// A graph mutation failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl GenerateError {
    /// Creates an invalid-configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if generation found no usable nodes.
    ///
    /// Covers both a missing seed projection and a graph emptied by the
    /// connection filter.
    #[must_use]
    pub const fn is_no_graph(&self) -> bool {
        matches!(self, Self::NoGround | Self::NoGraph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_graph_predicate() {
        assert!(GenerateError::NoGround.is_no_graph());
        assert!(GenerateError::NoGraph.is_no_graph());
        assert!(!GenerateError::Cancelled.is_no_graph());
    }

    #[test]
    fn display_messages() {
        assert!(GenerateError::NoGround.to_string().contains("no ground"));
        assert!(GenerateError::Cancelled.to_string().contains("cancelled"));
    }
}
