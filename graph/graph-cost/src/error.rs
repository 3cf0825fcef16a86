//! Error type for cost-layer derivation.

use graph_core::GraphError;

/// Errors raised while deriving a cost layer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CostError {
    /// The underlying graph rejected the operation (uncompressed graph,
    /// invalid weight, or a topology violation).
    #[error(transparent)]
    Graph(#[from] GraphError),
}
