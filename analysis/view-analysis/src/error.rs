//! Error types for view analysis.

/// Errors raised by view-analysis requests.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ViewError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The field-of-view clamp discarded every direction.
    #[error("field of view leaves no directions to cast")]
    EmptyBundle,
}

impl ViewError {
    /// Creates an invalid-configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
