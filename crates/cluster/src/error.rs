//! Clustering error types.

/// Error type for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors that can occur while fitting or assigning clusters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClusterError {
    /// Reference population smaller than the number of groups requested
    #[error("insufficient data: need at least {required} reference points, got {actual}")]
    InsufficientData {
        /// Points required (the configured k)
        required: usize,
        /// Points supplied
        actual: usize,
    },

    /// Configuration values that make clustering undefined
    #[error("invalid cluster configuration: {0}")]
    InvalidConfig(String),

    /// NaN or infinite score in the input
    #[error("non-finite score in {0}")]
    NonFinite(String),
}

impl ClusterError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
