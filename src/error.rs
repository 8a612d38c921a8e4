//! Error types for navgraph.

use thiserror::Error;

/// Errors raised at the boundaries of the crate: loading points, validating
/// configuration, and starting the build workers.
///
/// Queries never fail. A query that cannot fill its result returns fewer
/// neighbors instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// No points were supplied.
    #[error("point set is empty")]
    EmptyPointSet,

    /// A feature vector does not match the dataset dimension.
    #[error("dimension mismatch: expected {expected} dimensions, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The build worker pool could not be started.
    #[error("worker pool could not be started: {0}")]
    WorkerPool(String),

    /// Configuration could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<rayon::ThreadPoolBuildError> for GraphError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        GraphError::WorkerPool(err.to_string())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_details() {
        let err = GraphError::DimensionMismatch {
            expected: 8,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: expected 8 dimensions, found 3"
        );
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err: GraphError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, GraphError::Config(_)));
    }
}
