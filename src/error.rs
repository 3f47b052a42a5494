//! Error taxonomy for index construction and queries.
//!
//! No variant is fatal: every error is local to a single build or query
//! call. `UnknownCluster` in particular is recoverable and signals that the
//! caller holds a handle from a previous build and should refresh.

use thiserror::Error;

/// Errors produced by index construction and queries.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// A point had malformed coordinates at build time.
    #[error("invalid point: {0}")]
    InvalidPoint(String),

    /// A cluster id that was not minted by this index.
    #[error("unknown cluster id: {0}")]
    UnknownCluster(usize),

    /// A query whose zoom or bounding box is not representable after
    /// best-effort clamping.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClusterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClusterError::UnknownCluster(42);
        assert_eq!(err.to_string(), "unknown cluster id: 42");

        let err = ClusterError::InvalidPoint("longitude out of range".into());
        assert!(err.to_string().contains("longitude out of range"));
    }
}
