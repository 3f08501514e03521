//! Engine Errors

/// Errors raised while building datasets or running backend operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A partitioned collection or partitioner needs at least one partition
    #[error("partition count must be at least 1")]
    InvalidPartitions,

    /// Dataset shape or contents are unusable
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// An action that needs at least one element ran on an empty collection
    #[error("{operation} on an empty collection")]
    EmptyCollection {
        /// Action that failed
        operation: &'static str,
    },

    /// Backend name not recognised
    #[error("unknown backend '{0}' (expected local or dataflow)")]
    UnknownBackend(String),

    /// The worker pool could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
