#![warn(missing_docs)]
//! collbench Engine - Collection Backends
//!
//! Two execution models for the same seven collection operations:
//! - `LocalBackend`: sequential pipelines over one `Vec`
//! - `DataflowBackend`: partitions processed on a rayon worker pool, with a
//!   hash shuffle for by-key operations
//!
//! Plus the reproducible random matrix both backends load, and
//! [`registry_for`] which binds the operation set to a backend.

mod backend;
mod dataflow;
mod dataset;
mod error;
mod local;
mod operations;

pub use backend::{
    Backend, BackendKind, DataflowBackend, FILTER_THRESHOLD, LocalBackend, MAP_FACTOR,
};
pub use dataflow::{DataflowConfig, DataflowContext, HashPartitioner, PartitionedCollection};
pub use dataset::{Dataset, DatasetConfig, Record};
pub use error::EngineError;
pub use local::LocalCollection;
pub use operations::{Operation, registry_for};
