#![warn(missing_docs)]
//! # collbench
//!
//! Compare collection operations across execution backends with a
//! best-of-batches micro-benchmark harness.
//!
//! collbench provides:
//! - **Harness**: run an operation R times per batch, B batches, report the
//!   smallest per-call estimate in milliseconds
//! - **Operation Registry**: named operations over one shared input, timed in one call
//! - **Backends**: a sequential local collection and a partitioned dataflow
//!   collection with hash shuffles, both implementing `sum`, `max`, `filter`,
//!   `map`, `collect`, `reduce_by_key` and `group_by_key`
//! - **Reports**: human, JSON, markdown and CSV output plus an ASCII bar chart
//!
//! ## Quick Start
//!
//! ```no_run
//! use collbench::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dataset = Dataset::generate(&DatasetConfig::default())?;
//! let backend = Arc::new(LocalBackend::new());
//! let input = backend.load(&dataset)?;
//!
//! let results = registry_for(backend)?.time_all(&input, &Harness::default())?;
//! for (name, ms) in results.durations() {
//!     println!("{name}: {ms:.4} ms");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Operations
//!
//! ```
//! use collbench::{Harness, OperationRegistry};
//! use std::convert::Infallible;
//!
//! let mut registry = OperationRegistry::<Vec<u64>>::new();
//! registry
//!     .register("sum", |v: &Vec<u64>| Ok::<_, Infallible>(v.iter().sum::<u64>()))
//!     .unwrap();
//!
//! let data: Vec<u64> = (0..1_000).collect();
//! let results = registry.time_all(&data, &Harness::default()).unwrap();
//! assert!(results.best_ms("sum").unwrap() >= 0.0);
//! ```

// Re-export core types
pub use collbench_core::{
    BenchmarkResults, DEFAULT_BATCHES, DEFAULT_REPEAT, Harness, HarnessConfig, HarnessError,
    OperationError, OperationRegistry, Timer, Timing,
};

// Re-export engine types
pub use collbench_engine::{
    Backend, BackendKind, DataflowBackend, DataflowConfig, Dataset, DatasetConfig, EngineError,
    LocalBackend, LocalCollection, Operation, Record, registry_for,
};

// Re-export stats
pub use collbench_stats::{
    BackendComparison, SummaryStatistics, Verdict, compare_backends, compute_summary,
};

// Re-export report
pub use collbench_report::{OutputFormat, Report, render, render_bar_chart};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Backend, BackendKind, DataflowBackend, DataflowConfig, Dataset, DatasetConfig, Harness,
        HarnessConfig, LocalBackend, Operation, OperationRegistry, registry_for,
    };
}

/// Run the collbench CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     collbench::run()
/// }
/// ```
pub use collbench_cli::run;
