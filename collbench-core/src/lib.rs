#![warn(missing_docs)]
//! collbench Core - Timing Harness
//!
//! This crate provides the measurement primitive and the operation registry:
//! - `Harness`: best-of-B batches of R calls, reported in milliseconds
//! - `OperationRegistry`: named operations over one shared input
//! - `BenchmarkResults`: operation name to best duration
//! - Wall-clock timer and optional CPU pinning for stable sequential runs

mod error;
mod harness;
mod measure;
mod registry;
mod result;

pub use error::{HarnessError, OperationError};
pub use harness::{DEFAULT_BATCHES, DEFAULT_REPEAT, Harness, HarnessConfig};
pub use measure::{NANOS_PER_MILLI, Timer, nanos_to_millis, pin_to_cpu};
pub use registry::OperationRegistry;
pub use result::{BenchmarkResults, Timing};
