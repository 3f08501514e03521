//! Run Executor
//!
//! Times the planned operations and assembles the report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ExecutionPlan + Dataset
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Load per backend, time each operation
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Comparisons, summary, metadata
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Sequential timing with the failure policy
//! - [`report`] - Report building and backend comparisons
//! - [`metadata`] - System metadata collection

mod execution;
mod metadata;
mod report;

pub use execution::{ExecutionConfig, Executor};
pub use metadata::build_report_meta;
pub use report::{build_comparisons, build_report};
