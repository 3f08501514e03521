//! Operation Execution
//!
//! Times every planned operation on every planned backend, one after another.
//!
//! ## Data Flow
//!
//! ```text
//!   Dataset (generated once)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ Backend::load    │  untimed, once per backend
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │ registry_for     │  name → operation over the loaded collection
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │ Harness          │  best of B batches x R calls
//! └────────┬─────────┘
//!          ▼
//!  OperationResult (best_ms, batch_ms, or failure)
//! ```

use crate::planner::ExecutionPlan;
use anyhow::Context;
use collbench_core::{Harness, HarnessConfig, pin_to_cpu};
use collbench_engine::{
    Backend, BackendKind, DataflowBackend, DataflowConfig, Dataset, DatasetConfig, LocalBackend,
    registry_for,
};
use collbench_report::OperationResult;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for a run
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Repeat and batch counts
    pub harness: HarnessConfig,
    /// Matrix shape and seed
    pub dataset: DatasetConfig,
    /// Dataflow worker pool
    pub dataflow: DataflowConfig,
    /// Record failures and continue instead of aborting
    pub keep_going: bool,
    /// Pin the measuring thread to this core
    pub pin_cpu: Option<usize>,
    /// Tolerance band for backend comparisons (percent)
    pub tolerance_pct: f64,
    /// Draw a progress bar on stderr
    pub progress: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            harness: HarnessConfig::default(),
            dataset: DatasetConfig::default(),
            dataflow: DataflowConfig::default(),
            keep_going: false,
            pin_cpu: None,
            tolerance_pct: collbench_stats::DEFAULT_TOLERANCE_PCT,
            progress: true,
        }
    }
}

/// Runs a plan against one dataset
pub struct Executor {
    config: ExecutionConfig,
    harness: Harness,
}

impl Executor {
    /// Create an executor, rejecting invalid harness settings
    pub fn new(config: ExecutionConfig) -> anyhow::Result<Self> {
        let harness = Harness::new(config.harness)?;
        Ok(Self { config, harness })
    }

    /// Configuration in use
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Execute the plan.
    ///
    /// Without `keep_going` the first failing operation aborts the run with
    /// its error. With it, failures are recorded and the run continues.
    pub fn execute(
        &self,
        dataset: &Dataset,
        plan: &ExecutionPlan,
    ) -> anyhow::Result<Vec<OperationResult>> {
        if let Some((cpu, Err(e))) = self.config.pin_cpu.map(|cpu| (cpu, pin_to_cpu(cpu))) {
            warn!(cpu, error = %e, "failed to pin measuring thread");
        }

        let pb = self.progress_bar(plan.len() as u64);
        let mut results = Vec::with_capacity(plan.len());

        for kind in &plan.backends {
            let batch = match kind {
                BackendKind::Local => {
                    self.execute_backend(Arc::new(LocalBackend::new()), dataset, plan, &pb)?
                }
                BackendKind::Dataflow => {
                    let backend = DataflowBackend::new(&self.config.dataflow)
                        .context("failed to start dataflow backend")?;
                    info!(
                        partitions = backend.partitions(),
                        threads = backend.threads(),
                        "dataflow backend ready"
                    );
                    self.execute_backend(Arc::new(backend), dataset, plan, &pb)?
                }
            };
            results.extend(batch);
        }

        pb.finish_with_message("Complete");
        Ok(results)
    }

    fn execute_backend<B: Backend>(
        &self,
        backend: Arc<B>,
        dataset: &Dataset,
        plan: &ExecutionPlan,
        pb: &ProgressBar,
    ) -> anyhow::Result<Vec<OperationResult>> {
        let kind = backend.kind();
        let input = backend
            .load(dataset)
            .with_context(|| format!("failed to load dataset into {kind} backend"))?;
        let registry = registry_for(backend)?;

        let mut results = Vec::with_capacity(plan.operations.len());
        for op in &plan.operations {
            pb.set_message(format!("{kind}/{op}"));

            match registry.time(op.name(), &input, &self.harness) {
                Ok(timing) => {
                    results.push(OperationResult::passed(
                        op.name(),
                        kind.name(),
                        timing.best_ms,
                        timing.batch_ms,
                    ));
                }
                Err(e) if self.config.keep_going => {
                    let message = format!("{:#}", anyhow::Error::new(e));
                    warn!(
                        backend = %kind,
                        operation = %op,
                        error = %message,
                        "skipping failed operation"
                    );
                    results.push(OperationResult::failed(op.name(), kind.name(), message));
                }
                Err(e) => {
                    pb.abandon();
                    return Err(anyhow::Error::new(e).context(format!("{kind} backend")));
                }
            }
            pb.inc(1);
        }
        Ok(results)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}
