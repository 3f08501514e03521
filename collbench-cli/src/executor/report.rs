//! Report Building
//!
//! Turns execution results into a complete report: metadata, per-backend
//! comparisons and summary counts.
//!
//! ```text
//! Vec<OperationResult>
//!          │
//!          ▼
//!   ┌──────────────┐
//!   │ comparisons  │  candidate vs baseline per operation, both must pass
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐
//!   │   Report     │  ready for human/JSON/markdown/CSV output
//!   └──────────────┘
//! ```

use super::execution::ExecutionConfig;
use super::metadata::build_report_meta;
use collbench_engine::BackendKind;
use collbench_report::{ComparisonResult, OperationResult, Report, ReportSummary};
use collbench_stats::{ComparisonError, compare_backends};

/// Build a complete report from execution results
pub fn build_report(
    results: Vec<OperationResult>,
    config: &ExecutionConfig,
    total_duration_ms: f64,
) -> Result<Report, ComparisonError> {
    let comparisons = build_comparisons(
        &results,
        BackendKind::Local.name(),
        BackendKind::Dataflow.name(),
        config.tolerance_pct,
    )?;
    let summary = ReportSummary::tally(&results, &comparisons, total_duration_ms);

    Ok(Report {
        meta: build_report_meta(config),
        results,
        comparisons,
        summary,
    })
}

/// Compare `candidate` against `baseline` for every operation that passed on both.
///
/// Operations missing or failed on either side are skipped; an invalid
/// duration or tolerance is an error.
pub fn build_comparisons(
    results: &[OperationResult],
    baseline: &str,
    candidate: &str,
    tolerance_pct: f64,
) -> Result<Vec<ComparisonResult>, ComparisonError> {
    let mut comparisons = Vec::new();
    for base in results.iter().filter(|r| r.backend == baseline) {
        let Some(base_ms) = base.best_ms else {
            continue;
        };
        let Some(cand_ms) = results
            .iter()
            .find(|r| r.backend == candidate && r.operation == base.operation)
            .and_then(|r| r.best_ms)
        else {
            continue;
        };

        comparisons.push(ComparisonResult {
            operation: base.operation.clone(),
            baseline: baseline.to_string(),
            candidate: candidate.to_string(),
            comparison: compare_backends(base_ms, cand_ms, tolerance_pct)?,
        });
    }
    Ok(comparisons)
}
