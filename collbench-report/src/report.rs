//! Report Data Structures

use chrono::{DateTime, Utc};
use collbench_stats::{BackendComparison, SummaryStatistics, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete benchmark report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// One entry per operation and backend, in run order
    pub results: Vec<OperationResult>,
    /// Candidate backend against baseline, per operation
    pub comparisons: Vec<ComparisonResult>,
    /// Counts and total run time
    pub summary: ReportSummary,
}

impl Report {
    /// Result for one operation on one backend
    pub fn result(&self, operation: &str, backend: &str) -> Option<&OperationResult> {
        self.results
            .iter()
            .find(|r| r.operation == operation && r.backend == backend)
    }

    /// Operation name to best duration (ms) for one backend, successful runs only
    pub fn durations(&self, backend: &str) -> BTreeMap<&str, f64> {
        self.results
            .iter()
            .filter(|r| r.backend == backend)
            .filter_map(|r| r.best_ms.map(|ms| (r.operation.as_str(), ms)))
            .collect()
    }

    /// Distinct operation names, in first-seen order
    pub fn operations(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for r in &self.results {
            if !seen.contains(&r.operation.as_str()) {
                seen.push(r.operation.as_str());
            }
        }
        seen
    }

    /// Distinct backend names, in first-seen order
    pub fn backends(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for r in &self.results {
            if !seen.contains(&r.backend.as_str()) {
                seen.push(r.backend.as_str());
            }
        }
        seen
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report schema version
    pub schema_version: u32,
    /// collbench version that produced the report
    pub version: String,
    /// Generation time
    pub timestamp: DateTime<Utc>,
    /// Host description
    pub system: SystemInfo,
    /// Settings the run used
    pub config: ReportConfig,
}

/// Run settings captured in report metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Calls per batch
    pub repeat: u32,
    /// Batches per operation
    pub batches: u32,
    /// Matrix rows
    pub rows: usize,
    /// Matrix columns
    pub cols: usize,
    /// Distinct keys
    pub keys: usize,
    /// Dataset seed
    pub seed: u64,
    /// Dataflow partitions
    pub partitions: usize,
    /// Dataflow worker threads (0 = all cores)
    pub threads: usize,
    /// Tolerance band for comparisons (percent)
    pub tolerance_pct: f64,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// CPU model name
    pub cpu: String,
    /// Logical cores
    pub cpu_cores: u32,
    /// Total memory in GB
    pub memory_gb: f64,
}

/// Outcome of timing one operation on one backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    /// Timed successfully
    Passed,
    /// The operation returned an error
    Failed,
}

/// Timing of one operation on one backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    /// Operation name
    pub operation: String,
    /// Backend name
    pub backend: String,
    /// Whether timing succeeded
    pub status: OperationStatus,
    /// Best per-call estimate in milliseconds, absent on failure
    pub best_ms: Option<f64>,
    /// Per-call estimate of each batch
    #[serde(default)]
    pub batch_ms: Vec<f64>,
    /// Spread of the batch estimates
    pub stats: Option<SummaryStatistics>,
    /// Error details on failure
    pub failure: Option<FailureInfo>,
}

impl OperationResult {
    /// Successful timing
    pub fn passed(
        operation: impl Into<String>,
        backend: impl Into<String>,
        best_ms: f64,
        batch_ms: Vec<f64>,
    ) -> Self {
        let stats = (!batch_ms.is_empty()).then(|| collbench_stats::compute_summary(&batch_ms));
        Self {
            operation: operation.into(),
            backend: backend.into(),
            status: OperationStatus::Passed,
            best_ms: Some(best_ms),
            batch_ms,
            stats,
            failure: None,
        }
    }

    /// Failed timing
    pub fn failed(
        operation: impl Into<String>,
        backend: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            backend: backend.into(),
            status: OperationStatus::Failed,
            best_ms: None,
            batch_ms: Vec::new(),
            stats: None,
            failure: Some(FailureInfo {
                message: message.into(),
            }),
        }
    }
}

/// Failure information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Error chain rendered as text
    pub message: String,
}

/// Baseline vs candidate for one operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Operation name
    pub operation: String,
    /// Baseline backend name
    pub baseline: String,
    /// Candidate backend name
    pub candidate: String,
    /// Speedup, relative change and verdict
    #[serde(flatten)]
    pub comparison: BackendComparison,
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Operation/backend pairs attempted
    pub total: usize,
    /// Pairs timed successfully
    pub passed: usize,
    /// Pairs that failed
    pub failed: usize,
    /// Comparisons where the candidate was faster
    pub faster: usize,
    /// Comparisons where the candidate was slower
    pub slower: usize,
    /// Comparisons within the tolerance band
    pub indistinguishable: usize,
    /// Wall-clock time of the whole run
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Tally results and comparison verdicts
    pub fn tally(
        results: &[OperationResult],
        comparisons: &[ComparisonResult],
        total_duration_ms: f64,
    ) -> Self {
        let mut summary = Self {
            total: results.len(),
            total_duration_ms,
            ..Default::default()
        };
        for r in results {
            match r.status {
                OperationStatus::Passed => summary.passed += 1,
                OperationStatus::Failed => summary.failed += 1,
            }
        }
        for c in comparisons {
            match c.comparison.verdict {
                Verdict::Faster => summary.faster += 1,
                Verdict::Slower => summary.slower += 1,
                Verdict::Indistinguishable => summary.indistinguishable += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use collbench_stats::compare_backends;

    pub fn sample_report() -> Report {
        let results = vec![
            OperationResult::passed("sum", "local", 2.0, vec![2.5, 2.0, 2.2]),
            OperationResult::passed("sum", "dataflow", 0.5, vec![0.6, 0.5, 0.7]),
            OperationResult::passed("collect", "local", 1.0, vec![1.0, 1.1, 1.2]),
            OperationResult::passed("collect", "dataflow", 4.0, vec![4.0, 4.4, 4.1]),
            OperationResult::passed("max", "local", 1.5, vec![1.5]),
            OperationResult::failed("max", "dataflow", "max on an empty collection"),
        ];
        let comparisons = vec![
            ComparisonResult {
                operation: "sum".to_string(),
                baseline: "local".to_string(),
                candidate: "dataflow".to_string(),
                comparison: compare_backends(2.0, 0.5, 5.0).unwrap(),
            },
            ComparisonResult {
                operation: "collect".to_string(),
                baseline: "local".to_string(),
                candidate: "dataflow".to_string(),
                comparison: compare_backends(1.0, 4.0, 5.0).unwrap(),
            },
        ];
        let summary = ReportSummary::tally(&results, &comparisons, 123.0);

        Report {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                system: SystemInfo {
                    os: "linux".to_string(),
                    arch: "x86_64".to_string(),
                    cpu: "Test CPU".to_string(),
                    cpu_cores: 8,
                    memory_gb: 16.0,
                },
                config: ReportConfig {
                    repeat: 3,
                    batches: 3,
                    rows: 100,
                    cols: 10,
                    keys: 5,
                    seed: 42,
                    partitions: 4,
                    threads: 0,
                    tolerance_pct: 5.0,
                },
            },
            results,
            comparisons,
            summary,
        }
    }
}
