//! Human-readable Output
//!
//! Terminal output with:
//! - Results grouped by operation, one line per backend with status icon (✓/✗)
//! - Best estimate plus the spread of the batch estimates
//! - Comparison table sorted by speedup
//! - Summary counts

use crate::report::{OperationStatus, Report};
use collbench_stats::NOISY_CV_THRESHOLD;

/// Format a report for terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("collbench results\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');

    let c = &report.meta.config;
    output.push_str(&format!(
        "best of {} x {} calls | {}x{} matrix, {} keys, seed {} | {} partitions\n\n",
        c.batches, c.repeat, c.rows, c.cols, c.keys, c.seed, c.partitions
    ));

    let backend_width = report.backends().iter().map(|b| b.len()).max().unwrap_or(8);

    for op in report.operations() {
        output.push_str(&format!("{}\n", op));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for r in report.results.iter().filter(|r| r.operation == op) {
            let icon = match r.status {
                OperationStatus::Passed => "✓",
                OperationStatus::Failed => "✗",
            };

            match r.best_ms {
                Some(best) => {
                    output.push_str(&format!(
                        "  {} {:<width$}  best: {:>10.4} ms",
                        icon,
                        r.backend,
                        best,
                        width = backend_width
                    ));
                    if let Some(stats) = &r.stats {
                        output.push_str(&format!(
                            "  (median {:.4}, max {:.4}, {} batches)",
                            stats.median, stats.max, stats.sample_count
                        ));
                        if !stats.is_stable(NOISY_CV_THRESHOLD) {
                            output.push_str("  noisy");
                        }
                    }
                    output.push('\n');
                }
                None => {
                    output.push_str(&format!(
                        "  {} {:<width$}  failed\n",
                        icon,
                        r.backend,
                        width = backend_width
                    ));
                }
            }

            if let Some(failure) = &r.failure {
                output.push_str(&format!("      error: {}\n", failure.message));
            }
        }
        output.push('\n');
    }

    if let Some(first) = report.comparisons.first() {
        output.push_str(&format!("{} vs {}\n", first.candidate, first.baseline));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        let name_width = report
            .comparisons
            .iter()
            .map(|c| c.operation.len())
            .max()
            .unwrap_or(12);

        output.push_str(&format!(
            "  {:<width$}  {:>10}  {:>10}  {:>8}  {}\n",
            "operation",
            first.baseline,
            first.candidate,
            "speedup",
            "verdict",
            width = name_width
        ));

        // Fastest candidate first
        let mut sorted: Vec<_> = report.comparisons.iter().collect();
        sorted.sort_by(|a, b| {
            b.comparison
                .speedup
                .partial_cmp(&a.comparison.speedup)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for cmp in sorted {
            output.push_str(&format!(
                "  {:<width$}  {:>10.4}  {:>10.4}  {:>7.2}x  {}\n",
                cmp.operation,
                cmp.comparison.baseline_ms,
                cmp.comparison.candidate_ms,
                cmp.comparison.speedup,
                cmp.comparison.verdict,
                width = name_width
            ));
        }
        output.push('\n');
    }

    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Total: {}  Passed: {}  Failed: {}\n",
        report.summary.total, report.summary.passed, report.summary.failed
    ));
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn test_every_operation_listed() {
        let report = sample_report();
        let text = format_human_output(&report);
        for op in report.operations() {
            assert!(text.contains(op));
        }
        assert!(text.contains("error: max on an empty collection"));
        assert!(text.contains("dataflow vs local"));
        assert!(text.contains("Passed: 5  Failed: 1"));
    }

    #[test]
    fn test_comparisons_sorted_by_speedup() {
        let text = format_human_output(&sample_report());
        let table = text.split("dataflow vs local").nth(1).unwrap();
        let sum_pos = table.find("sum").unwrap();
        let collect_pos = table.find("collect").unwrap();
        assert!(sum_pos < collect_pos);
    }
}
