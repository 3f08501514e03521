//! Markdown Output
//!
//! One row per operation, one column per backend, followed by the
//! candidate/baseline comparison columns when both backends ran.

use crate::report::{Report, ReportSummary};

/// Generate a markdown results table
pub fn generate_markdown_report(report: &Report) -> String {
    let backends = report.backends();
    let mut out = String::new();

    out.push_str("## collbench results\n\n");
    let c = &report.meta.config;
    out.push_str(&format!(
        "best of {} batches x {} calls, {}x{} matrix, {} keys, {} partitions\n\n",
        c.batches, c.repeat, c.rows, c.cols, c.keys, c.partitions
    ));

    out.push_str("| operation |");
    for backend in &backends {
        out.push_str(&format!(" {} (ms) |", backend));
    }
    if !report.comparisons.is_empty() {
        out.push_str(" speedup | verdict |");
    }
    out.push('\n');

    out.push_str("|---|");
    for _ in &backends {
        out.push_str("---:|");
    }
    if !report.comparisons.is_empty() {
        out.push_str("---:|---|");
    }
    out.push('\n');

    for op in report.operations() {
        out.push_str(&format!("| `{}` |", op));
        for backend in &backends {
            let cell = match report.result(op, backend) {
                Some(r) => match r.best_ms {
                    Some(ms) => format!("{:.4}", ms),
                    None => "failed".to_string(),
                },
                None => "-".to_string(),
            };
            out.push_str(&format!(" {} |", cell));
        }
        if !report.comparisons.is_empty() {
            match report.comparisons.iter().find(|c| c.operation == op) {
                Some(c) => out.push_str(&format!(
                    " {:.2}x | {} |",
                    c.comparison.speedup, c.comparison.verdict
                )),
                None => out.push_str(" - | - |"),
            }
        }
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&summary_line(&report.summary));
    out
}

fn summary_line(summary: &ReportSummary) -> String {
    let mut line = format!(
        "**{}** timed, **{}** failed in {:.0} ms",
        summary.passed, summary.failed, summary.total_duration_ms
    );
    if summary.faster + summary.slower + summary.indistinguishable > 0 {
        line.push_str(&format!(
            " (candidate faster: {}, slower: {}, same: {})",
            summary.faster, summary.slower, summary.indistinguishable
        ));
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn test_markdown_table() {
        let md = generate_markdown_report(&sample_report());
        assert!(md.contains("| operation | local (ms) | dataflow (ms) | speedup | verdict |"));
        assert!(md.contains("| `sum` | 2.0000 | 0.5000 | 4.00x | faster |"));
        assert!(md.contains("| `max` | 1.5000 | failed | - | - |"));
        assert!(md.contains("**5** timed, **1** failed"));
    }
}
