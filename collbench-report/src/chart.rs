//! ASCII Bar Chart
//!
//! Horizontal bars of the best estimate per operation and backend, scaled
//! to the slowest successful result.

use crate::report::Report;

const BAR_CHAR: char = '#';

/// Render one bar per operation and backend, `width` characters for the longest bar
pub fn render_bar_chart(report: &Report, width: usize) -> String {
    let width = width.max(1);
    let rows: Vec<(String, Option<f64>)> = report
        .operations()
        .into_iter()
        .flat_map(move |op| {
            report
                .results
                .iter()
                .filter(move |r| r.operation == op)
                .map(|r| (format!("{} [{}]", r.operation, r.backend), r.best_ms))
        })
        .collect();

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let peak = rows
        .iter()
        .filter_map(|(_, ms)| *ms)
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (label, ms) in &rows {
        match ms {
            Some(ms) => {
                let len = if peak > 0.0 {
                    ((ms / peak) * width as f64).round() as usize
                } else {
                    0
                };
                // Non-zero results always get at least one mark
                let len = if *ms > 0.0 { len.max(1) } else { len };
                out.push_str(&format!(
                    "{:<lw$} |{:<w$}| {:.4} ms\n",
                    label,
                    BAR_CHAR.to_string().repeat(len),
                    ms,
                    lw = label_width,
                    w = width
                ));
            }
            None => {
                out.push_str(&format!(
                    "{:<lw$} |{:<w$}| failed\n",
                    label,
                    "",
                    lw = label_width,
                    w = width
                ));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn test_longest_bar_is_slowest() {
        let chart = render_bar_chart(&sample_report(), 20);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 6);

        let slowest = lines.iter().find(|l| l.starts_with("collect [dataflow]")).unwrap();
        assert_eq!(slowest.matches('#').count(), 20);

        let fastest = lines.iter().find(|l| l.starts_with("sum [dataflow]")).unwrap();
        assert!(fastest.matches('#').count() >= 1);
        assert!(fastest.matches('#').count() < 20);
    }

    #[test]
    fn test_failed_rows_have_no_bar() {
        let chart = render_bar_chart(&sample_report(), 10);
        let failed = chart.lines().find(|l| l.contains("max [dataflow]")).unwrap();
        assert!(failed.ends_with("failed"));
        assert_eq!(failed.matches('#').count(), 0);
    }
}
