//! CSV Output

use crate::report::Report;

const HEADER: &str = "operation,backend,status,best_ms,mean_ms,median_ms,std_dev_ms,min_ms,max_ms,batches,error";

/// Generate a CSV with one row per operation and backend
pub fn generate_csv_report(report: &Report) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for r in &report.results {
        let status = match r.status {
            crate::report::OperationStatus::Passed => "passed",
            crate::report::OperationStatus::Failed => "failed",
        };
        let best = r.best_ms.map(|v| v.to_string()).unwrap_or_default();
        let stats = match &r.stats {
            Some(s) => format!(
                "{},{},{},{},{}",
                s.mean, s.median, s.std_dev, s.min, s.max
            ),
            None => ",,,,".to_string(),
        };
        let error = r
            .failure
            .as_ref()
            .map(|f| escape(&f.message))
            .unwrap_or_default();

        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            escape(&r.operation),
            escape(&r.backend),
            status,
            best,
            stats,
            r.batch_ms.len(),
            error
        ));
    }
    out
}

/// Quote a field when it contains a delimiter, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn test_one_row_per_result() {
        let report = sample_report();
        let csv = generate_csv_report(&report);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], HEADER);
        assert_eq!(lines.len(), report.results.len() + 1);
        for line in &lines {
            assert_eq!(line.matches(',').count(), 10);
        }
        assert!(lines[1].starts_with("sum,local,passed,2,"));
        assert!(lines[6].starts_with("max,dataflow,failed,,"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
