//! JSON Output

use crate::report::Report;

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Parse a report previously written by [`generate_json_report`].
pub fn parse_json_report(json: &str) -> Result<Report, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::sample_report;

    #[test]
    fn test_json_keeps_results_and_comparisons() {
        let report = sample_report();
        let json = generate_json_report(&report).unwrap();
        assert!(json.contains("\"schema_version\": 1"));
        assert!(json.contains("\"verdict\": \"faster\""));

        let parsed = parse_json_report(&json).unwrap();
        assert_eq!(parsed.results.len(), report.results.len());
        assert_eq!(parsed.comparisons[0].comparison, report.comparisons[0].comparison);
        assert_eq!(parsed.durations("local"), report.durations("local"));
    }
}
