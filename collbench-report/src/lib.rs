#![warn(missing_docs)]
//! collbench Report - Output Formats
//!
//! Turns a finished run into:
//! - Human-readable terminal output
//! - JSON (machine-readable, round-trips)
//! - Markdown table (operations x backends)
//! - CSV (spreadsheet-compatible)
//! - ASCII bar chart

mod chart;
mod csv;
mod human;
mod json;
mod markdown;
mod report;

pub use chart::render_bar_chart;
pub use csv::generate_csv_report;
pub use human::format_human_output;
pub use json::{generate_json_report, parse_json_report};
pub use markdown::generate_markdown_report;
pub use report::{
    ComparisonResult, FailureInfo, OperationResult, OperationStatus, Report, ReportConfig,
    ReportMeta, ReportSummary, SCHEMA_VERSION, SystemInfo,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// JSON with full schema
    Json,
    /// Markdown table
    Markdown,
    /// CSV for spreadsheets
    Csv,
}

impl OutputFormat {
    /// File extension for reports written in this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Human => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render `report` in `format`
pub fn render(report: &Report, format: OutputFormat) -> Result<String, serde_json::Error> {
    Ok(match format {
        OutputFormat::Human => format_human_output(report),
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Markdown => generate_markdown_report(report),
        OutputFormat::Csv => generate_csv_report(report),
    })
}
