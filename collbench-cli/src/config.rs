//! Configuration loading from collbench.toml
//!
//! collbench configuration can be specified in a `collbench.toml` file in the
//! project root. The configuration is discovered by walking up from the current
//! directory. Command line flags override file values.

use collbench_core::{DEFAULT_BATCHES, DEFAULT_REPEAT, HarnessConfig, HarnessError};
use collbench_engine::{DataflowConfig, DatasetConfig};
use collbench_stats::DEFAULT_TOLERANCE_PCT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name looked up during discovery
pub const CONFIG_FILE: &str = "collbench.toml";

/// collbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CollbenchConfig {
    /// Harness and failure policy
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Generated matrix
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Dataflow worker pool
    #[serde(default)]
    pub dataflow: DataflowConfig,
    /// Report output
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Calls per timed batch
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    /// Independent batches per operation
    #[serde(default = "default_batches")]
    pub batches: u32,
    /// Record failed operations and continue instead of aborting
    #[serde(default)]
    pub keep_going: bool,
    /// Pin the measuring thread to this core
    #[serde(default)]
    pub pin_cpu: Option<usize>,
    /// Percent difference under which two backends count as equal
    #[serde(default = "default_tolerance")]
    pub tolerance_pct: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            repeat: default_repeat(),
            batches: default_batches(),
            keep_going: false,
            pin_cpu: None,
            tolerance_pct: default_tolerance(),
        }
    }
}

impl RunnerConfig {
    /// Validated harness settings
    pub fn harness_config(&self) -> Result<HarnessConfig, HarnessError> {
        HarnessConfig::new(self.repeat, self.batches)
    }
}

fn default_repeat() -> u32 {
    DEFAULT_REPEAT
}
fn default_batches() -> u32 {
    DEFAULT_BATCHES
}
fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE_PCT
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "markdown", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Output directory for reports written with `--save`
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Append an ASCII bar chart to human output
    #[serde(default = "default_chart")]
    pub chart: bool,
    /// Width of the longest bar
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: default_output_dir(),
            chart: default_chart(),
            chart_width: default_chart_width(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_output_dir() -> String {
    "target/collbench".to_string()
}
fn default_chart() -> bool {
    true
}
fn default_chart_width() -> usize {
    40
}

impl CollbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<(PathBuf, Self)> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Walk up from `start` looking for a config file
    pub fn discover_from(start: &Path) -> Option<(PathBuf, Self)> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some((config_path, config)),
                    Err(e) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            error = %format!("{e:#}"),
                            "ignoring config"
                        );
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# collbench configuration

[runner]
# Calls per timed batch (R)
repeat = 3
# Independent batches per operation (B); the best batch is reported
batches = 3
# Record failed operations and continue instead of aborting the run
keep_going = false
# Pin the measuring thread to a core (uncomment to enable)
# pin_cpu = 0
# Percent difference under which two backends count as equal
tolerance_pct = 5.0

[dataset]
rows = 10000
cols = 100
# Distinct keys for reduce_by_key / group_by_key
keys = 100
seed = 42

[dataflow]
# Partitions per collection (defaults to the number of cores)
# partitions = 8
# Worker threads, 0 = one per core
threads = 0

[output]
# Default output format: human, json, markdown, csv
format = "human"
# Output directory for saved reports
directory = "target/collbench"
# Append an ASCII bar chart to human output
chart = true
chart_width = 40
"#
        .to_string()
    }
}
