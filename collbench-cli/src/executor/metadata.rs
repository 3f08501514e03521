//! System Metadata Collection
//!
//! Collects system information for report metadata.
//!
//! ## Collected Data
//!
//! - **OS**: Operating system name and architecture
//! - **CPU**: Model name and core count
//! - **Memory**: Total system RAM in GB
//! - **Timestamp**: UTC time of report generation
//!
//! Linux-specific data (CPU model, memory) degrades on other platforms to
//! "Unknown" or 0 values.

use super::execution::ExecutionConfig;
use chrono::Utc;
use collbench_report::{ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo};

/// Build report metadata including system info and run settings
pub fn build_report_meta(config: &ExecutionConfig) -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
        memory_gb: get_memory_gb().unwrap_or(0.0),
    };

    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system,
        config: ReportConfig {
            repeat: config.harness.repeat,
            batches: config.harness.batches,
            rows: config.dataset.rows,
            cols: config.dataset.cols,
            keys: config.dataset.keys,
            seed: config.dataset.seed,
            partitions: config.dataflow.partitions,
            threads: config.dataflow.threads,
            tolerance_pct: config.tolerance_pct,
        },
    }
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

/// Get total system memory in GB (Linux only)
fn get_memory_gb() -> Option<f64> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("MemTotal"))
                    .and_then(|l| {
                        l.split_whitespace()
                            .nth(1)
                            .and_then(|s| s.parse::<u64>().ok())
                    })
                    .map(|kb| kb as f64 / 1024.0 / 1024.0)
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_captures_settings() {
        let config = ExecutionConfig::default();
        let meta = build_report_meta(&config);
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        assert_eq!(meta.config.repeat, config.harness.repeat);
        assert_eq!(meta.config.rows, config.dataset.rows);
        assert!(meta.system.cpu_cores >= 1);
        assert!(!meta.system.os.is_empty());
    }
}
