//! Timing Results

use crate::error::HarnessError;
use crate::harness::HarnessConfig;
use std::collections::BTreeMap;

/// Harness output for one operation
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    /// Smallest per-call estimate across batches, in milliseconds
    pub best_ms: f64,
    /// Per-call estimate of each batch, in run order
    pub batch_ms: Vec<f64>,
    /// Calls per batch used for this measurement
    pub repeat: u32,
    /// Number of batches used for this measurement
    pub batches: u32,
}

impl Timing {
    /// Build a timing from per-batch estimates.
    ///
    /// `best_ms` is the minimum batch estimate, or `0.0` for no batches.
    pub fn from_batches(config: HarnessConfig, batch_ms: Vec<f64>) -> Self {
        let best_ms = batch_ms
            .iter()
            .copied()
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(0.0)
            .max(0.0);

        Self {
            best_ms,
            batch_ms,
            repeat: config.repeat,
            batches: config.batches,
        }
    }
}

/// Operation name to timing, for every operation that was timed.
///
/// Built once after timing completes and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkResults {
    timings: BTreeMap<String, Timing>,
}

impl FromIterator<(String, Timing)> for BenchmarkResults {
    fn from_iter<T: IntoIterator<Item = (String, Timing)>>(iter: T) -> Self {
        Self {
            timings: iter.into_iter().collect(),
        }
    }
}

impl BenchmarkResults {
    /// Timing for an operation
    pub fn get(&self, name: &str) -> Option<&Timing> {
        self.timings.get(name)
    }

    /// Best per-call estimate for an operation, in milliseconds
    pub fn best_ms(&self, name: &str) -> Option<f64> {
        self.timings.get(name).map(|t| t.best_ms)
    }

    /// Name to best duration in milliseconds, sorted by name
    pub fn durations(&self) -> BTreeMap<&str, f64> {
        self.timings
            .iter()
            .map(|(name, t)| (name.as_str(), t.best_ms))
            .collect()
    }

    /// Iterate timings sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Timing)> {
        self.timings.iter().map(|(name, t)| (name.as_str(), t))
    }

    /// Number of timed operations
    pub fn len(&self) -> usize {
        self.timings.len()
    }

    /// Whether nothing was timed
    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Restrict results to the names that will be reported.
    ///
    /// Every reported name must have been timed; the first one that was not
    /// yields [`HarnessError::UnknownOperation`].
    pub fn select<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<BenchmarkResults, HarnessError> {
        names
            .into_iter()
            .map(|name| {
                self.timings
                    .get(name)
                    .map(|t| (name.to_string(), t.clone()))
                    .ok_or_else(|| HarnessError::UnknownOperation(name.to_string()))
            })
            .collect()
    }
}
