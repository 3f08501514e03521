//! Summary Statistics
//!
//! Describes the spread of per-batch estimates behind a best-of-batches result.
//! The reported duration is always the minimum; the rest of the summary shows
//! how noisy the batches were.

use crate::percentiles::compute_quartiles;
use serde::{Deserialize, Serialize};

/// Summary of a set of timing samples (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Median (interpolated)
    pub median: f64,
    /// Sample standard deviation (n - 1)
    pub std_dev: f64,
    /// Number of samples
    pub sample_count: usize,
}

/// Compute summary statistics over samples
pub fn compute_summary(samples: &[f64]) -> SummaryStatistics {
    if samples.is_empty() {
        return SummaryStatistics::default();
    }

    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SummaryStatistics {
        min,
        max,
        mean,
        median: compute_quartiles(samples).median,
        std_dev,
        sample_count: n,
    }
}

impl SummaryStatistics {
    /// Coefficient of variation (relative stddev, percent)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Check if distribution appears stable (low CV)
    pub fn is_stable(&self, cv_threshold: f64) -> bool {
        self.coefficient_of_variation() < cv_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let summary = compute_summary(&samples);

        assert!((summary.mean - 3.0).abs() < 0.01);
        assert!((summary.median - 3.0).abs() < 0.01);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.sample_count, 5);
        assert!((summary.std_dev - 1.5811).abs() < 0.001);
    }

    #[test]
    fn test_constant_samples_are_stable() {
        let samples = vec![100.0, 100.0, 100.0];
        let summary = compute_summary(&samples);

        assert!((summary.coefficient_of_variation() - 0.0).abs() < f64::EPSILON);
        assert!(summary.is_stable(1.0));
    }

    #[test]
    fn test_single_sample_has_no_deviation() {
        let summary = compute_summary(&[7.5]);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.min, 7.5);
        assert_eq!(summary.max, 7.5);
    }

    #[test]
    fn test_empty_samples() {
        let summary = compute_summary(&[]);
        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.mean, 0.0);
    }
}
