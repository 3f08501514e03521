#![warn(missing_docs)]
//! collbench Statistics
//!
//! Provides the numbers around a best-of-batches estimate:
//! - Summary statistics over the per-batch estimates (spread, stability)
//! - Percentile calculation with linear interpolation
//! - Backend comparison with speedup and a tolerance band

mod comparison;
mod percentiles;
mod summary;

pub use comparison::{
    BackendComparison, ComparisonError, DEFAULT_TOLERANCE_PCT, MIN_RESOLVABLE_MS, Verdict,
    compare_backends, within_tolerance,
};
pub use percentiles::{Quartiles, compute_percentile, compute_quartiles};
pub use summary::{SummaryStatistics, compute_summary};

/// Coefficient of variation (percent) above which batches are flagged as noisy
pub const NOISY_CV_THRESHOLD: f64 = 10.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!((DEFAULT_TOLERANCE_PCT - 5.0).abs() < f64::EPSILON);
        assert!(NOISY_CV_THRESHOLD > DEFAULT_TOLERANCE_PCT);
    }
}
