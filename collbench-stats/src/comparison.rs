//! Backend Comparison
//!
//! Compares the best-of-batches estimate of one operation on two backends.
//! `speedup > 1.0` means the candidate is faster than the baseline.

use serde::{Deserialize, Serialize};

/// Durations below this are treated as this value when forming ratios.
///
/// One nanosecond expressed in milliseconds, the timer's resolution.
pub const MIN_RESOLVABLE_MS: f64 = 1e-6;

/// Default tolerance band (percent) inside which two estimates are considered equal
pub const DEFAULT_TOLERANCE_PCT: f64 = 5.0;

/// Outcome of comparing two estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Candidate is faster than baseline beyond the tolerance band
    Faster,
    /// Candidate is slower than baseline beyond the tolerance band
    Slower,
    /// The two estimates are within the tolerance band
    Indistinguishable,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Faster => write!(f, "faster"),
            Verdict::Slower => write!(f, "slower"),
            Verdict::Indistinguishable => write!(f, "same"),
        }
    }
}

/// Result of comparing a baseline and a candidate estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackendComparison {
    /// Baseline estimate (ms)
    pub baseline_ms: f64,
    /// Candidate estimate (ms)
    pub candidate_ms: f64,
    /// `baseline / candidate`
    pub speedup: f64,
    /// `(candidate - baseline) / baseline`, percent
    pub relative_change: f64,
    /// Tolerance band used (percent)
    pub tolerance_pct: f64,
    /// Classification of the difference
    pub verdict: Verdict,
}

/// Errors from comparison operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComparisonError {
    /// A duration was negative, NaN or infinite
    #[error("duration must be a finite non-negative number, got {0}")]
    InvalidDuration(f64),
    /// Tolerance was negative, NaN or infinite
    #[error("tolerance must be a finite non-negative percentage, got {0}")]
    InvalidTolerance(f64),
}

/// Whether two estimates differ by at most `tolerance_pct` percent of the larger one.
pub fn within_tolerance(a: f64, b: f64, tolerance_pct: f64) -> bool {
    let larger = a.max(b).max(MIN_RESOLVABLE_MS);
    (a - b).abs() <= larger * tolerance_pct / 100.0
}

/// Compare a candidate estimate against a baseline estimate.
pub fn compare_backends(
    baseline_ms: f64,
    candidate_ms: f64,
    tolerance_pct: f64,
) -> Result<BackendComparison, ComparisonError> {
    for value in [baseline_ms, candidate_ms] {
        if !value.is_finite() || value < 0.0 {
            return Err(ComparisonError::InvalidDuration(value));
        }
    }
    if !tolerance_pct.is_finite() || tolerance_pct < 0.0 {
        return Err(ComparisonError::InvalidTolerance(tolerance_pct));
    }

    let baseline = baseline_ms.max(MIN_RESOLVABLE_MS);
    let candidate = candidate_ms.max(MIN_RESOLVABLE_MS);

    let speedup = baseline / candidate;
    let relative_change = (candidate - baseline) / baseline * 100.0;

    let verdict = if within_tolerance(baseline, candidate, tolerance_pct) {
        Verdict::Indistinguishable
    } else if candidate < baseline {
        Verdict::Faster
    } else {
        Verdict::Slower
    };

    Ok(BackendComparison {
        baseline_ms,
        candidate_ms,
        speedup,
        relative_change,
        tolerance_pct,
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_faster() {
        let cmp = compare_backends(10.0, 2.5, DEFAULT_TOLERANCE_PCT).unwrap();
        assert!((cmp.speedup - 4.0).abs() < f64::EPSILON);
        assert!((cmp.relative_change + 75.0).abs() < 1e-9);
        assert_eq!(cmp.verdict, Verdict::Faster);
    }

    #[test]
    fn test_candidate_slower() {
        let cmp = compare_backends(1.0, 3.0, DEFAULT_TOLERANCE_PCT).unwrap();
        assert!(cmp.speedup < 1.0);
        assert!((cmp.relative_change - 200.0).abs() < 1e-9);
        assert_eq!(cmp.verdict, Verdict::Slower);
    }

    #[test]
    fn test_within_band_is_indistinguishable() {
        let cmp = compare_backends(100.0, 103.0, 5.0).unwrap();
        assert_eq!(cmp.verdict, Verdict::Indistinguishable);
        assert!(within_tolerance(100.0, 96.0, 5.0));
        assert!(!within_tolerance(100.0, 90.0, 5.0));
    }

    #[test]
    fn test_zero_durations_do_not_divide_by_zero() {
        let cmp = compare_backends(0.0, 0.0, 5.0).unwrap();
        assert!(cmp.speedup.is_finite());
        assert_eq!(cmp.verdict, Verdict::Indistinguishable);

        let cmp = compare_backends(1.0, 0.0, 5.0).unwrap();
        assert!(cmp.speedup.is_finite());
        assert_eq!(cmp.verdict, Verdict::Faster);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            compare_backends(-1.0, 1.0, 5.0),
            Err(ComparisonError::InvalidDuration(-1.0))
        );
        assert!(matches!(
            compare_backends(1.0, f64::NAN, 5.0),
            Err(ComparisonError::InvalidDuration(_))
        ));
        assert_eq!(
            compare_backends(1.0, 1.0, -5.0),
            Err(ComparisonError::InvalidTolerance(-5.0))
        );
    }
}
