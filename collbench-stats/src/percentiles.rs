//! Percentile Computation
//!
//! Linear interpolation between nearest ranks, on unsorted input.

/// Lower quartile, median and upper quartile of a sample set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    /// 25th percentile
    pub q1: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
}

impl Quartiles {
    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Compute a single percentile from samples
///
/// Uses linear interpolation between nearest ranks. Empty input yields `0.0`.
///
/// # Examples
///
/// ```
/// # use collbench_stats::compute_percentile;
/// let samples = vec![4.0, 1.0, 3.0, 2.0, 5.0];
/// assert_eq!(compute_percentile(&samples, 50.0), 3.0);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    if samples.len() == 1 {
        return samples[0];
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    percentile_of_sorted(&sorted, percentile)
}

/// Compute quartiles with a single sort
pub fn compute_quartiles(samples: &[f64]) -> Quartiles {
    if samples.is_empty() {
        return Quartiles {
            q1: 0.0,
            median: 0.0,
            q3: 0.0,
        };
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Quartiles {
        q1: percentile_of_sorted(&sorted, 25.0),
        median: percentile_of_sorted(&sorted, 50.0),
        q3: percentile_of_sorted(&sorted, 75.0),
    }
}

fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let p = (percentile / 100.0).clamp(0.0, 1.0);
    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_unsorted() {
        let samples = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        let p50 = compute_percentile(&samples, 50.0);
        assert!((p50 - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_interpolates_between_ranks() {
        let samples = vec![1.0, 2.0];
        assert!((compute_percentile(&samples, 50.0) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quartiles() {
        let samples: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let q = compute_quartiles(&samples);

        assert!((q.q1 - 25.75).abs() < 1.0);
        assert!((q.q3 - 75.25).abs() < 1.0);
        assert!((q.iqr() - 49.5).abs() < 1.0);
    }

    #[test]
    fn test_out_of_range_percentile_is_clamped() {
        let samples = vec![1.0, 2.0, 3.0];
        assert_eq!(compute_percentile(&samples, 150.0), 3.0);
        assert_eq!(compute_percentile(&samples, -10.0), 1.0);
    }

    #[test]
    fn test_single_and_empty() {
        assert!((compute_percentile(&[42.0], 50.0) - 42.0).abs() < f64::EPSILON);
        assert_eq!(compute_percentile(&[], 50.0), 0.0);
        assert_eq!(compute_quartiles(&[]).median, 0.0);
    }
}
