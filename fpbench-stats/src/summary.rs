//! Summary Statistics
//!
//! Mean and standard deviation are the reported figures. Extremes and
//! percentiles are kept alongside for logging; all values are computed from
//! the full, uncleaned sample set.

use crate::percentiles::percentile_of_sorted;
use rayon::prelude::*;

/// Summary of one latency sequence (all values in nanoseconds)
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (divisor N - 1)
    pub std_dev: f64,
    /// Smallest sample
    pub min: u64,
    /// Largest sample
    pub max: u64,
    /// 50th percentile
    pub median: f64,
    /// 99th percentile
    pub p99: f64,
    /// Number of samples
    pub sample_count: usize,
}

impl SummaryStatistics {
    fn empty() -> Self {
        Self {
            mean: 0.0,
            std_dev: 0.0,
            min: 0,
            max: 0,
            median: 0.0,
            p99: 0.0,
            sample_count: 0,
        }
    }

    /// Coefficient of variation (relative stddev, percent)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }
}

/// Compute summary statistics for one latency sequence
pub fn compute_summary(samples: &[u64]) -> SummaryStatistics {
    if samples.is_empty() {
        return SummaryStatistics::empty();
    }

    let n = samples.len();

    // Exact integer sum; u128 cannot overflow for any realistic run length
    let total: u128 = samples.iter().map(|&s| u128::from(s)).sum();
    let mean = total as f64 / n as f64;

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = samples
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        variance.sqrt()
    };

    let mut sorted: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    SummaryStatistics {
        mean,
        std_dev,
        min: samples.iter().copied().min().unwrap_or(0),
        max: samples.iter().copied().max().unwrap_or(0),
        median: percentile_of_sorted(&sorted, 50.0),
        p99: percentile_of_sorted(&sorted, 99.0),
        sample_count: n,
    }
}

/// Compute statistics for several sequences in parallel, preserving order
pub fn compute_summaries<S>(sequences: &[S]) -> Vec<SummaryStatistics>
where
    S: AsRef<[u64]> + Sync,
{
    sequences
        .par_iter()
        .map(|s| compute_summary(s.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_sequence() {
        let samples = vec![5u64; 1000];
        let summary = compute_summary(&samples);

        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.min, 5);
        assert_eq!(summary.max, 5);
        assert_eq!(summary.sample_count, 1000);
    }

    #[test]
    fn test_two_samples_bessel_corrected() {
        for (a, b) in [(3u64, 10u64), (100, 40), (0, 1)] {
            let summary = compute_summary(&[a, b]);
            let expected = (a as f64 - b as f64).abs() / 2f64.sqrt();
            assert!(
                (summary.std_dev - expected).abs() < 1e-12,
                "[{a}, {b}]: {} vs {expected}",
                summary.std_dev
            );
        }
    }

    #[test]
    fn test_basic_summary() {
        let samples = vec![1, 2, 3, 4, 5];
        let summary = compute_summary(&samples);

        assert!((summary.mean - 3.0).abs() < 1e-12);
        assert!((summary.median - 3.0).abs() < 1e-12);
        // Sample variance of 1..=5 is 2.5
        assert!((summary.std_dev - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary.min, 1);
        assert_eq!(summary.max, 5);
    }

    #[test]
    fn test_single_sample() {
        let summary = compute_summary(&[42]);
        assert_eq!(summary.mean, 42.0);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.p99, 42.0);
    }

    #[test]
    fn test_empty_samples() {
        let summary = compute_summary(&[]);
        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.coefficient_of_variation(), 0.0);
    }

    #[test]
    fn test_coefficient_of_variation() {
        // mean 20, std dev 10
        let summary = compute_summary(&[10, 20, 30]);
        assert!((summary.coefficient_of_variation() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_tail_is_kept() {
        let mut samples = vec![10u64; 999];
        samples.push(10_000);
        let summary = compute_summary(&samples);

        assert_eq!(summary.max, 10_000);
        assert_eq!(summary.median, 10.0);
        assert!(summary.mean > 10.0);
    }

    #[test]
    fn test_compute_summaries_preserves_order() {
        let sequences = vec![vec![1u64, 1, 1], vec![2, 2], vec![7]];
        let summaries = compute_summaries(&sequences);
        let means: Vec<f64> = summaries.iter().map(|s| s.mean).collect();
        assert_eq!(means, [1.0, 2.0, 7.0]);
    }
}
