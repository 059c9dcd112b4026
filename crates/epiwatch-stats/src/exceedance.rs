use serde::Serialize;

use crate::percentiles;

/// Empirical probability that an observation exceeds a percentile threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceedanceProbability {
    /// Percentile (0-100) the threshold was taken at.
    pub percentile: f64,
    /// Threshold value, the `percentile`-th percentile of the sample.
    pub threshold: f64,
    /// Number of observations strictly greater than the threshold.
    pub exceeding: usize,
    /// Number of observations considered.
    pub total: usize,
    /// `exceeding / total`.
    pub probability: f64,
}

impl ExceedanceProbability {
    /// Computes the exceedance probability of `values` above their own
    /// `percentile`-th percentile.
    ///
    /// Returns `None` for an empty sample.
    ///
    /// # Examples
    ///
    /// ```
    /// use epiwatch_stats::exceedance::ExceedanceProbability;
    ///
    /// let result = ExceedanceProbability::new([1.0, 2.0, 3.0, 4.0, 5.0], 75.0).unwrap();
    /// assert_eq!(result.threshold, 4.0);
    /// assert_eq!(result.exceeding, 1);
    /// assert_eq!(result.probability, 0.2);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I, percentile: f64) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let threshold = percentiles::compute_percentile(&sorted, percentile);
        // Sorted ascending, so everything after the partition point exceeds
        let exceeding = sorted.len() - sorted.partition_point(|v| *v <= threshold);
        let total = sorted.len();

        Some(Self {
            percentile,
            threshold,
            exceeding,
            total,
            probability: exceeding as f64 / total as f64,
        })
    }
}
