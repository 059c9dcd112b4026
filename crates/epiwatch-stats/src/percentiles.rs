//! Percentiles by linear interpolation.

/// Computes a single percentile value from sorted data.
///
/// Uses linear interpolation between the closest ranks: the k-th percentile
/// of n values lies at fractional position `(n - 1) * k / 100`.
///
/// Returns `f64::NAN` if the input is empty. `percentile` is clamped to
/// `0.0..=100.0`.
///
/// # Examples
///
/// ```
/// use epiwatch_stats::percentiles::compute_percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0];
/// assert_eq!(compute_percentile(&values, 50.0), 2.5);
/// assert_eq!(compute_percentile(&values, 75.0), 3.25);
/// assert_eq!(compute_percentile(&values, 100.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let last = sorted_values.len() - 1;
    let position = last as f64 * percentile.clamp(0.0, 100.0) / 100.0;
    let lower = (position.floor() as usize).min(last);
    let upper = (position.ceil() as usize).min(last);
    let fraction = position - lower as f64;
    let low = sorted_values[lower];
    let high = sorted_values[upper];
    if fraction == 0.0 || lower == upper {
        low
    } else {
        low + (high - low) * fraction
    }
}
