use std::ops::Range;

use serde::Serialize;

/// A histogram representation of a dataset's distribution.
///
/// The data range `[min, max]` is divided into equally wide bins. The last bin
/// is closed on the right so the maximum value is counted.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, ordered by range.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl HistogramBin {
    /// Width of the bin.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.range.end - self.range.start
    }
}

impl Histogram {
    /// Creates a histogram from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use epiwatch_stats::histogram::Histogram;
    /// let values = [5.0, 2.0, 8.0, 1.0, 9.0, 3.0, 7.0, 4.0, 6.0, 10.0];
    /// let histogram = Histogram::new(values, 3);
    /// assert_eq!(histogram.bins.len(), 3);
    /// assert_eq!(histogram.total_count(), 10);
    /// ```
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, num_bins)
    }

    /// Creates a histogram from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], num_bins: usize) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Self { bins: vec![] };
        };
        if num_bins == 0 {
            return Self { bins: vec![] };
        }

        // A degenerate distribution still gets a unit-wide range centred on the value
        let (start, end) = if max - min < f64::EPSILON {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        let bin_width = (end - start) / num_bins as f64;

        // Recompute boundaries from the index to avoid floating-point accumulation
        let mut bins = (0..num_bins)
            .map(|idx| HistogramBin {
                range: start + idx as f64 * bin_width..start + (idx + 1) as f64 * bin_width,
                count: 0,
            })
            .collect::<Vec<_>>();

        for &val in sorted_values {
            let idx = (((val - start) / bin_width).floor() as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    /// Total number of values counted across all bins.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Largest bin count, or 0 for an empty histogram.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        let histogram = Histogram::new([], 30);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.max_count(), 0);
    }

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let histogram = Histogram::new([0.0, 1.0, 2.0, 3.0, 4.0], 4);
        let counts = histogram.bins.iter().map(|b| b.count).collect::<Vec<_>>();
        assert_eq!(counts, vec![1, 1, 1, 2]);
        assert_eq!(histogram.bins[0].range.start, 0.0);
        assert_eq!(histogram.bins[3].range.end, 4.0);
    }

    #[test]
    fn test_single_value() {
        let histogram = Histogram::new([42.0, 42.0], 5);
        assert_eq!(histogram.bins.len(), 5);
        assert_eq!(histogram.total_count(), 2);
        let bin = histogram.bins.iter().find(|b| b.count > 0).unwrap();
        assert!(bin.range.contains(&42.0));
    }

    #[test]
    fn test_widths_are_equal() {
        let histogram = Histogram::new([1.0, 3.0, 7.0, 10.0], 3);
        for bin in &histogram.bins {
            assert!((bin.width() - 3.0).abs() < 1e-12);
        }
    }
}
