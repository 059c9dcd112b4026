//! Gaussian kernel density estimation.

use std::f64::consts::PI;

/// Gaussian kernel density estimate over a one-dimensional sample.
///
/// The bandwidth follows Scott's rule, `σ · n^(-1/5)`, where `σ` is the sample
/// standard deviation.
///
/// # Examples
///
/// ```
/// use epiwatch_stats::density::GaussianKde;
///
/// let kde = GaussianKde::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// let peak = kde.evaluate(3.0);
/// assert!(peak > kde.evaluate(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Builds an estimator from the given samples.
    ///
    /// Returns `None` for fewer than two samples or a zero-variance sample,
    /// where no bandwidth can be derived.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let samples = values.into_iter().collect::<Vec<_>>();
        if samples.len() < 2 {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let bandwidth = variance.sqrt() * n.powf(-0.2);
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return None;
        }
        Some(Self { samples, bandwidth })
    }

    /// Kernel bandwidth.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Probability density at `x`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / ((2.0 * PI).sqrt() * self.bandwidth * self.samples.len() as f64);
        let sum = self
            .samples
            .iter()
            .map(|s| {
                let z = (x - s) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>();
        sum * norm
    }

    /// Evaluates the density on `points` evenly spaced points spanning
    /// `[start, end]`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn curve(&self, start: f64, end: f64, points: usize) -> Vec<(f64, f64)> {
        match points {
            0 => vec![],
            1 => vec![(start, self.evaluate(start))],
            _ => {
                let step = (end - start) / (points - 1) as f64;
                (0..points)
                    .map(|i| {
                        let x = start + step * i as f64;
                        (x, self.evaluate(x))
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_distr::Normal;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn test_degenerate_samples() {
        assert!(GaussianKde::new([]).is_none());
        assert!(GaussianKde::new([1.0]).is_none());
        assert!(GaussianKde::new([3.0, 3.0, 3.0]).is_none());
    }

    #[test]
    fn test_density_integrates_to_one() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let normal = Normal::new(50.0, 10.0).unwrap();
        let samples = (0..200).map(|_| rng.sample(normal)).collect::<Vec<f64>>();
        let kde = GaussianKde::new(samples).unwrap();

        let curve = kde.curve(-50.0, 150.0, 2001);
        let step = 200.0 / 2000.0;
        let area = curve.iter().map(|(_, y)| y * step).sum::<f64>();
        assert!((area - 1.0).abs() < 1e-3, "area = {area}");
    }

    #[test]
    fn test_symmetric_sample_peaks_at_centre() {
        let kde = GaussianKde::new([-2.0, -1.0, 0.0, 1.0, 2.0]).unwrap();
        assert!((kde.evaluate(1.5) - kde.evaluate(-1.5)).abs() < 1e-12);
        assert!(kde.evaluate(0.0) > kde.evaluate(1.0));
    }

    #[test]
    fn test_curve_endpoints() {
        let kde = GaussianKde::new([0.0, 10.0]).unwrap();
        let curve = kde.curve(0.0, 10.0, 11);
        assert_eq!(curve.len(), 11);
        assert_eq!(curve[0].0, 0.0);
        assert!((curve[10].0 - 10.0).abs() < 1e-12);
    }
}
