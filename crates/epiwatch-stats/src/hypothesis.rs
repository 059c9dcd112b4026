//! Two-sample hypothesis testing.

use serde::Serialize;

use crate::distribution;

/// Reasons a two-sample t-test cannot be computed.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TTestError {
    #[display("sample {sample} has {len} observations, at least 2 are required")]
    InsufficientObservations { sample: char, len: usize },
    #[display("both samples have zero variance")]
    ZeroVariance,
}

/// Result of Welch's unequal-variance two-sample t-test.
///
/// The null hypothesis is that both populations share the same mean; the
/// alternative is two-sided.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WelchTTest {
    /// Number of observations in the first sample.
    pub n_a: usize,
    /// Number of observations in the second sample.
    pub n_b: usize,
    /// Mean of the first sample.
    pub mean_a: f64,
    /// Mean of the second sample.
    pub mean_b: f64,
    /// The t statistic, positive when the first sample has the larger mean.
    pub t_statistic: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub degrees_of_freedom: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

impl WelchTTest {
    /// Runs the test on two samples.
    ///
    /// # Examples
    ///
    /// ```
    /// use epiwatch_stats::hypothesis::WelchTTest;
    ///
    /// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
    /// let b = [2.0, 4.0, 6.0, 8.0, 10.0];
    /// let test = WelchTTest::new(&a, &b).unwrap();
    /// assert!(test.t_statistic < 0.0);
    /// assert!(!test.rejects_null(0.05));
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn new(a: &[f64], b: &[f64]) -> Result<Self, TTestError> {
        for (sample, values) in [('a', a), ('b', b)] {
            if values.len() < 2 {
                return Err(TTestError::InsufficientObservations {
                    sample,
                    len: values.len(),
                });
            }
        }

        let (mean_a, var_a) = mean_and_variance(a);
        let (mean_b, var_b) = mean_and_variance(b);
        let n_a = a.len() as f64;
        let n_b = b.len() as f64;

        let se_a = var_a / n_a;
        let se_b = var_b / n_b;
        let se_sum = se_a + se_b;
        if se_sum <= 0.0 {
            return Err(TTestError::ZeroVariance);
        }

        let t_statistic = (mean_a - mean_b) / se_sum.sqrt();
        let degrees_of_freedom =
            se_sum.powi(2) / (se_a.powi(2) / (n_a - 1.0) + se_b.powi(2) / (n_b - 1.0));
        let p_value = distribution::students_t_two_sided_p(t_statistic, degrees_of_freedom);

        Ok(Self {
            n_a: a.len(),
            n_b: b.len(),
            mean_a,
            mean_b,
            t_statistic,
            degrees_of_freedom,
            p_value,
        })
    }

    /// Whether the null hypothesis of equal means is rejected at significance
    /// level `alpha` (`p < alpha`).
    #[must_use]
    pub fn rejects_null(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

#[expect(clippy::cast_precision_loss)]
fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}
