//! Statistical report over the selected populations

use epiwatch_stats::{
    correlation,
    descriptive::DescriptiveStats,
    exceedance::ExceedanceProbability,
    hypothesis::{TTestError, WelchTTest},
};
use serde::Serialize;

use crate::{config::AnalysisConfig, population::Populations};

/// Why the two-sample test was not run.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestSkipReason {
    #[display("no rows for comparison country '{country}'")]
    EmptyComparison { country: String },
    #[display("{reason}")]
    Inapplicable { reason: String },
}

/// Outcome of the subject vs. comparison ICU occupancy test.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HypothesisOutcome {
    Completed {
        test: WelchTTest,
        significance_level: f64,
        rejects_null: bool,
    },
    Skipped {
        reason: TestSkipReason,
    },
}

impl HypothesisOutcome {
    fn from_test(result: Result<WelchTTest, TTestError>, significance_level: f64) -> Self {
        match result {
            Ok(test) => Self::Completed {
                rejects_null: test.rejects_null(significance_level),
                test,
                significance_level,
            },
            Err(e) => Self::Skipped {
                reason: TestSkipReason::Inapplicable {
                    reason: e.to_string(),
                },
            },
        }
    }
}

/// All statistics of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub subject_country: String,
    pub comparison_country: String,
    pub indicator_label: String,
    pub subject_rows: usize,
    pub comparison_rows: usize,
    /// Descriptive statistics of the subject's `new_cases`
    pub new_cases: Option<DescriptiveStats>,
    /// Descriptive statistics of the subject's `icu_occupancy`
    pub icu_occupancy: Option<DescriptiveStats>,
    /// Pearson correlation of `new_cases` and `icu_occupancy`
    pub correlation: Option<f64>,
    pub hypothesis_test: HypothesisOutcome,
    /// Probability that the subject's ICU occupancy exceeds its configured percentile
    pub exceedance: Option<ExceedanceProbability>,
}

impl AnalysisReport {
    #[must_use]
    pub fn compute(populations: &Populations, config: &AnalysisConfig) -> Self {
        let subject = &populations.subject;

        let correlation = correlation::pearson(
            subject.rows.iter().map(|row| row.new_cases),
            subject.rows.iter().map(|row| row.icu_occupancy),
        );

        let hypothesis_test = match &populations.comparison {
            Some(comparison) => {
                let a = subject.icu_occupancy().collect::<Vec<_>>();
                let b = comparison.icu_occupancy().collect::<Vec<_>>();
                HypothesisOutcome::from_test(WelchTTest::new(&a, &b), config.significance_level)
            }
            None => HypothesisOutcome::Skipped {
                reason: TestSkipReason::EmptyComparison {
                    country: config.comparison_country.trim().to_owned(),
                },
            },
        };

        Self {
            subject_country: subject.country.clone(),
            comparison_country: config.comparison_country.trim().to_owned(),
            indicator_label: config.indicator_label.clone(),
            subject_rows: subject.rows.len(),
            comparison_rows: populations.comparison.as_ref().map_or(0, |c| c.rows.len()),
            new_cases: DescriptiveStats::new(subject.new_cases()),
            icu_occupancy: DescriptiveStats::new(subject.icu_occupancy()),
            correlation,
            hypothesis_test,
            exceedance: ExceedanceProbability::new(subject.icu_occupancy(), config.percentile),
        }
    }

    /// Plain-language conclusion of the hypothesis test.
    #[must_use]
    pub fn conclusion(&self) -> String {
        match &self.hypothesis_test {
            HypothesisOutcome::Completed {
                test,
                significance_level,
                rejects_null,
            } => {
                if *rejects_null {
                    let direction = if test.mean_a > test.mean_b {
                        "higher"
                    } else {
                        "lower"
                    };
                    format!(
                        "Reject the null hypothesis at α = {significance_level}: mean ICU occupancy in {} is significantly {direction} than in {}.",
                        self.subject_country, self.comparison_country
                    )
                } else {
                    format!(
                        "Fail to reject the null hypothesis at α = {significance_level}: no significant difference in mean ICU occupancy between {} and {}.",
                        self.subject_country, self.comparison_country
                    )
                }
            }
            HypothesisOutcome::Skipped { reason } => format!("Test skipped: {reason}."),
        }
    }
}
