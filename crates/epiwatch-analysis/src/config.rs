//! Analysis configuration
//!
//! All knobs of the analysis live in [`AnalysisConfig`]. The defaults
//! reproduce the Brazil vs. Argentina ICU occupancy study; any other country
//! pair or hospitalization metric can be selected without code changes.
//!
//! # Serialization
//!
//! ```json
//! {
//!   "subject_country": "Brazil",
//!   "comparison_country": "Argentina",
//!   "indicator_label": "Daily ICU occupancy",
//!   "significance_level": 0.05,
//!   "percentile": 75.0
//! }
//! ```
//!
//! Every field is optional in JSON; missing fields take their default.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBJECT_COUNTRY: &str = "Brazil";
pub const DEFAULT_COMPARISON_COUNTRY: &str = "Argentina";
pub const DEFAULT_INDICATOR_LABEL: &str = "Daily ICU occupancy";
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;
pub const DEFAULT_PERCENTILE: f64 = 75.0;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{field} must not be empty")]
    Empty { field: &'static str },
    #[display("subject and comparison country are both '{country}'")]
    SameCountry { country: String },
    #[display("significance level must be in (0, 1), got {value}")]
    SignificanceLevel { value: f64 },
    #[display("percentile must be in [0, 100], got {value}")]
    Percentile { value: f64 },
}

/// Parameters of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Country whose statistics, correlation and exceedance are reported
    pub subject_country: String,
    /// Country the subject's ICU occupancy is compared against
    pub comparison_country: String,
    /// Hospitalization indicator retained by the join filter
    pub indicator_label: String,
    /// α of the hypothesis test; the null is rejected iff p < α
    pub significance_level: f64,
    /// Percentile (0-100) used as the exceedance threshold
    pub percentile: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            subject_country: DEFAULT_SUBJECT_COUNTRY.to_owned(),
            comparison_country: DEFAULT_COMPARISON_COUNTRY.to_owned(),
            indicator_label: DEFAULT_INDICATOR_LABEL.to_owned(),
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            percentile: DEFAULT_PERCENTILE,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("subject_country", &self.subject_country),
            ("comparison_country", &self.comparison_country),
            ("indicator_label", &self.indicator_label),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { field });
            }
        }
        if self.subject_country.trim() == self.comparison_country.trim() {
            return Err(ConfigError::SameCountry {
                country: self.subject_country.trim().to_owned(),
            });
        }
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ConfigError::SignificanceLevel {
                value: self.significance_level,
            });
        }
        if !(0.0..=100.0).contains(&self.percentile) {
            return Err(ConfigError::Percentile {
                value: self.percentile,
            });
        }
        Ok(())
    }
}
