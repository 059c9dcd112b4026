//! Analysis configuration from a JSON file and command-line overrides

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use epiwatch_analysis::config::AnalysisConfig;

use crate::util;

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct ConfigArg {
    /// JSON file with analysis settings; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Country whose statistics are reported [default: Brazil]
    #[arg(long)]
    pub subject: Option<String>,

    /// Country the subject's ICU occupancy is tested against [default: Argentina]
    #[arg(long)]
    pub comparison: Option<String>,

    /// Hospitalization indicator to analyze [default: "Daily ICU occupancy"]
    #[arg(long)]
    pub indicator: Option<String>,

    /// Significance level of the t-test [default: 0.05]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Percentile used as exceedance threshold [default: 75]
    #[arg(long)]
    pub percentile: Option<f64>,
}

impl ConfigArg {
    /// Builds the validated configuration: defaults, then the config file,
    /// then individual flags.
    pub fn resolve(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<AnalysisConfig>("analysis config", path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(subject) = &self.subject {
            config.subject_country.clone_from(subject);
        }
        if let Some(comparison) = &self.comparison {
            config.comparison_country.clone_from(comparison);
        }
        if let Some(indicator) = &self.indicator {
            config.indicator_label.clone_from(indicator);
        }
        if let Some(alpha) = self.alpha {
            config.significance_level = alpha;
        }
        if let Some(percentile) = self.percentile {
            config.percentile = percentile;
        }
        config.validate().context("Invalid analysis configuration")?;
        Ok(config)
    }
}
