//! End-to-end analysis run

use std::path::PathBuf;

use crate::{
    chart::{Chart, RenderError, SummaryRenderer},
    config::{AnalysisConfig, ConfigError},
    join,
    population::{PopulationError, Populations},
    record::{HospitalizationTable, WideCaseTable},
    report::{AnalysisReport, HypothesisOutcome},
    reshape,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PipelineError {
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
    #[display("{_0}")]
    Population(PopulationError),
}

/// A chart that could not be written.
#[derive(Debug)]
pub struct ChartFailure {
    pub file_name: String,
    pub error: RenderError,
}

/// Everything one run produced.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub populations: Populations,
    pub charts_written: Vec<PathBuf>,
    pub chart_failures: Vec<ChartFailure>,
}

/// Reshape, join, select, analyze and render, in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline;

impl Pipeline {
    pub fn run<R>(
        config: &AnalysisConfig,
        hospitalizations: &HospitalizationTable,
        cases: &WideCaseTable,
        renderer: &mut R,
    ) -> Result<AnalysisOutcome, PipelineError>
    where
        R: SummaryRenderer + ?Sized,
    {
        config.validate()?;

        let long = reshape::wide_to_long(cases);
        log::info!(
            "Reshaped {} dates x {} countries into {} case records",
            cases.rows.len(),
            cases.countries.len(),
            long.records.len()
        );

        let rows = join::build_analysis_rows(&long, hospitalizations, &config.indicator_label);
        let populations = Populations::select(rows, config)?;
        log::info!(
            "Selected {} rows for {} and {} rows for {}",
            populations.subject.rows.len(),
            populations.subject.country,
            populations.comparison.as_ref().map_or(0, |c| c.rows.len()),
            config.comparison_country.trim()
        );

        let report = AnalysisReport::compute(&populations, config);
        if let HypothesisOutcome::Skipped { reason } = &report.hypothesis_test {
            log::warn!("Skipping two-sample test: {reason}");
        }

        let mut charts_written = vec![];
        let mut chart_failures = vec![];
        for chart in Chart::for_populations(&populations, report.correlation) {
            match renderer.render(&chart) {
                Ok(path) => {
                    log::info!("Saved chart {}", path.display());
                    charts_written.push(path);
                }
                Err(error) => {
                    log::warn!("Skipping chart {}: {error}", chart.file_name());
                    chart_failures.push(ChartFailure {
                        file_name: chart.file_name(),
                        error,
                    });
                }
            }
        }

        Ok(AnalysisOutcome {
            report,
            populations,
            charts_written,
            chart_failures,
        })
    }
}
