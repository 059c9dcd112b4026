//! Analysis command
//!
//! Loads both input tables, runs the pipeline with the plotters renderer,
//! prints the console report and writes the optional JSON/CSV exports.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use epiwatch_analysis::{load, pipeline::Pipeline};

use crate::{command::config::ConfigArg, render::PlottersRenderer, report, util};

pub(crate) const DEFAULT_HOSPITALIZATIONS_PATH: &str = "data/covid-hospitalizations.csv";
pub(crate) const DEFAULT_CASES_PATH: &str = "data/total-cases.csv";
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "resultados";

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalyzeArg {
    /// Hospitalization CSV (columns: entity, date, indicator, value)
    #[arg(long, default_value = DEFAULT_HOSPITALIZATIONS_PATH)]
    pub hospitalizations: PathBuf,

    /// Cumulative cases CSV (a date column and one column per country)
    #[arg(long, default_value = DEFAULT_CASES_PATH)]
    pub cases: PathBuf,

    /// Directory for the chart images, created if absent
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Write the full report as JSON to this path
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Write the subject and comparison rows as CSV to this path
    #[arg(long)]
    pub export_rows: Option<PathBuf>,

    #[clap(flatten)]
    pub config: ConfigArg,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let config = arg.config.resolve()?;

    let hospitalizations = load::load_hospitalizations(&arg.hospitalizations)
        .context("Failed to load hospitalization data")?;
    let cases = load::load_wide_cases(&arg.cases).context("Failed to load case data")?;

    log::info!("Writing charts to {}", arg.output_dir.display());
    let mut renderer = PlottersRenderer::new(&arg.output_dir);
    let outcome = Pipeline::run(&config, &hospitalizations, &cases, &mut renderer)
        .context("Analysis failed")?;

    report::print_report(&outcome);

    if let Some(path) = &arg.report_json {
        util::save_json(&outcome.report, Some(path))?;
        println!("Report saved to: {}", path.display());
    }

    if let Some(path) = &arg.export_rows {
        let populations = &outcome.populations;
        let rows = populations
            .subject
            .rows
            .iter()
            .chain(populations.comparison.iter().flat_map(|c| &c.rows));
        let count = util::write_csv_rows(path, rows)?;
        println!("Exported {count} rows to: {}", path.display());
    }

    Ok(())
}
