//! Hospitalization and case-count analysis for the epiwatch project
//!
//! This crate loads the two public-health tables, aligns them on
//! (date, country), and produces the statistical report and chart
//! descriptions for one subject country compared against another.
//!
//! # Overview
//!
//! The analysis is a single batch pass in four stages:
//!
//! 1. **Load** ([`load`]): read the hospitalization table and the wide table of
//!    cumulative cases, normalizing dates and country names
//! 2. **Reshape** ([`reshape::wide_to_long`]): turn the case table into one
//!    record per (date, country)
//! 3. **Join** ([`join::build_analysis_rows`]): inner-join both tables, keep the
//!    configured indicator, and derive daily new cases per country
//! 4. **Analyze** ([`report::AnalysisReport`], [`chart::Chart`]): descriptive
//!    statistics, correlation, Welch's t-test, exceedance probability, and the
//!    charts that summarize them
//!
//! Stages 2 to 4 are composed by [`pipeline::Pipeline::run`]. Charts are drawn
//! by a caller-supplied [`chart::SummaryRenderer`], so the statistics can be
//! computed and tested without any drawing backend.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//!
//! use epiwatch_analysis::{
//!     chart::{Chart, RenderError, SummaryRenderer},
//!     config::AnalysisConfig,
//!     load,
//!     pipeline::Pipeline,
//! };
//!
//! struct DiscardCharts;
//!
//! impl SummaryRenderer for DiscardCharts {
//!     fn render(&mut self, chart: &Chart) -> Result<PathBuf, RenderError> {
//!         Ok(PathBuf::from(chart.file_name()))
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hospitalizations = load::load_hospitalizations(Path::new("data/covid-hospitalizations.csv"))?;
//! let cases = load::load_wide_cases(Path::new("data/total-cases.csv"))?;
//!
//! let config = AnalysisConfig::default();
//! let outcome = Pipeline::run(&config, &hospitalizations, &cases, &mut DiscardCharts)?;
//! println!("correlation: {:?}", outcome.report.correlation);
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod config;
pub mod join;
pub mod load;
pub mod pipeline;
pub mod population;
pub mod record;
pub mod report;
pub mod reshape;
