//! Renderer-independent chart descriptions
//!
//! The analysis describes each figure as a [`Chart`] value holding the exact
//! series to draw. A [`SummaryRenderer`] turns charts into files; the pipeline
//! never depends on a particular drawing backend.

use std::{io, path::PathBuf};

use chrono::NaiveDate;
use epiwatch_stats::{density::GaussianKde, histogram::Histogram};

use crate::population::{Population, Populations};

pub const HISTOGRAM_BINS: usize = 30;
const DENSITY_POINTS: usize = 200;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RenderError {
    #[display("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[display("failed to draw {}: {message}", path.display())]
    Backend {
        path: PathBuf,
        message: String,
    },
}

/// Draws charts to some output, one artifact per chart.
pub trait SummaryRenderer {
    /// Renders `chart` and returns the path of the written artifact.
    fn render(&mut self, chart: &Chart) -> Result<PathBuf, RenderError>;
}

/// A dated series of values.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl DatedSeries {
    fn new(label: impl Into<String>, points: impl IntoIterator<Item = (NaiveDate, Option<f64>)>) -> Self {
        Self {
            label: label.into(),
            points: points
                .into_iter()
                .filter_map(|(date, value)| Some((date, value?)))
                .collect(),
        }
    }

    /// First and last date, or `None` for an empty series.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.points.iter().map(|(d, _)| *d).min()?;
        let last = self.points.iter().map(|(d, _)| *d).max()?;
        Some((first, last))
    }

    /// Largest value, or 0 for an empty series.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|(_, v)| *v).fold(0.0, f64::max)
    }

    /// Smallest value, or 0 for an empty series.
    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.points.iter().map(|(_, v)| *v).fold(0.0, f64::min)
    }
}

/// New cases (left axis) and ICU occupancy (right axis) over time.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesChart {
    pub country: String,
    pub new_cases: DatedSeries,
    pub icu_occupancy: DatedSeries,
}

/// ICU occupancy histogram with a density curve scaled to bin counts.
#[derive(Debug, Clone)]
pub struct HistogramChart {
    pub country: String,
    pub histogram: Histogram,
    /// `(x, expected count)` points; empty when no density can be estimated
    pub density: Vec<(f64, f64)>,
}

/// New cases against ICU occupancy for complete pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub country: String,
    pub points: Vec<(f64, f64)>,
    pub correlation: Option<f64>,
}

/// ICU occupancy of the subject and comparison countries on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChart {
    pub subject: DatedSeries,
    pub comparison: DatedSeries,
}

#[derive(Debug, Clone, derive_more::From)]
pub enum Chart {
    TimeSeries(TimeSeriesChart),
    Histogram(HistogramChart),
    Scatter(ScatterChart),
    Comparison(ComparisonChart),
}

impl Chart {
    /// Output file name, e.g. `time_series_brazil.png`.
    #[must_use]
    pub fn file_name(&self) -> String {
        match self {
            Self::TimeSeries(c) => format!("time_series_{}.png", slugify(&c.country)),
            Self::Histogram(c) => format!("icu_histogram_{}.png", slugify(&c.country)),
            Self::Scatter(c) => format!("correlation_{}.png", slugify(&c.country)),
            Self::Comparison(c) => format!(
                "icu_comparison_{}_{}.png",
                slugify(&c.subject.label),
                slugify(&c.comparison.label)
            ),
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::TimeSeries(c) => format!("New cases and ICU occupancy in {}", c.country),
            Self::Histogram(c) => format!("Distribution of ICU occupancy in {}", c.country),
            Self::Scatter(c) => format!("New cases vs. ICU occupancy in {}", c.country),
            Self::Comparison(c) => format!(
                "ICU occupancy: {} vs. {}",
                c.subject.label, c.comparison.label
            ),
        }
    }

    /// Builds every chart the populations support.
    ///
    /// The time series is always present. The histogram and scatter plot need
    /// at least one ICU observation or complete pair respectively, and the
    /// comparison chart needs a comparison population.
    #[must_use]
    pub fn for_populations(populations: &Populations, correlation: Option<f64>) -> Vec<Self> {
        let subject = &populations.subject;
        let mut charts = vec![Self::from(time_series(subject))];
        if let Some(chart) = histogram(subject) {
            charts.push(chart.into());
        }
        if let Some(chart) = scatter(subject, correlation) {
            charts.push(chart.into());
        }
        if let Some(comparison) = &populations.comparison {
            charts.push(
                ComparisonChart {
                    subject: icu_series(subject),
                    comparison: icu_series(comparison),
                }
                .into(),
            );
        }
        charts
    }
}

fn icu_series(population: &Population) -> DatedSeries {
    DatedSeries::new(
        population.country.clone(),
        population.rows.iter().map(|row| (row.date, row.icu_occupancy)),
    )
}

fn time_series(population: &Population) -> TimeSeriesChart {
    TimeSeriesChart {
        country: population.country.clone(),
        new_cases: DatedSeries::new(
            "New cases",
            population.rows.iter().map(|row| (row.date, row.new_cases)),
        ),
        icu_occupancy: DatedSeries::new(
            "ICU occupancy",
            population.rows.iter().map(|row| (row.date, row.icu_occupancy)),
        ),
    }
}

#[expect(clippy::cast_precision_loss)]
fn histogram(population: &Population) -> Option<HistogramChart> {
    let values = population.icu_occupancy().collect::<Vec<_>>();
    if values.is_empty() {
        return None;
    }
    let histogram = Histogram::new(values.iter().copied(), HISTOGRAM_BINS);

    // Density times n times bin width gives the expected count per bin
    let density = match (GaussianKde::new(values.iter().copied()), histogram.bins.first(), histogram.bins.last()) {
        (Some(kde), Some(first), Some(last)) => {
            let scale = values.len() as f64 * first.width();
            kde.curve(first.range.start, last.range.end, DENSITY_POINTS)
                .into_iter()
                .map(|(x, y)| (x, y * scale))
                .collect()
        }
        _ => vec![],
    };

    Some(HistogramChart {
        country: population.country.clone(),
        histogram,
        density,
    })
}

fn scatter(population: &Population, correlation: Option<f64>) -> Option<ScatterChart> {
    let points = population
        .rows
        .iter()
        .filter_map(|row| Some((row.new_cases?, row.icu_occupancy?)))
        .collect::<Vec<_>>();
    (!points.is_empty()).then(|| ScatterChart {
        country: population.country.clone(),
        points,
        correlation,
    })
}

/// Lowercases `name` and replaces every run of non-alphanumeric characters
/// with a single underscore.
///
/// ```
/// use epiwatch_analysis::chart::slugify;
///
/// assert_eq!(slugify("United States"), "united_states");
/// assert_eq!(slugify(" Côte d'Ivoire "), "côte_d_ivoire");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
