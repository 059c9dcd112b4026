//! PNG chart rendering with plotters
//!
//! Uses the bitmap backend with plotters' `ttf` font support, which resolves
//! the sans-serif family through the system font configuration. A missing
//! font surfaces as a per-chart [`RenderError::Backend`].

use std::{
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use epiwatch_analysis::chart::{
    Chart, ComparisonChart, DatedSeries, HistogramChart, RenderError, ScatterChart,
    SummaryRenderer, TimeSeriesChart,
};
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (1200, 700);
const NEW_CASES_COLOR: RGBColor = RGBColor(31, 119, 180);
const ICU_COLOR: RGBColor = RGBColor(214, 39, 40);
const COMPARISON_COLOR: RGBColor = RGBColor(44, 160, 44);

#[derive(Debug)]
pub struct PlottersRenderer {
    output_dir: PathBuf,
}

impl PlottersRenderer {
    pub fn new<P>(output_dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl SummaryRenderer for PlottersRenderer {
    fn render(&mut self, chart: &Chart) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.output_dir.join(chart.file_name());
        let title = chart.title();
        let result = match chart {
            Chart::TimeSeries(c) => draw_time_series(&path, &title, c),
            Chart::Histogram(c) => draw_histogram(&path, &title, c),
            Chart::Scatter(c) => draw_scatter(&path, &title, c),
            Chart::Comparison(c) => draw_comparison(&path, &title, c),
        };
        match result {
            Ok(()) => Ok(path),
            Err(e) => Err(RenderError::Backend {
                path,
                message: format!("{e:#}"),
            }),
        }
    }
}

/// Maps dates to day offsets from the first date of the chart.
#[derive(Debug, Clone, Copy)]
struct DayAxis {
    origin: NaiveDate,
    days: i64,
}

impl DayAxis {
    fn new<'a>(series: impl IntoIterator<Item = &'a DatedSeries>) -> Self {
        let ranges = series
            .into_iter()
            .filter_map(DatedSeries::date_range)
            .collect::<Vec<_>>();
        let origin = ranges.iter().map(|(first, _)| *first).min();
        let last = ranges.iter().map(|(_, last)| *last).max();
        match origin.zip(last) {
            Some((origin, last)) => Self {
                origin,
                days: (last - origin).num_days(),
            },
            None => Self {
                origin: NaiveDate::MIN,
                days: 0,
            },
        }
    }

    fn range(self) -> Range<i64> {
        // A single day still needs a non-empty range
        0..self.days.max(1)
    }

    fn offset(self, date: NaiveDate) -> i64 {
        (date - self.origin).num_days()
    }

    fn label(self, offset: i64) -> String {
        self.origin
            .checked_add_signed(chrono::TimeDelta::days(offset))
            .map_or_else(String::new, |date| date.format("%Y-%m-%d").to_string())
    }

    fn points(self, series: &DatedSeries) -> impl Iterator<Item = (i64, f64)> + '_ {
        series
            .points
            .iter()
            .map(move |(date, value)| (self.offset(*date), *value))
    }
}

/// Pads a value range so that flat or empty data still gets a visible axis.
fn padded_range(min: f64, max: f64) -> Range<f64> {
    if max - min < f64::EPSILON {
        (min - 1.0)..(max + 1.0)
    } else {
        let margin = (max - min) * 0.05;
        (min - margin)..(max + margin)
    }
}

fn draw_time_series(path: &Path, title: &str, chart: &TimeSeriesChart) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let axis = DayAxis::new([&chart.new_cases, &chart.icu_occupancy]);
    let mut ctx = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .right_y_label_area_size(80)
        .build_cartesian_2d(
            axis.range(),
            padded_range(chart.new_cases.min_value(), chart.new_cases.max_value()),
        )?
        .set_secondary_coord(
            axis.range(),
            padded_range(
                chart.icu_occupancy.min_value(),
                chart.icu_occupancy.max_value(),
            ),
        );

    ctx.configure_mesh()
        .x_desc("Date")
        .y_desc(chart.new_cases.label.as_str())
        .x_label_formatter(&|offset| axis.label(*offset))
        .draw()?;
    ctx.configure_secondary_axes()
        .y_desc(chart.icu_occupancy.label.as_str())
        .draw()?;

    ctx.draw_series(LineSeries::new(axis.points(&chart.new_cases), &NEW_CASES_COLOR))?
        .label(chart.new_cases.label.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], NEW_CASES_COLOR));
    ctx.draw_secondary_series(LineSeries::new(
        axis.points(&chart.icu_occupancy),
        &ICU_COLOR,
    ))?
    .label(chart.icu_occupancy.label.as_str())
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ICU_COLOR));

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_histogram(path: &Path, title: &str, chart: &HistogramChart) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let bins = &chart.histogram.bins;
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        root.present()?;
        return Ok(());
    };
    #[expect(clippy::cast_precision_loss)]
    let max_count = chart.histogram.max_count() as f64;
    let max_density = chart.density.iter().map(|(_, y)| *y).fold(0.0, f64::max);

    let mut ctx = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(
            first.range.start..last.range.end,
            0.0..max_count.max(max_density) * 1.1,
        )?;

    ctx.configure_mesh()
        .x_desc("ICU occupancy")
        .y_desc("Frequency")
        .draw()?;

    ctx.draw_series(bins.iter().map(|bin| {
        #[expect(clippy::cast_precision_loss)]
        let count = bin.count as f64;
        Rectangle::new(
            [(bin.range.start, 0.0), (bin.range.end, count)],
            ICU_COLOR.mix(0.5).filled(),
        )
    }))?;

    if !chart.density.is_empty() {
        ctx.draw_series(LineSeries::new(
            chart.density.iter().copied(),
            BLACK.stroke_width(2),
        ))?;
    }

    root.present()?;
    Ok(())
}

fn draw_scatter(path: &Path, title: &str, chart: &ScatterChart) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = min_max(chart.points.iter().map(|(x, _)| *x));
    let (y_min, y_max) = min_max(chart.points.iter().map(|(_, y)| *y));

    let caption = match chart.correlation {
        Some(r) => format!("{title} (r = {r:.3})"),
        None => title.to_owned(),
    };
    let mut ctx = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(padded_range(x_min, x_max), padded_range(y_min, y_max))?;

    ctx.configure_mesh()
        .x_desc("New cases")
        .y_desc("ICU occupancy")
        .draw()?;

    ctx.draw_series(
        chart
            .points
            .iter()
            .map(|&point| Circle::new(point, 3, NEW_CASES_COLOR.mix(0.6).filled())),
    )?;

    root.present()?;
    Ok(())
}

fn draw_comparison(path: &Path, title: &str, chart: &ComparisonChart) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let axis = DayAxis::new([&chart.subject, &chart.comparison]);
    let y_min = chart.subject.min_value().min(chart.comparison.min_value());
    let y_max = chart.subject.max_value().max(chart.comparison.max_value());

    let mut ctx = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(axis.range(), padded_range(y_min, y_max))?;

    ctx.configure_mesh()
        .x_desc("Date")
        .y_desc("ICU occupancy")
        .x_label_formatter(&|offset| axis.label(*offset))
        .draw()?;

    for (series, color) in [
        (&chart.subject, ICU_COLOR),
        (&chart.comparison, COMPARISON_COLOR),
    ] {
        ctx.draw_series(LineSeries::new(axis.points(series), &color))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    })
}
