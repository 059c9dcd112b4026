use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use epiwatch_analysis::{
    chart::{Chart, RenderError, SummaryRenderer},
    config::AnalysisConfig,
    load::{self, LoadError},
    pipeline::{Pipeline, PipelineError},
    population::PopulationError,
    record::AnalysisRow,
    report::{HypothesisOutcome, TestSkipReason},
};
use tempfile::TempDir;

/// Records chart names instead of drawing them.
#[derive(Default)]
struct RecordingRenderer {
    rendered: Vec<String>,
}

impl SummaryRenderer for RecordingRenderer {
    fn render(&mut self, chart: &Chart) -> Result<PathBuf, RenderError> {
        self.rendered.push(chart.file_name());
        Ok(PathBuf::from(chart.file_name()))
    }
}

/// Fails on histograms, succeeds on everything else.
struct FlakyRenderer;

impl SummaryRenderer for FlakyRenderer {
    fn render(&mut self, chart: &Chart) -> Result<PathBuf, RenderError> {
        let path = PathBuf::from(chart.file_name());
        match chart {
            Chart::Histogram(_) => Err(RenderError::Io {
                path,
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            }),
            _ => Ok(path),
        }
    }
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn keys(rows: &[AnalysisRow]) -> Vec<(String, String)> {
    rows.iter()
        .map(|r| (r.date.to_string(), r.entity.clone()))
        .collect()
}

fn config(subject: &str, comparison: &str) -> AnalysisConfig {
    AnalysisConfig {
        subject_country: subject.into(),
        comparison_country: comparison.into(),
        ..AnalysisConfig::default()
    }
}

const TWO_DAY_CASES: &str = "\
date,CountryA
2021-01-01,100
2021-01-02,150
";

const TWO_DAY_HOSPITALIZATIONS: &str = "\
entity,date,indicator,value
CountryA,2021-01-01,Daily ICU occupancy,10
CountryA,2021-01-02,Daily ICU occupancy,15
";

#[test]
fn test_end_to_end_two_days() {
    let dir = TempDir::new().unwrap();
    let cases = write_file(dir.path(), "cases.csv", TWO_DAY_CASES);
    let hosps = write_file(dir.path(), "hosp.csv", TWO_DAY_HOSPITALIZATIONS);

    let cases = load::load_wide_cases(&cases).unwrap();
    let hosps = load::load_hospitalizations(&hosps).unwrap();

    let mut renderer = RecordingRenderer::default();
    let outcome = Pipeline::run(&config("CountryA", "CountryB"), &hosps, &cases, &mut renderer).unwrap();

    let rows = &outcome.populations.subject.rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows.iter().map(|r| r.new_cases).collect::<Vec<_>>(),
        vec![Some(0.0), Some(50.0)]
    );
    assert_eq!(
        rows.iter().map(|r| r.icu_occupancy).collect::<Vec<_>>(),
        vec![Some(10.0), Some(15.0)]
    );
    assert_eq!(outcome.report.correlation, Some(1.0));

    let icu = outcome.report.icu_occupancy.as_ref().unwrap();
    assert_eq!(icu.count, 2);
    assert_eq!(icu.mean, 12.5);

    assert_eq!(
        renderer.rendered,
        vec![
            "time_series_countrya.png",
            "icu_histogram_countrya.png",
            "correlation_countrya.png",
        ]
    );
    assert_eq!(outcome.charts_written.len(), 3);
}

#[test]
fn test_empty_comparison_skips_only_the_test() {
    let cases = load::read_wide_cases(TWO_DAY_CASES.as_bytes(), Path::new("cases.csv")).unwrap();
    let hosps =
        load::read_hospitalizations(TWO_DAY_HOSPITALIZATIONS.as_bytes(), Path::new("hosp.csv")).unwrap();

    let outcome = Pipeline::run(
        &config("CountryA", "Nowhere"),
        &hosps,
        &cases,
        &mut RecordingRenderer::default(),
    )
    .unwrap();

    assert!(outcome.populations.comparison.is_none());
    assert!(outcome.report.new_cases.is_some());
    assert!(outcome.report.icu_occupancy.is_some());
    assert!(outcome.report.exceedance.is_some());
    assert_eq!(
        outcome.report.hypothesis_test,
        HypothesisOutcome::Skipped {
            reason: TestSkipReason::EmptyComparison {
                country: "Nowhere".into()
            }
        }
    );
}

#[test]
fn test_two_countries_run_the_test() {
    let cases = "\
date,Brazil,Argentina,Chile
2021-01-01,100,50,7
2021-01-02,160,60,8
2021-01-03,230,75,9
2021-01-04,300,85,10
";
    let hosps = "\
entity,date,indicator,value,iso_code
Brazil,2021-01-01,Daily ICU occupancy,120,BRA
Brazil,2021-01-02,Daily ICU occupancy,135,BRA
Brazil,2021-01-03,Daily ICU occupancy,128,BRA
Brazil,2021-01-04,Daily ICU occupancy,140,BRA
Brazil,2021-01-04,Daily hospital occupancy,900,BRA
Argentina,2021-01-01,Daily ICU occupancy,80,ARG
Argentina,2021-01-02,Daily ICU occupancy,85,ARG
Argentina,2021-01-03,Daily ICU occupancy,79,ARG
Argentina,2021-01-05,Daily ICU occupancy,90,ARG
Chile,2021-01-01,Daily ICU occupancy,5,CHL
";
    let cases = load::read_wide_cases(cases.as_bytes(), Path::new("cases.csv")).unwrap();
    let hosps = load::read_hospitalizations(hosps.as_bytes(), Path::new("hosp.csv")).unwrap();

    let mut renderer = RecordingRenderer::default();
    let outcome = Pipeline::run(&AnalysisConfig::default(), &hosps, &cases, &mut renderer).unwrap();

    // Argentina's 2021-01-05 row has no case total and is dropped by the join
    let comparison = outcome.populations.comparison.as_ref().unwrap();
    assert_eq!(comparison.rows.len(), 3);
    assert!(comparison.rows.iter().all(|r| r.entity == "Argentina"));
    assert_eq!(outcome.report.subject_rows, 4);

    let HypothesisOutcome::Completed {
        test, rejects_null, ..
    } = &outcome.report.hypothesis_test
    else {
        panic!("test should run: {:?}", outcome.report.hypothesis_test);
    };
    assert_eq!(test.n_a, 4);
    assert_eq!(test.n_b, 3);
    assert!(test.t_statistic > 0.0);
    assert!(*rejects_null);
    assert!(outcome.report.conclusion().contains("significantly higher"));

    assert_eq!(
        renderer.rendered.last().map(String::as_str),
        Some("icu_comparison_brazil_argentina.png")
    );
}

#[test]
fn test_chart_failure_is_not_fatal() {
    let cases = load::read_wide_cases(TWO_DAY_CASES.as_bytes(), Path::new("cases.csv")).unwrap();
    let hosps =
        load::read_hospitalizations(TWO_DAY_HOSPITALIZATIONS.as_bytes(), Path::new("hosp.csv")).unwrap();

    let outcome =
        Pipeline::run(&config("CountryA", "CountryB"), &hosps, &cases, &mut FlakyRenderer).unwrap();
    assert_eq!(outcome.charts_written.len(), 2);
    assert_eq!(outcome.chart_failures.len(), 1);
    assert_eq!(outcome.chart_failures[0].file_name, "icu_histogram_countrya.png");
    assert_eq!(outcome.report.correlation, Some(1.0));
}

#[test]
fn test_empty_subject_is_fatal() {
    let cases = load::read_wide_cases(TWO_DAY_CASES.as_bytes(), Path::new("cases.csv")).unwrap();
    let hosps =
        load::read_hospitalizations(TWO_DAY_HOSPITALIZATIONS.as_bytes(), Path::new("hosp.csv")).unwrap();

    let mut renderer = RecordingRenderer::default();
    let result = Pipeline::run(&config("Brazil", "CountryA"), &hosps, &cases, &mut renderer);
    assert!(matches!(
        result,
        Err(PipelineError::Population(
            PopulationError::EmptySubjectPopulation { .. }
        ))
    ));
    assert!(renderer.rendered.is_empty());
}

#[test]
fn test_indicator_mismatch_leaves_no_subject_rows() {
    let cases = load::read_wide_cases(TWO_DAY_CASES.as_bytes(), Path::new("cases.csv")).unwrap();
    let hosps =
        load::read_hospitalizations(TWO_DAY_HOSPITALIZATIONS.as_bytes(), Path::new("hosp.csv")).unwrap();
    let config = AnalysisConfig {
        indicator_label: "daily icu occupancy".into(),
        ..config("CountryA", "CountryB")
    };
    assert!(Pipeline::run(&config, &hosps, &cases, &mut RecordingRenderer::default()).is_err());
}

#[test]
fn test_invalid_config_is_rejected_before_analysis() {
    let mut renderer = RecordingRenderer::default();
    let result = Pipeline::run(
        &config("Brazil", "Brazil"),
        &Default::default(),
        &Default::default(),
        &mut renderer,
    );
    assert!(matches!(result, Err(PipelineError::Config(_))));
}

#[test]
fn test_missing_input_file_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("covid-hospitalizations.csv");
    let err = load::load_hospitalizations(&path).unwrap_err();
    assert!(matches!(err, LoadError::MissingInputFile { .. }));
    assert!(err.to_string().contains("covid-hospitalizations.csv"));
}

#[test]
fn test_join_keys_exist_in_both_sources() {
    let cases = "\
date,A,B
2021-01-01,1,2
2021-01-02,3,
2021-01-03,5,6
";
    let hosps = "\
entity,date,indicator,value
A,2021-01-02 00:00:00,Daily ICU occupancy,1
B , 2021-01-02,Daily ICU occupancy,2
B,2021-01-03,Daily ICU occupancy,
C,2021-01-01,Daily ICU occupancy,4
";
    let cases = load::read_wide_cases(cases.as_bytes(), Path::new("cases.csv")).unwrap();
    let hosps = load::read_hospitalizations(hosps.as_bytes(), Path::new("hosp.csv")).unwrap();

    let outcome = Pipeline::run(
        &config("B", "A"),
        &hosps,
        &cases,
        &mut RecordingRenderer::default(),
    )
    .unwrap();

    assert_eq!(
        keys(&outcome.populations.subject.rows),
        vec![
            ("2021-01-02".to_owned(), "B".to_owned()),
            ("2021-01-03".to_owned(), "B".to_owned()),
        ]
    );
    let comparison = outcome.populations.comparison.as_ref().unwrap();
    assert_eq!(
        keys(&comparison.rows),
        vec![("2021-01-02".to_owned(), "A".to_owned())]
    );

    // B's total on 2021-01-02 is missing, so differencing starts on 2021-01-03
    let new_cases = outcome
        .populations
        .subject
        .rows
        .iter()
        .map(|r| r.new_cases)
        .collect::<Vec<_>>();
    assert_eq!(new_cases, vec![None, Some(0.0)]);
}
