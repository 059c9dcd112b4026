//! Console report

use epiwatch_analysis::{
    pipeline::AnalysisOutcome,
    report::{AnalysisReport, HypothesisOutcome},
};
use epiwatch_stats::descriptive::DescriptiveStats;

pub fn print_report(outcome: &AnalysisOutcome) {
    let report = &outcome.report;

    println!("==========================================");
    println!(
        "{} Analysis: {} vs {}",
        report.indicator_label, report.subject_country, report.comparison_country
    );
    println!("==========================================\n");
    println!(
        "Rows: {} for {}, {} for {}\n",
        report.subject_rows, report.subject_country, report.comparison_rows, report.comparison_country
    );

    print_descriptive_table(report);
    println!();

    print_correlation(report);
    println!();

    print_hypothesis_test(report);
    println!();

    print_exceedance(report);
    println!();

    println!("Charts");
    println!("------");
    if outcome.charts_written.is_empty() {
        println!("  (none)");
    }
    for path in &outcome.charts_written {
        println!("  saved:  {}", path.display());
    }
    for failure in &outcome.chart_failures {
        println!("  failed: {} ({})", failure.file_name, failure.error);
    }
}

fn print_descriptive_table(report: &AnalysisReport) {
    println!("Descriptive Statistics ({})", report.subject_country);
    println!("------------------------------------------");
    println!("  {:<8} {:>16} {:>16}", "", "new_cases", "icu_occupancy");
    println!("  {}", "-".repeat(42));

    let rows: [(&str, fn(&DescriptiveStats) -> String); 8] = [
        ("count", |s| s.count.to_string()),
        ("mean", |s| format!("{:.2}", s.mean)),
        ("std", |s| s.std_dev.map_or("N/A".to_owned(), |v| format!("{v:.2}"))),
        ("min", |s| format!("{:.2}", s.min)),
        ("25%", |s| format!("{:.2}", s.q1)),
        ("50%", |s| format!("{:.2}", s.median)),
        ("75%", |s| format!("{:.2}", s.q3)),
        ("max", |s| format!("{:.2}", s.max)),
    ];
    for (label, value) in rows {
        let cell = |stats: Option<&DescriptiveStats>| match stats {
            Some(stats) => value(stats),
            None if label == "count" => "0".to_owned(),
            None => "N/A".to_owned(),
        };
        println!(
            "  {:<8} {:>16} {:>16}",
            label,
            cell(report.new_cases.as_ref()),
            cell(report.icu_occupancy.as_ref()),
        );
    }
}

fn print_correlation(report: &AnalysisReport) {
    println!("Correlation");
    println!("-----------");
    match report.correlation {
        Some(r) => println!("  Pearson r (new_cases, icu_occupancy): {r:.4}"),
        None => println!("  Pearson r (new_cases, icu_occupancy): undefined"),
    }
}

fn print_hypothesis_test(report: &AnalysisReport) {
    println!("Welch's t-test (ICU occupancy)");
    println!("------------------------------");
    match &report.hypothesis_test {
        HypothesisOutcome::Completed { test, .. } => {
            println!(
                "  Mean {:<20} {:>12.2} (n = {})",
                report.subject_country, test.mean_a, test.n_a
            );
            println!(
                "  Mean {:<20} {:>12.2} (n = {})",
                report.comparison_country, test.mean_b, test.n_b
            );
            println!("  t statistic               {:>12.4}", test.t_statistic);
            println!("  degrees of freedom        {:>12.2}", test.degrees_of_freedom);
            println!("  p-value                   {:>12.4e}", test.p_value);
        }
        HypothesisOutcome::Skipped { .. } => println!("  SKIPPED"),
    }
    println!("  {}", report.conclusion());
}

fn print_exceedance(report: &AnalysisReport) {
    println!("Exceedance Probability (ICU occupancy)");
    println!("--------------------------------------");
    match &report.exceedance {
        Some(tail) => {
            println!(
                "  Threshold (P{:.0}): {:.2}",
                tail.percentile, tail.threshold
            );
            println!(
                "  P(ICU occupancy > threshold) = {:.2}% ({} of {} days)",
                tail.probability * 100.0,
                tail.exceeding,
                tail.total
            );
        }
        None => println!("  No ICU occupancy observations"),
    }
}
