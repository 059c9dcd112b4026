//! Joining, filtering and per-country differencing
//!
//! [`build_analysis_rows`] applies the three steps in the only valid order:
//!
//! 1. [`inner_join`] the long case table with the hospitalization table on
//!    (date, entity)
//! 2. [`filter_indicator`] down to the configured metric
//! 3. [`compute_new_cases`] within each entity, sorted by date
//!
//! Differencing before the join would take deltas across rows that the join
//! later drops, so the steps are kept as separate pure functions and composed
//! here.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::record::{AnalysisRow, HospitalizationTable, LongCaseTable};

/// A (date, entity) match between the case and hospitalization tables.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub date: NaiveDate,
    pub entity: String,
    pub total_cases: Option<f64>,
    pub indicator: String,
    pub value: Option<f64>,
}

/// Inner join on the exact (date, entity) key.
///
/// Produces one row per matching pair of records, ordered by the case table
/// and then by the hospitalization table. Keys present in only one table are
/// dropped.
#[must_use]
pub fn inner_join(cases: &LongCaseTable, hospitalizations: &HospitalizationTable) -> Vec<JoinedRow> {
    let mut by_key = HashMap::<(NaiveDate, &str), Vec<usize>>::new();
    for (idx, record) in hospitalizations.records.iter().enumerate() {
        by_key
            .entry((record.date, record.entity.as_str()))
            .or_default()
            .push(idx);
    }

    cases
        .records
        .iter()
        .flat_map(|case| {
            by_key
                .get(&(case.date, case.entity.as_str()))
                .into_iter()
                .flatten()
                .map(move |&idx| {
                    let hosp = &hospitalizations.records[idx];
                    JoinedRow {
                        date: case.date,
                        entity: case.entity.clone(),
                        total_cases: case.total_cases,
                        indicator: hosp.indicator.clone(),
                        value: hosp.value,
                    }
                })
        })
        .collect()
}

/// Keeps rows whose indicator equals `label` exactly.
#[must_use]
pub fn filter_indicator(rows: Vec<JoinedRow>, label: &str) -> Vec<JoinedRow> {
    rows.into_iter().filter(|row| row.indicator == label).collect()
}

/// Computes day-over-day new cases within each entity.
///
/// Rows are grouped by entity and stably sorted by date. The first row of each
/// group that has a total gets `new_cases = 0`; later rows get the difference
/// to the previous row's total, or `None` when either total is missing. Rows
/// before the first observed total get `None`. The result is ordered by
/// (entity, date).
#[must_use]
pub fn compute_new_cases(rows: Vec<JoinedRow>) -> Vec<AnalysisRow> {
    let mut groups = BTreeMap::<String, Vec<JoinedRow>>::new();
    for row in rows {
        groups.entry(row.entity.clone()).or_default().push(row);
    }

    let mut output = vec![];
    for group in groups.into_values() {
        let mut group = group;
        group.sort_by_key(|row| row.date);

        let mut previous_total = None;
        let mut observed = false;
        for row in group {
            let new_cases = match (row.total_cases, previous_total) {
                (Some(_), _) if !observed => Some(0.0),
                (Some(current), Some(previous)) => Some(current - previous),
                _ => None,
            };
            observed |= row.total_cases.is_some();
            previous_total = row.total_cases;
            output.push(AnalysisRow {
                date: row.date,
                entity: row.entity,
                total_cases: row.total_cases,
                new_cases,
                indicator: row.indicator,
                icu_occupancy: row.value,
            });
        }
    }
    output
}

/// Join, filter and difference in that order.
#[must_use]
pub fn build_analysis_rows(
    cases: &LongCaseTable,
    hospitalizations: &HospitalizationTable,
    indicator_label: &str,
) -> Vec<AnalysisRow> {
    let joined = inner_join(cases, hospitalizations);
    let joined_count = joined.len();
    let filtered = filter_indicator(joined, indicator_label);
    log::info!(
        "Joined {joined_count} rows, {} match indicator '{indicator_label}'",
        filtered.len()
    );
    compute_new_cases(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CaseRecordLong, HospitalizationRecord};

    const ICU: &str = "Daily ICU occupancy";

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    fn case(day: u32, entity: &str, total: Option<f64>) -> CaseRecordLong {
        CaseRecordLong {
            date: date(day),
            entity: entity.into(),
            total_cases: total,
        }
    }

    fn hosp(day: u32, entity: &str, indicator: &str, value: Option<f64>) -> HospitalizationRecord {
        HospitalizationRecord {
            date: date(day),
            entity: entity.into(),
            indicator: indicator.into(),
            value,
        }
    }

    #[test]
    fn test_inner_join_drops_unmatched_keys() {
        let cases = LongCaseTable {
            records: vec![
                case(1, "A", Some(1.0)),
                case(2, "A", Some(2.0)),
                case(1, "B", Some(5.0)),
            ],
        };
        let hosps = HospitalizationTable {
            records: vec![
                hosp(2, "A", ICU, Some(3.0)),
                hosp(3, "A", ICU, Some(4.0)),
                hosp(1, "C", ICU, Some(9.0)),
            ],
        };
        let joined = inner_join(&cases, &hosps);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].date, date(2));
        assert_eq!(joined[0].entity, "A");
        assert_eq!(joined[0].total_cases, Some(2.0));
        assert_eq!(joined[0].value, Some(3.0));
    }

    #[test]
    fn test_join_is_one_row_per_indicator() {
        let cases = LongCaseTable {
            records: vec![case(1, "A", Some(1.0))],
        };
        let hosps = HospitalizationTable {
            records: vec![
                hosp(1, "A", ICU, Some(3.0)),
                hosp(1, "A", "Daily hospital occupancy", Some(30.0)),
            ],
        };
        let joined = inner_join(&cases, &hosps);
        assert_eq!(joined.len(), 2);
        let filtered = filter_indicator(joined, ICU);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].value, Some(3.0));
    }

    #[test]
    fn test_filter_is_exact() {
        let rows = vec![
            JoinedRow {
                date: date(1),
                entity: "A".into(),
                total_cases: None,
                indicator: "daily icu occupancy".into(),
                value: None,
            },
            JoinedRow {
                date: date(1),
                entity: "A".into(),
                total_cases: None,
                indicator: format!("{ICU} "),
                value: None,
            },
        ];
        assert!(filter_indicator(rows, ICU).is_empty());
    }

    #[test]
    fn test_differencing_per_group() {
        let rows = vec![
            ("B", 3, Some(40.0)),
            ("A", 2, Some(150.0)),
            ("B", 1, Some(10.0)),
            ("A", 1, Some(100.0)),
            ("A", 4, Some(190.0)),
        ]
        .into_iter()
        .map(|(entity, day, total)| JoinedRow {
            date: date(day),
            entity: entity.into(),
            total_cases: total,
            indicator: ICU.into(),
            value: Some(1.0),
        })
        .collect();

        let output = compute_new_cases(rows);
        let summary = output
            .iter()
            .map(|r| (r.entity.as_str(), r.date, r.new_cases))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                ("A", date(1), Some(0.0)),
                ("A", date(2), Some(50.0)),
                ("A", date(4), Some(40.0)),
                ("B", date(1), Some(0.0)),
                ("B", date(3), Some(30.0)),
            ]
        );
    }

    #[test]
    fn test_differencing_with_missing_totals() {
        let rows = [Some(10.0), None, Some(30.0), Some(35.0)]
            .into_iter()
            .zip(1..)
            .map(|(total, day)| JoinedRow {
                date: date(day),
                entity: "A".into(),
                total_cases: total,
                indicator: ICU.into(),
                value: None,
            })
            .collect();
        let new_cases = compute_new_cases(rows)
            .into_iter()
            .map(|r| r.new_cases)
            .collect::<Vec<_>>();
        assert_eq!(new_cases, vec![Some(0.0), None, None, Some(5.0)]);
    }

    #[test]
    fn test_differencing_starts_at_first_observed_total() {
        let rows = [None, Some(100.0), Some(150.0)]
            .into_iter()
            .zip(1..)
            .map(|(total, day)| JoinedRow {
                date: date(day),
                entity: "A".into(),
                total_cases: total,
                indicator: ICU.into(),
                value: None,
            })
            .collect();
        let new_cases = compute_new_cases(rows)
            .into_iter()
            .map(|r| r.new_cases)
            .collect::<Vec<_>>();
        assert_eq!(new_cases, vec![None, Some(0.0), Some(50.0)]);
    }

    #[test]
    fn test_differencing_happens_after_filter() {
        // Day 2 only has a non-ICU indicator, so the ICU series skips it
        let cases = LongCaseTable {
            records: vec![
                case(1, "A", Some(100.0)),
                case(2, "A", Some(120.0)),
                case(3, "A", Some(160.0)),
            ],
        };
        let hosps = HospitalizationTable {
            records: vec![
                hosp(1, "A", ICU, Some(5.0)),
                hosp(2, "A", "Weekly new hospital admissions", Some(8.0)),
                hosp(3, "A", ICU, Some(6.0)),
            ],
        };
        let rows = build_analysis_rows(&cases, &hosps, ICU);
        let new_cases = rows.iter().map(|r| r.new_cases).collect::<Vec<_>>();
        assert_eq!(new_cases, vec![Some(0.0), Some(60.0)]);
    }
}
