//! Subject and comparison populations

use serde::Serialize;

use crate::{config::AnalysisConfig, record::AnalysisRow};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum PopulationError {
    #[display("no rows for subject country '{country}' after join and indicator filter")]
    EmptySubjectPopulation { country: String },
}

/// The analysis rows of one country, ordered by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Population {
    pub country: String,
    pub rows: Vec<AnalysisRow>,
}

impl Population {
    /// Non-missing `new_cases` values.
    pub fn new_cases(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(|row| row.new_cases)
    }

    /// Non-missing `icu_occupancy` values.
    pub fn icu_occupancy(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(|row| row.icu_occupancy)
    }
}

/// Disjoint subject and comparison subsets of the analysis rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Populations {
    pub subject: Population,
    /// `None` when the comparison country has no rows
    pub comparison: Option<Population>,
}

impl Populations {
    /// Splits `rows` into the configured subject and comparison countries.
    ///
    /// Rows of other countries are discarded. An empty subject is an error; an
    /// empty comparison yields `comparison: None`.
    pub fn select(rows: Vec<AnalysisRow>, config: &AnalysisConfig) -> Result<Self, PopulationError> {
        let subject_country = config.subject_country.trim();
        let comparison_country = config.comparison_country.trim();

        let (mut subject_rows, mut comparison_rows) = (vec![], vec![]);
        for row in rows {
            if row.entity == subject_country {
                subject_rows.push(row);
            } else if row.entity == comparison_country {
                comparison_rows.push(row);
            }
        }

        if subject_rows.is_empty() {
            return Err(PopulationError::EmptySubjectPopulation {
                country: subject_country.to_owned(),
            });
        }
        subject_rows.sort_by_key(|row| row.date);
        comparison_rows.sort_by_key(|row| row.date);

        let comparison = (!comparison_rows.is_empty()).then(|| Population {
            country: comparison_country.to_owned(),
            rows: comparison_rows,
        });

        Ok(Self {
            subject: Population {
                country: subject_country.to_owned(),
                rows: subject_rows,
            },
            comparison,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn row(entity: &str, day: u32, icu: Option<f64>) -> AnalysisRow {
        AnalysisRow {
            date: NaiveDate::from_ymd_opt(2021, 2, day).unwrap(),
            entity: entity.into(),
            total_cases: Some(1.0),
            new_cases: Some(0.0),
            indicator: "Daily ICU occupancy".into(),
            icu_occupancy: icu,
        }
    }

    fn config(subject: &str, comparison: &str) -> AnalysisConfig {
        AnalysisConfig {
            subject_country: subject.into(),
            comparison_country: comparison.into(),
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_select_splits_disjointly() {
        let rows = vec![
            row("A", 2, Some(1.0)),
            row("B", 1, Some(2.0)),
            row("C", 1, Some(3.0)),
            row("A", 1, None),
        ];
        let populations = Populations::select(rows, &config("A", "B")).unwrap();
        assert_eq!(populations.subject.rows.len(), 2);
        assert_eq!(populations.subject.rows[0].date.to_string(), "2021-02-01");
        assert_eq!(populations.subject.icu_occupancy().collect::<Vec<_>>(), vec![1.0]);
        let comparison = populations.comparison.unwrap();
        assert_eq!(comparison.country, "B");
        assert!(comparison.rows.iter().all(|r| r.entity == "B"));
    }

    #[test]
    fn test_empty_subject_is_fatal() {
        let rows = vec![row("B", 1, Some(2.0))];
        assert_eq!(
            Populations::select(rows, &config("A", "B")),
            Err(PopulationError::EmptySubjectPopulation {
                country: "A".into()
            })
        );
    }

    #[test]
    fn test_empty_comparison_is_none() {
        let rows = vec![row("A", 1, Some(2.0))];
        let populations = Populations::select(rows, &config("A", "B")).unwrap();
        assert!(populations.comparison.is_none());
    }
}
