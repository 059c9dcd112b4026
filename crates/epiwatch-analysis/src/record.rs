//! Tabular data model
//!
//! Every table is an ordered sequence of records held fully in memory. Tables
//! are built once by the [`load`](crate::load) module and never mutated; the
//! transformations in [`reshape`](crate::reshape) and [`join`](crate::join)
//! produce new tables.
//!
//! # Tables
//!
//! ```text
//! HospitalizationTable           WideCaseTable
//! (date, entity, indicator,      date | Brazil | Argentina | ...
//!  value)                        -----+--------+-----------+----
//!                                     |  total |   total   |
//!          \                              |
//!           \                        wide_to_long
//!            \                            |
//!             \                      LongCaseTable
//!              \                     (date, entity, total_cases)
//!               \                         /
//!                +---- inner join -------+
//!                          |
//!                  filter indicator, difference per entity
//!                          |
//!                     AnalysisRow
//! ```

use chrono::NaiveDate;
use serde::Serialize;

/// One row of the hospitalization table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalizationRecord {
    /// Calendar day of the observation
    pub date: NaiveDate,
    /// Country name, whitespace-trimmed
    pub entity: String,
    /// Metric label, stored verbatim (e.g. `Daily ICU occupancy`)
    pub indicator: String,
    /// Observed count, `None` when missing
    pub value: Option<f64>,
}

/// Hospitalization table in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HospitalizationTable {
    pub records: Vec<HospitalizationRecord>,
}

/// Cumulative case counts with one row per date and one column per country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideCaseTable {
    /// Country column names in file order
    pub countries: Vec<String>,
    /// Rows in file order; each row has one cell per entry of `countries`
    pub rows: Vec<WideCaseRow>,
}

/// A single date row of a [`WideCaseTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct WideCaseRow {
    pub date: NaiveDate,
    /// Cumulative totals aligned with [`WideCaseTable::countries`], `None` when missing
    pub totals: Vec<Option<f64>>,
}

impl WideCaseTable {
    /// Number of cells (rows × countries).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.countries.len()
    }

    /// Looks up the cell for `(date, country)`.
    ///
    /// Returns `None` when either the date row or the country column is absent,
    /// and `Some(None)` for a present but missing cell.
    #[must_use]
    pub fn get(&self, date: NaiveDate, country: &str) -> Option<Option<f64>> {
        let column = self.countries.iter().position(|c| c == country)?;
        let row = self.rows.iter().find(|row| row.date == date)?;
        row.totals.get(column).copied()
    }
}

/// One (date, country) cell of the case table in long form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecordLong {
    pub date: NaiveDate,
    pub entity: String,
    /// Cumulative total, `None` when the wide cell was missing
    pub total_cases: Option<f64>,
}

/// Case table in long form, in row-major order of the wide table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongCaseTable {
    pub records: Vec<CaseRecordLong>,
}

/// A joined, filtered and differenced observation for one country and day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    pub date: NaiveDate,
    pub entity: String,
    pub total_cases: Option<f64>,
    /// Day-over-day change of `total_cases` within the entity; 0 on the first row
    pub new_cases: Option<f64>,
    pub indicator: String,
    pub icu_occupancy: Option<f64>,
}
