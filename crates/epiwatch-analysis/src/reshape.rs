//! Wide ⇄ long conversion of the case table

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::record::{CaseRecordLong, LongCaseTable, WideCaseRow, WideCaseTable};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ReshapeError {
    #[display("duplicate record for ({date}, {entity})")]
    DuplicateKey { date: NaiveDate, entity: String },
}

/// Converts the wide case table into long form.
///
/// Emits one record per (date row, country column) in row-major order. Cell
/// values, including missing ones, are carried over unchanged.
#[must_use]
pub fn wide_to_long(wide: &WideCaseTable) -> LongCaseTable {
    let records = wide
        .rows
        .iter()
        .flat_map(|row| {
            wide.countries
                .iter()
                .zip(&row.totals)
                .map(|(country, total)| CaseRecordLong {
                    date: row.date,
                    entity: country.clone(),
                    total_cases: *total,
                })
        })
        .collect();
    LongCaseTable { records }
}

/// Pivots a long case table back into wide form.
///
/// Countries become columns in order of first appearance and dates become
/// rows in order of first appearance. Cells with no record are missing.
pub fn long_to_wide(long: &LongCaseTable) -> Result<WideCaseTable, ReshapeError> {
    let mut countries = Vec::<String>::new();
    let mut country_index = HashMap::<&str, usize>::new();
    let mut dates = Vec::<NaiveDate>::new();
    let mut date_index = HashMap::<NaiveDate, usize>::new();

    for record in &long.records {
        if !country_index.contains_key(record.entity.as_str()) {
            country_index.insert(&record.entity, countries.len());
            countries.push(record.entity.clone());
        }
        date_index.entry(record.date).or_insert_with(|| {
            dates.push(record.date);
            dates.len() - 1
        });
    }

    let mut cells = vec![vec![None; countries.len()]; dates.len()];
    let mut seen = vec![vec![false; countries.len()]; dates.len()];
    for record in &long.records {
        let row = date_index[&record.date];
        let column = country_index[record.entity.as_str()];
        if seen[row][column] {
            return Err(ReshapeError::DuplicateKey {
                date: record.date,
                entity: record.entity.clone(),
            });
        }
        seen[row][column] = true;
        cells[row][column] = record.total_cases;
    }

    let rows = dates
        .into_iter()
        .zip(cells)
        .map(|(date, totals)| WideCaseRow { date, totals })
        .collect();
    Ok(WideCaseTable { countries, rows })
}
