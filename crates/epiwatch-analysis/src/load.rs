//! CSV loading and key normalization
//!
//! Both input tables pass their dates through [`normalize_date`] and their
//! country names through [`normalize_entity`], so the (date, entity) join keys
//! of the two sources compare equal whenever they denote the same day and
//! country.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::record::{HospitalizationRecord, HospitalizationTable, WideCaseRow, WideCaseTable};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

const DATE_COLUMN: &str = "date";
const ENTITY_COLUMN: &str = "entity";
const INDICATOR_COLUMN: &str = "indicator";
const VALUE_COLUMN: &str = "value";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("input file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },
    #[display("failed to open {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to parse CSV in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[display("{}: missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[display("{}: duplicate column '{column}'", path.display())]
    DuplicateColumn { path: PathBuf, column: String },
    #[display("{}:{line}: invalid date '{value}'", path.display())]
    InvalidDate {
        path: PathBuf,
        line: u64,
        value: String,
    },
    #[display("{}:{line}: invalid number '{value}' in column '{column}'", path.display())]
    InvalidNumber {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },
}

/// Parses a calendar day, ignoring surrounding whitespace.
///
/// Accepts `YYYY-MM-DD` and timestamps starting with it, which are truncated
/// to the day.
#[must_use]
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|datetime| datetime.date())
}

/// Canonical form of a country name.
#[must_use]
pub fn normalize_entity(raw: &str) -> String {
    raw.trim().to_owned()
}

/// Parses a count cell. Empty cells and `NaN` markers are missing values;
/// negative or non-finite numbers are rejected.
fn parse_optional_number(raw: &str) -> Result<Option<f64>, ()> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(()),
    }
}

fn open_input(path: &Path) -> Result<File, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingInputFile {
            path: path.to_owned(),
        });
    }
    File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::MissingInputFile {
            path: path.to_owned(),
        },
        _ => LoadError::Io {
            path: path.to_owned(),
            source,
        },
    })
}

fn csv_reader<R>(reader: R) -> csv::Reader<R>
where
    R: io::Read,
{
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

fn column_index(headers: &StringRecord, column: &str, path: &Path) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_owned(),
            column: column.to_owned(),
        })
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

fn parse_date_field(record: &StringRecord, index: usize, path: &Path) -> Result<NaiveDate, LoadError> {
    let raw = record.get(index).unwrap_or_default();
    normalize_date(raw).ok_or_else(|| LoadError::InvalidDate {
        path: path.to_owned(),
        line: line_of(record),
        value: raw.to_owned(),
    })
}

fn parse_number_field(
    record: &StringRecord,
    index: usize,
    column: &str,
    path: &Path,
) -> Result<Option<f64>, LoadError> {
    let raw = record.get(index).unwrap_or_default();
    parse_optional_number(raw).map_err(|()| LoadError::InvalidNumber {
        path: path.to_owned(),
        line: line_of(record),
        column: column.to_owned(),
        value: raw.to_owned(),
    })
}

/// Loads the hospitalization table from a CSV file.
///
/// Required columns: `date`, `entity`, `indicator`, `value`. Other columns
/// are ignored.
pub fn load_hospitalizations(path: &Path) -> Result<HospitalizationTable, LoadError> {
    let file = open_input(path)?;
    let table = read_hospitalizations(file, path)?;
    log::info!(
        "Loaded {} hospitalization records from {}",
        table.records.len(),
        path.display()
    );
    Ok(table)
}

/// Reads the hospitalization table from any CSV source; `origin` names the
/// source in error messages.
pub fn read_hospitalizations<R>(reader: R, origin: &Path) -> Result<HospitalizationTable, LoadError>
where
    R: io::Read,
{
    let csv_error = |source| LoadError::Csv {
        path: origin.to_owned(),
        source,
    };

    let mut reader = csv_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    let date_idx = column_index(&headers, DATE_COLUMN, origin)?;
    let entity_idx = column_index(&headers, ENTITY_COLUMN, origin)?;
    let indicator_idx = column_index(&headers, INDICATOR_COLUMN, origin)?;
    let value_idx = column_index(&headers, VALUE_COLUMN, origin)?;

    let mut records = vec![];
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        records.push(HospitalizationRecord {
            date: parse_date_field(&record, date_idx, origin)?,
            entity: normalize_entity(record.get(entity_idx).unwrap_or_default()),
            indicator: record.get(indicator_idx).unwrap_or_default().to_owned(),
            value: parse_number_field(&record, value_idx, VALUE_COLUMN, origin)?,
        });
    }

    Ok(HospitalizationTable { records })
}

/// Loads the wide case-count table from a CSV file.
///
/// The `date` column is required; every other column is a country.
pub fn load_wide_cases(path: &Path) -> Result<WideCaseTable, LoadError> {
    let file = open_input(path)?;
    let table = read_wide_cases(file, path)?;
    log::info!(
        "Loaded {} dates x {} countries of case totals from {}",
        table.rows.len(),
        table.countries.len(),
        path.display()
    );
    Ok(table)
}

/// Reads the wide case-count table from any CSV source; `origin` names the
/// source in error messages.
pub fn read_wide_cases<R>(reader: R, origin: &Path) -> Result<WideCaseTable, LoadError>
where
    R: io::Read,
{
    let csv_error = |source| LoadError::Csv {
        path: origin.to_owned(),
        source,
    };

    let mut reader = csv_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    let date_idx = column_index(&headers, DATE_COLUMN, origin)?;

    let country_columns = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != date_idx)
        .map(|(idx, name)| (idx, normalize_entity(name)))
        .collect::<Vec<_>>();
    for (i, (_, name)) in country_columns.iter().enumerate() {
        if country_columns[..i].iter().any(|(_, other)| other == name) {
            return Err(LoadError::DuplicateColumn {
                path: origin.to_owned(),
                column: name.clone(),
            });
        }
    }

    let mut rows = vec![];
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let date = parse_date_field(&record, date_idx, origin)?;
        let totals = country_columns
            .iter()
            .map(|(idx, name)| parse_number_field(&record, *idx, name, origin))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(WideCaseRow { date, totals });
    }

    Ok(WideCaseTable {
        countries: country_columns.into_iter().map(|(_, name)| name).collect(),
        rows,
    })
}
