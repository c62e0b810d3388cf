//! CSV loaders for the two source tables
//!
//! - **roster**: one row per employee (`EmpList.csv`)
//! - **catalog**: one row per organizational post
//!
//! Loaders are lenient where the source data is known to be messy: optional
//! columns may be missing entirely, and empty or unparsable optional values
//! are read as absent. A required value that cannot be read fails the whole
//! load, naming the data row (1-based) and the column.
//!
//! Only header names are trimmed. Text values such as status and track are
//! kept verbatim, so `"Regular "` is not the `Regular` status. Numbers and
//! dates tolerate surrounding whitespace.

pub mod catalog;
pub mod roster;

pub use catalog::{load_posts, read_posts};
pub use roster::{load_employees, read_employees};

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Date formats accepted in source files, tried in order
const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Errors that can occur while loading source tables
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: missing value for column {field}")]
    MissingField { row: usize, field: &'static str },

    #[error("Row {row}: invalid value {value:?} for column {field}")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Parse a source date (`M/d/yyyy`, or ISO `yyyy-MM-dd`)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn csv_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader)
}

fn open(path: &std::path::Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn required<'a>(
    row: usize,
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, LoadError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(LoadError::MissingField { row, field }),
    }
}

fn required_u32(
    row: usize,
    field: &'static str,
    value: &Option<String>,
) -> Result<u32, LoadError> {
    let raw = required(row, field, value)?;
    raw.trim().parse().map_err(|_| LoadError::InvalidField {
        row,
        field,
        value: raw.to_string(),
    })
}

fn required_date(
    row: usize,
    field: &'static str,
    value: &Option<String>,
) -> Result<NaiveDate, LoadError> {
    let raw = required(row, field, value)?;
    parse_date(raw).ok_or_else(|| LoadError::InvalidField {
        row,
        field,
        value: raw.to_string(),
    })
}
