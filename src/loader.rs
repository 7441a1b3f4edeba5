//! Delimited-file loader.
//!
//! Reads outbreak reports into a [`Table`], resolving missing cells through the
//! configured [`ImputationPolicy`] and parsing the `date` column when present.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{Imputation, ImputationPolicy};
use crate::error::{AnalysisError, Result};
use crate::table::{Field, Record, Table};

/// Cell values treated as missing, in addition to the empty string.
const NA_VALUES: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Loads and cleans the file at `path`.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if the file cannot be opened, and
/// [`AnalysisError::InvalidValue`] for an unparsable date or number.
pub fn load_table(
    path: impl AsRef<Path>,
    policy: &ImputationPolicy,
    delimiter: u8,
) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = load_from_reader(file, policy, delimiter)?;
    info!(path = %path.display(), rows = table.len(), "Loaded outbreak table");
    Ok(table)
}

/// Loads a table from any reader; the first line must be a header row.
pub fn load_from_reader<R: Read>(
    reader: R,
    policy: &ImputationPolicy,
    delimiter: u8,
) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let columns: Vec<(usize, Field)> = rdr
        .headers()?
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| Field::from_header(header).map(|f| (idx, f)))
        .collect();

    debug!(
        fields = ?columns.iter().map(|(_, f)| f.name()).collect::<Vec<_>>(),
        "Recognised columns"
    );

    let mut records = Vec::new();
    let mut imputed = 0usize;

    for (idx, result) in rdr.records().enumerate() {
        let row = result?;
        // Physical line where the record starts; blank lines and quoted
        // newlines make this differ from the record index.
        let line = row.position().map_or(idx + 2, |pos| pos.line() as usize);
        records.push(parse_record(&row, &columns, policy, line, &mut imputed)?);
    }

    if imputed > 0 {
        debug!(imputed, "Filled missing cells");
    }

    Ok(Table::new(columns.into_iter().map(|(_, f)| f), records))
}

fn parse_record(
    row: &StringRecord,
    columns: &[(usize, Field)],
    policy: &ImputationPolicy,
    line: usize,
    imputed: &mut usize,
) -> Result<Record> {
    let mut record = Record::default();

    for &(idx, field) in columns {
        let raw = row.get(idx).filter(|cell| !is_missing(cell));
        let strategy = policy.strategy(field);
        if raw.is_none() && strategy == Imputation::Zero {
            *imputed += 1;
        }

        let invalid = |value: &str| AnalysisError::InvalidValue {
            row: line,
            field,
            value: value.to_string(),
        };

        match field {
            Field::OutbreakId => record.outbreak_id = label(raw, strategy),
            Field::Contaminant => record.contaminant = label(raw, strategy),
            Field::Location => record.location = label(raw, strategy),
            Field::Date => {
                record.date = match raw {
                    Some(value) => Some(parse_date(value).ok_or_else(|| invalid(value))?),
                    None => match strategy {
                        Imputation::Zero => Some(NaiveDate::default()),
                        Imputation::Missing => None,
                    },
                }
            }
            Field::Illnesses | Field::Hospitalizations | Field::Deaths => {
                let value = match raw {
                    Some(value) => Some(
                        value
                            .parse::<f64>()
                            .ok()
                            .filter(|n| n.is_finite())
                            .ok_or_else(|| invalid(value))?,
                    ),
                    None => match strategy {
                        Imputation::Zero => Some(0.0),
                        Imputation::Missing => None,
                    },
                };
                match field {
                    Field::Illnesses => record.illnesses = value,
                    Field::Hospitalizations => record.hospitalizations = value,
                    _ => record.deaths = value,
                }
            }
        }
    }

    Ok(record)
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NA_VALUES.contains(&cell)
}

fn label(raw: Option<&str>, strategy: Imputation) -> Option<String> {
    match (raw, strategy) {
        (Some(value), _) => Some(value.to_string()),
        (None, Imputation::Zero) => Some("0".to_string()),
        (None, Imputation::Missing) => None,
    }
}

/// Parses a calendar date from the formats commonly found in outbreak exports.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.date());
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}
