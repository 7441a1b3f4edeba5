//! In-memory outbreak table.
//!
//! A [`Table`] is built once by the loader and only read afterwards. It keeps
//! the set of header fields that were present so analyzers can report a
//! schema error at first use instead of silently treating a whole column as
//! missing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{AnalysisError, Result};

/// A column recognised by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    OutbreakId,
    Date,
    Contaminant,
    Location,
    Illnesses,
    Hospitalizations,
    Deaths,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::OutbreakId,
        Field::Date,
        Field::Contaminant,
        Field::Location,
        Field::Illnesses,
        Field::Hospitalizations,
        Field::Deaths,
    ];

    /// Header name of the column in the input file.
    pub fn name(self) -> &'static str {
        match self {
            Field::OutbreakId => "outbreak_id",
            Field::Date => "date",
            Field::Contaminant => "contaminant",
            Field::Location => "location",
            Field::Illnesses => "illnesses",
            Field::Hospitalizations => "hospitalizations",
            Field::Deaths => "deaths",
        }
    }

    pub fn from_header(header: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == header.trim())
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::OutbreakId | Field::Contaminant | Field::Location => FieldKind::Label,
            Field::Date => FieldKind::Date,
            Field::Illnesses | Field::Hospitalizations | Field::Deaths => FieldKind::Numeric,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Label,
    Date,
    Numeric,
}

/// One outbreak report row.
///
/// `None` means the source cell was missing and the imputation policy left it
/// that way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub outbreak_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub contaminant: Option<String>,
    pub location: Option<String>,
    pub illnesses: Option<f64>,
    pub hospitalizations: Option<f64>,
    pub deaths: Option<f64>,
}

impl Record {
    pub fn label(&self, field: Field) -> Option<&str> {
        match field {
            Field::OutbreakId => self.outbreak_id.as_deref(),
            Field::Contaminant => self.contaminant.as_deref(),
            Field::Location => self.location.as_deref(),
            _ => None,
        }
    }

    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::Illnesses => self.illnesses,
            Field::Hospitalizations => self.hospitalizations,
            Field::Deaths => self.deaths,
            _ => None,
        }
    }
}

/// Ordered records sharing the schema described by `fields`.
#[derive(Debug, Clone, Default)]
pub struct Table {
    fields: BTreeSet<Field>,
    records: Vec<Record>,
}

impl Table {
    pub fn new(fields: impl IntoIterator<Item = Field>, records: Vec<Record>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            records,
        }
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    /// Fails with [`AnalysisError::MissingField`] for the first absent field.
    pub fn require(&self, fields: &[Field]) -> Result<()> {
        match fields.iter().find(|f| !self.has_field(**f)) {
            Some(missing) => Err(AnalysisError::MissingField(*missing)),
            None => Ok(()),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().copied()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of a numeric field over every row, skipping missing values.
    pub fn total(&self, field: Field) -> f64 {
        self.records.iter().filter_map(|r| r.number(field)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_trims_and_matches_exactly() {
        assert_eq!(Field::from_header(" date "), Some(Field::Date));
        assert_eq!(Field::from_header("outbreak_id"), Some(Field::OutbreakId));
        assert_eq!(Field::from_header("Date"), None);
        assert_eq!(Field::from_header("state"), None);
    }

    #[test]
    fn test_require_reports_first_missing_field() {
        let table = Table::new([Field::Location, Field::Illnesses], vec![]);
        assert!(table.require(&[Field::Location]).is_ok());

        let err = table
            .require(&[Field::Location, Field::Hospitalizations, Field::Deaths])
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingField(Field::Hospitalizations)
        ));
    }

    #[test]
    fn test_total_skips_missing_values() {
        let records = vec![
            Record {
                illnesses: Some(3.0),
                ..Default::default()
            },
            Record::default(),
            Record {
                illnesses: Some(4.5),
                ..Default::default()
            },
        ];
        let table = Table::new([Field::Illnesses], records);
        assert_eq!(table.total(Field::Illnesses), 7.5);
        assert_eq!(table.len(), 3);
    }
}
