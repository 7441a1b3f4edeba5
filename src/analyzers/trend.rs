use chrono::Datelike;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::analyzers::types::{TrendFit, TrendReport, YearlyCounts};
use crate::analyzers::utility::linear_fit;
use crate::config::CountMode;
use crate::error::Result;
use crate::table::{Field, Table};

/// Counts outbreaks per calendar year and fits a linear trend through them.
///
/// Rows without a date are left out. With [`CountMode::Rows`] every dated row
/// counts once; with [`CountMode::DistinctIds`] repeated outbreak identifiers
/// within a year count once and rows without an identifier are skipped.
///
/// # Errors
///
/// Fails with a missing-field error if the table has no `date` or
/// `outbreak_id` column.
pub fn analyze_trend(table: &Table, mode: CountMode) -> Result<TrendReport> {
    table.require(&[Field::Date, Field::OutbreakId])?;

    let yearly_counts = yearly_counts(table, mode);

    let points: Vec<(f64, f64)> = yearly_counts
        .iter()
        .map(|(year, count)| (*year as f64, *count as f64))
        .collect();

    let fit = match linear_fit(&points) {
        Some(line) => TrendFit::Linear {
            slope: line.slope,
            intercept: line.intercept,
            r_squared: line.r_squared,
        },
        None => TrendFit::Insufficient {
            distinct_years: yearly_counts.len(),
        },
    };

    info!(
        years = yearly_counts.len(),
        slope = ?fit.slope(),
        r_squared = ?fit.r_squared(),
        "Outbreak trend fitted"
    );

    Ok(TrendReport { yearly_counts, fit })
}

fn yearly_counts(table: &Table, mode: CountMode) -> YearlyCounts {
    let mut undated = 0usize;

    let counts = match mode {
        CountMode::Rows => {
            let mut counts = YearlyCounts::new();
            for record in table.records() {
                match record.date {
                    Some(date) => *counts.entry(date.year()).or_default() += 1,
                    None => undated += 1,
                }
            }
            counts
        }
        CountMode::DistinctIds => {
            let mut ids: BTreeMap<i32, BTreeSet<&str>> = BTreeMap::new();
            for record in table.records() {
                match (record.date, record.outbreak_id.as_deref()) {
                    (Some(date), Some(id)) => {
                        ids.entry(date.year()).or_default().insert(id);
                    }
                    (None, _) => undated += 1,
                    (Some(_), None) => {}
                }
            }
            ids.into_iter().map(|(year, set)| (year, set.len())).collect()
        }
    };

    if undated > 0 {
        debug!(undated, "Rows without a date excluded from yearly counts");
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::table::Record;
    use chrono::NaiveDate;

    fn row(id: &str, year: i32) -> Record {
        Record {
            outbreak_id: Some(id.to_string()),
            date: NaiveDate::from_ymd_opt(year, 6, 1),
            ..Default::default()
        }
    }

    fn table(records: Vec<Record>) -> Table {
        Table::new([Field::OutbreakId, Field::Date], records)
    }

    #[test]
    fn test_two_years_fit_perfectly() {
        let mut records = Vec::new();
        for i in 0..3 {
            records.push(row(&format!("a{i}"), 2010));
        }
        for i in 0..7 {
            records.push(row(&format!("b{i}"), 2020));
        }

        let report = analyze_trend(&table(records), CountMode::Rows).unwrap();

        assert_eq!(report.yearly_counts, YearlyCounts::from([(2010, 3), (2020, 7)]));
        let slope = report.fit.slope().unwrap();
        assert!(slope > 0.0);
        assert!((slope - 0.4).abs() < 1e-12);
        assert!((report.fit.r_squared().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rows_mode_counts_duplicate_ids() {
        let records = vec![row("x", 2011), row("x", 2011), row("y", 2012)];
        let report = analyze_trend(&table(records), CountMode::Rows).unwrap();
        assert_eq!(report.yearly_counts[&2011], 2);
    }

    #[test]
    fn test_distinct_ids_mode_deduplicates() {
        let mut anonymous = row("z", 2012);
        anonymous.outbreak_id = None;
        let records = vec![row("x", 2011), row("x", 2011), row("y", 2012), anonymous];

        let report = analyze_trend(&table(records), CountMode::DistinctIds).unwrap();
        assert_eq!(report.yearly_counts, YearlyCounts::from([(2011, 1), (2012, 1)]));
    }

    #[test]
    fn test_undated_rows_are_excluded() {
        let mut undated = row("u", 2000);
        undated.date = None;
        let records = vec![row("a", 2014), undated, row("b", 2015)];

        let report = analyze_trend(&table(records), CountMode::Rows).unwrap();
        assert_eq!(report.yearly_counts.values().sum::<usize>(), 2);
    }

    #[test]
    fn test_single_year_is_insufficient() {
        let records = vec![row("a", 2018), row("b", 2018)];
        let report = analyze_trend(&table(records), CountMode::Rows).unwrap();

        assert_eq!(report.fit, TrendFit::Insufficient { distinct_years: 1 });
        assert_eq!(report.fit.slope(), None);
        assert_eq!(report.fit.r_squared(), None);
    }

    #[test]
    fn test_empty_table_yields_empty_counts() {
        let report = analyze_trend(&table(vec![]), CountMode::Rows).unwrap();
        assert!(report.yearly_counts.is_empty());
        assert_eq!(report.fit, TrendFit::Insufficient { distinct_years: 0 });
    }

    #[test]
    fn test_missing_date_column() {
        let t = Table::new([Field::OutbreakId], vec![]);
        let err = analyze_trend(&t, CountMode::Rows).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField(Field::Date)));
    }

    #[test]
    fn test_missing_outbreak_id_column() {
        let t = Table::new([Field::Date], vec![]);
        let err = analyze_trend(&t, CountMode::Rows).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField(Field::OutbreakId)));
    }
}
