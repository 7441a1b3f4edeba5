//! End-to-end analysis run.
//!
//! Loads the table, runs the three analyzers over it, and renders the figure.
//! Any failure aborts the run; no partial [`ResultBundle`] is returned.

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::analyzers::types::{ContaminantSummary, LocationSummary, TrendFit, YearlyCounts};
use crate::analyzers::{analyze_contaminants, analyze_locations, analyze_trend};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::loader::load_table;
use crate::table::Table;
use crate::visualize::{Figure, render};

/// Everything an analysis run produces. Owned by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ResultBundle {
    pub yearly_outbreaks: YearlyCounts,
    pub trend: TrendFit,
    pub contaminant_summary: ContaminantSummary,
    pub location_risk: LocationSummary,
    #[serde(skip)]
    pub figure: Figure,
}

impl ResultBundle {
    pub fn trend_slope(&self) -> Option<f64> {
        self.trend.slope()
    }

    pub fn trend_r_squared(&self) -> Option<f64> {
        self.trend.r_squared()
    }
}

/// Runs the full analysis on the delimited file at `path`.
#[tracing::instrument(skip(path, config), fields(path = %path.as_ref().display()))]
pub fn run(path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<ResultBundle> {
    config.validate()?;
    let table = load_table(path.as_ref(), &config.imputation, config.delimiter.as_byte()?)?;
    run_table(&table, config)
}

/// Runs the analyzers and renderer on an already loaded table.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn run_table(table: &Table, config: &AnalysisConfig) -> Result<ResultBundle> {
    let trend = analyze_trend(table, config.count_mode)?;
    let contaminant_summary = analyze_contaminants(table)?;
    let location_risk = analyze_locations(table, &config.risk_weights)?;

    let figure = render(
        &trend.yearly_counts,
        &contaminant_summary,
        &location_risk,
        &config.chart,
    )?;

    info!(
        years = trend.yearly_counts.len(),
        contaminants = contaminant_summary.len(),
        locations = location_risk.len(),
        "Analysis complete"
    );

    Ok(ResultBundle {
        yearly_outbreaks: trend.yearly_counts,
        trend: trend.fit,
        contaminant_summary,
        location_risk,
        figure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImputationPolicy;
    use crate::error::AnalysisError;
    use crate::loader::load_from_reader;
    use crate::table::Field;

    const CSV: &str = "\
outbreak_id,date,contaminant,location,illnesses,hospitalizations,deaths
1,2012-01-10,Salmonella,Restaurant,12,3,0
2,2012-05-02,Norovirus,Catering,80,1,0
3,2013-09-14,Salmonella,Private Home,6,2,1
4,2014-02-20,Listeria,Restaurant,3,3,2
";

    fn table(csv: &str, config: &AnalysisConfig) -> Table {
        load_from_reader(csv.as_bytes(), &config.imputation, b',').unwrap()
    }

    #[test]
    fn test_run_table_produces_all_parts() {
        let config = AnalysisConfig::default();
        let bundle = run_table(&table(CSV, &config), &config).unwrap();

        assert_eq!(
            bundle.yearly_outbreaks,
            YearlyCounts::from([(2012, 2), (2013, 1), (2014, 1)])
        );
        assert!(bundle.trend_slope().unwrap() < 0.0);
        assert_eq!(bundle.contaminant_summary.rows()[0].contaminant, "Norovirus");
        assert_eq!(bundle.location_risk.len(), 3);
        assert!(bundle.figure.svg().contains("Yearly Outbreak Trend"));
    }

    #[test]
    fn test_summary_json_skips_figure() {
        let config = AnalysisConfig::default();
        let bundle = run_table(&table(CSV, &config), &config).unwrap();
        let json = serde_json::to_value(&bundle).unwrap();

        assert!(json.get("figure").is_none());
        assert_eq!(json["trend"]["kind"], "linear");
        assert_eq!(json["yearly_outbreaks"]["2013"], 1);
        assert_eq!(json["location_risk"][0]["location"], "Catering");
    }

    #[test]
    fn test_missing_column_aborts_run() {
        let csv = "outbreak_id,date,location,illnesses,hospitalizations,deaths\n\
                   1,2012-01-10,Farm,1,0,0\n";
        let config = AnalysisConfig::default();
        let err = run_table(&table(csv, &config), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField(Field::Contaminant)));
    }

    #[test]
    fn test_infinite_count_fails_at_load() {
        let csv = "outbreak_id,date,contaminant,location,illnesses,hospitalizations,deaths
1,2010-01-01,A,R,inf,0,0
2,2011-01-01,B,S,5,0,0
";
        let err = load_from_reader(csv.as_bytes(), &ImputationPolicy::default(), b',').unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidValue {
                row: 2,
                field: Field::Illnesses,
                ..
            }
        ));
    }

    #[test]
    fn test_overflowing_totals_fail_instead_of_rendering() {
        let csv = "outbreak_id,date,contaminant,location,illnesses,hospitalizations,deaths
1,2010-01-01,A,R,1e308,0,0
2,2011-01-01,A,R,1e308,0,0
";
        let config = AnalysisConfig::default();
        let err = run_table(&table(csv, &config), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::Render(_)));
    }

    #[test]
    fn test_invalid_config_fails_before_loading() {
        let mut config = AnalysisConfig::default();
        config.risk_weights.deaths = f64::NAN;
        let err = run("/nonexistent/outbreaks.csv", &config).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }
}
