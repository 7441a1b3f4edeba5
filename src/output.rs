//! Output formatting and persistence for analysis results.
//!
//! The pipeline itself never writes files; the CLI uses these helpers to log
//! a summary and save the figure, JSON summary and location table.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::{LocationSummary, TrendFit};
use crate::pipeline::ResultBundle;
use crate::visualize::Figure;

/// Logs the bundle using Rust's debug pretty-print format.
pub fn print_pretty(bundle: &ResultBundle) {
    debug!("{:#?}", bundle);
}

/// Logs a short human-readable summary of the run.
pub fn print_summary(bundle: &ResultBundle, top: usize) {
    for (year, count) in &bundle.yearly_outbreaks {
        info!(year, outbreaks = count, "Yearly outbreaks");
    }

    match bundle.trend {
        TrendFit::Linear {
            slope, r_squared, ..
        } => {
            let direction = if slope > 0.0 {
                "increasing"
            } else if slope < 0.0 {
                "decreasing"
            } else {
                "flat"
            };
            info!(slope, r_squared, direction, "Outbreak trend");
        }
        TrendFit::Insufficient { distinct_years } => {
            info!(distinct_years, "Not enough distinct years to fit a trend");
        }
    }

    for row in bundle.contaminant_summary.top(top) {
        info!(
            contaminant = %row.contaminant,
            illnesses = row.illnesses,
            hospitalizations = row.hospitalizations,
            deaths = row.deaths,
            "Contaminant"
        );
    }

    for row in bundle.location_risk.rows() {
        info!(
            location = %row.location,
            reports = row.count,
            risk_score = row.risk_score,
            "Location"
        );
    }
}

/// Serializes the analysis part of the bundle as pretty JSON.
pub fn to_json(bundle: &ResultBundle) -> Result<String> {
    Ok(serde_json::to_string_pretty(bundle)?)
}

pub fn write_json(path: &str, bundle: &ResultBundle) -> Result<()> {
    fs::write(path, to_json(bundle)?).with_context(|| format!("writing summary to {path}"))?;
    info!(path, "Summary written");
    Ok(())
}

/// Writes the SVG figure, creating parent directories as needed.
pub fn write_figure(path: &str, figure: &Figure) -> Result<()> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, figure.svg()).with_context(|| format!("writing figure to {path}"))?;
    info!(path, bytes = figure.svg().len(), "Figure written");
    Ok(())
}

/// Writes one CSV row per location, in ranking order, replacing any existing file.
pub fn write_location_csv(path: &str, summary: &LocationSummary) -> Result<()> {
    debug!(path, rows = summary.len(), "Writing location CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("creating {path}"))?;

    for row in summary.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::loader::load_from_reader;
    use crate::pipeline::run_table;
    use std::env;

    const CSV: &str = "\
outbreak_id,date,contaminant,location,illnesses,hospitalizations,deaths
1,2015-04-01,Salmonella,Restaurant,12,3,0
2,2016-05-02,Norovirus,Catering,80,1,0
";

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn bundle() -> ResultBundle {
        let config = AnalysisConfig::default();
        let table = load_from_reader(CSV.as_bytes(), &config.imputation, b',').unwrap();
        run_table(&table, &config).unwrap()
    }

    #[test]
    fn test_print_functions_do_not_panic() {
        let bundle = bundle();
        print_pretty(&bundle);
        print_summary(&bundle, 10);
    }

    #[test]
    fn test_to_json_contains_summaries() {
        let json = to_json(&bundle()).unwrap();
        assert!(json.contains("\"contaminant_summary\""));
        assert!(json.contains("\"Norovirus\""));
        assert!(!json.contains("<svg"));
    }

    #[test]
    fn test_write_figure_creates_file() {
        let dir = temp_path("outbreak_analyzer_test_figure");
        let path = format!("{dir}/nested/figure.svg");
        let _ = fs::remove_dir_all(&dir);

        write_figure(&path, &bundle().figure).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Location Risk Scores"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_location_csv_header_and_rows() {
        let path = temp_path("outbreak_analyzer_test_locations.csv");
        let _ = fs::remove_file(&path);

        write_location_csv(&path, &bundle().location_risk).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("location,count,illnesses_sum"));
        assert!(lines[1].starts_with("Catering,1,80"));

        fs::remove_file(&path).unwrap();
    }
}
