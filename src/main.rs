//! CLI entry point for the outbreak analyzer.
//!
//! Runs the full analysis over a delimited outbreak file, logs a summary, and
//! writes the figure plus optional JSON and CSV outputs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outbreak_analyzer::config::{AnalysisConfig, CountMode, Delimiter, ImputationPolicy};
use outbreak_analyzer::output::{
    print_pretty, print_summary, write_figure, write_json, write_location_csv,
};
use outbreak_analyzer::pipeline;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "outbreak_analyzer")]
#[command(about = "Exploratory analysis of foodborne-illness outbreak data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an outbreak CSV: yearly trend, contaminants, location risk
    Analyze {
        /// Path to the delimited outbreak file
        #[arg(value_name = "FILE")]
        input: String,

        /// Where to write the SVG figure
        #[arg(short, long, default_value = "outbreak_analysis.svg")]
        figure: String,

        /// Optional: write the analysis summary as JSON
        #[arg(short, long)]
        summary: Option<String>,

        /// Optional: write the location risk table as CSV
        #[arg(long)]
        locations_csv: Option<String>,

        /// Optional: JSON configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Number of contaminants to chart and log
        #[arg(short, long)]
        top: Option<usize>,

        /// Count every row, or distinct outbreak ids, per year
        #[arg(long, value_enum)]
        count_mode: Option<CountMode>,

        /// Zero-fill every missing cell, labels and dates included
        #[arg(long, default_value_t = false)]
        fill_zero: bool,

        /// Column delimiter of the input file
        #[arg(short, long)]
        delimiter: Option<char>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/outbreak_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("outbreak_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            figure,
            summary,
            locations_csv,
            config,
            top,
            count_mode,
            fill_zero,
            delimiter,
        } => {
            let mut config = match config {
                Some(path) => AnalysisConfig::load(&path)
                    .with_context(|| format!("loading config {path}"))?,
                None => AnalysisConfig::default(),
            };
            if let Some(top) = top {
                config.chart.top_contaminants = top;
            }
            if let Some(mode) = count_mode {
                config.count_mode = mode;
            }
            if fill_zero {
                config.imputation = ImputationPolicy::fill_zero();
            }
            if let Some(delimiter) = delimiter {
                config.delimiter = Delimiter(delimiter);
            }

            info!(input = %input, count_mode = ?config.count_mode, "Starting analysis");
            let bundle = pipeline::run(&input, &config)
                .with_context(|| format!("analyzing {input}"))?;

            print_pretty(&bundle);
            print_summary(&bundle, config.chart.top_contaminants);

            write_figure(&figure, &bundle.figure)?;
            if let Some(path) = summary {
                write_json(&path, &bundle)?;
            }
            if let Some(path) = locations_csv {
                write_location_csv(&path, &bundle.location_risk)?;
                info!(path = %path, "Location table written");
            }
        }
    }

    Ok(())
}
