//! CLI entry point for the grade report converter.
//!
//! Converts one or more grade-distribution CSV exports into per-term JSON
//! documents of course sections, then suggests the follow-on analysis
//! command for the files it produced.

use anyhow::Result;
use clap::Parser;
use grade_report_converter::convert::convert_all;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grade-report-converter")]
#[command(about = "Convert grade CSV exports to JSON course sections", long_about = None)]
struct Cli {
    /// Grade CSV files, e.g. "202301 Winter Quarter 2023.csv"
    #[arg(value_name = "CSV_FILE", required = true)]
    sources: Vec<PathBuf>,

    /// Directory to write JSON files to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Command suggested for analyzing the generated files
    #[arg(long, default_value = "./y_grade_analysis.sh")]
    analysis_script: String,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/grade_report_converter.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("grade_report_converter.log"));

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

    info!(
        sources = cli.sources.len(),
        output_dir = %cli.output_dir.display(),
        "Converting grade CSV files"
    );

    let report = convert_all(&cli.sources, &cli.output_dir);
    for stats in &report.converted {
        info!(
            source = %stats.source.display(),
            output = %stats.output.display(),
            sections = stats.sections,
            total_y = stats.total_y,
            "Generated"
        );
    }
    let outputs = report.outputs();

    info!(
        generated = outputs.len(),
        missing = report.missing.len(),
        failed = report.failed.len(),
        "Conversion complete"
    );

    if outputs.is_empty() {
        warn!("No JSON files were generated");
        return Ok(());
    }

    let files: Vec<String> = outputs
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    println!("You can now run your analysis script:");
    println!("{} {}", cli.analysis_script, files.join(" "));

    Ok(())
}
