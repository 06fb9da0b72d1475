//! Per-source conversion pipeline and the batch loop around it.
//!
//! Each source is converted independently: derive the term, aggregate its
//! rows, write the JSON document. A failing source is logged and skipped.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::aggregation::aggregate::aggregate_rows;
use crate::output::write_sections;
use crate::parser::read_rows;
use crate::stats::SourceStats;
use crate::term::Term;

/// Result of converting one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    Converted(SourceStats),
    /// The source file does not exist.
    Missing,
}

/// Converts one grade export into a JSON document inside `output_dir`.
///
/// # Errors
///
/// Returns an error if the source cannot be read or decoded, if any count
/// is malformed, or if the output cannot be written. A source that does not
/// exist is not an error; it yields [`Conversion::Missing`].
#[tracing::instrument(skip_all, fields(source = %source.display()))]
pub fn convert_source(source: &Path, output_dir: &Path) -> Result<Conversion> {
    let term = Term::from_source_name(&source.to_string_lossy());

    let file = match File::open(source) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Conversion::Missing),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open {}", source.display()));
        }
    };

    let rows = read_rows(BufReader::new(file))
        .with_context(|| format!("failed to read {}", source.display()))?;
    let sections = aggregate_rows(&term.label, rows)
        .with_context(|| format!("failed to read {}", source.display()))?;

    let output = output_dir.join(&term.output_name);
    write_sections(&output, &sections)?;

    let stats = SourceStats::from_sections(&sections).with_paths(
        source.to_path_buf(),
        output,
        &term.label,
    );
    info!(
        output = %stats.output.display(),
        quarter = %stats.quarter,
        sections = stats.sections,
        "Converted source"
    );
    if stats.total_y > 0 {
        info!(
            total_y = stats.total_y,
            sections_with_y = stats.sections_with_y,
            pct_with_y = format_args!("{:.1}", stats.pct_with_y()),
            "Y grades found"
        );
    }

    Ok(Conversion::Converted(stats))
}

/// Outcome of a whole batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<SourceStats>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Output paths in the order they were written.
    pub fn outputs(&self) -> Vec<&Path> {
        self.converted.iter().map(|s| s.output.as_path()).collect()
    }
}

/// Converts every source in order, never stopping on a per-source failure.
pub fn convert_all(sources: &[PathBuf], output_dir: &Path) -> BatchReport {
    let mut report = BatchReport::default();
    let mut written: HashSet<PathBuf> = HashSet::new();

    for source in sources {
        match convert_source(source, output_dir) {
            Ok(Conversion::Converted(stats)) => {
                if !written.insert(stats.output.clone()) {
                    warn!(
                        source = %source.display(),
                        output = %stats.output.display(),
                        "Output overwrote one written earlier in this batch"
                    );
                }
                report.converted.push(stats);
            }
            Ok(Conversion::Missing) => {
                error!(source = %source.display(), "Source not found");
                report.missing.push(source.clone());
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(source = %source.display(), error = %message, "Error processing source");
                report.failed.push((source.clone(), message));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    const HEADER: &str = "SUBJ,CRSE,SECTION,ILNAME,IFNAME,CRSE_TITLE,UNITS,GRADE,CNTOFGRADE\n";

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_source() {
        let dir = temp_dir("grade_report_converter_test_missing");
        let result = convert_source(&dir.join("nope.csv"), &dir).unwrap();

        assert_eq!(result, Conversion::Missing);
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_convert_source_writes_term_output() {
        let dir = temp_dir("grade_report_converter_test_convert");
        let source = dir.join("202304 Fall Quarter 2024.csv");
        let rows = "CS,101,1,Smith,Jane,Intro CS,4,Y,2\nCS,101,1,Smith,Jane,Intro CS,4,RW,1\n";
        fs::write(&source, format!("{}{}", HEADER, rows)).unwrap();

        let Conversion::Converted(stats) = convert_source(&source, &dir).unwrap() else {
            panic!("expected conversion");
        };

        assert_eq!(stats.output, dir.join("courses_Fall_2024.json"));
        assert_eq!(stats.quarter, "FQ2024");
        assert_eq!(stats.sections, 1);
        assert_eq!(stats.total_y, 3);
        assert_eq!(stats.sections_with_y, 1);
        assert!(stats.output.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_bad_count_writes_nothing() {
        let dir = temp_dir("grade_report_converter_test_bad_count");
        let source = dir.join("grades.csv");
        fs::write(&source, format!("{}CS,101,1,Smith,Jane,Intro CS,4,A,many\n", HEADER)).unwrap();

        assert!(convert_source(&source, &dir).is_err());
        assert!(!dir.join("courses_output.json").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let dir = temp_dir("grade_report_converter_test_batch");
        let bad = dir.join("bad.csv");
        let good = dir.join("202301 Winter Quarter 2023.csv");
        fs::write(&bad, format!("{}CS,101,1,Smith,Jane,Intro CS,4,A,x\n", HEADER)).unwrap();
        fs::write(&good, format!("{}CS,101,1,Smith,Jane,Intro CS,4,A,1\n", HEADER)).unwrap();

        let sources = vec![dir.join("absent.csv"), bad.clone(), good];
        let report = convert_all(&sources, &dir);

        assert_eq!(report.missing, vec![dir.join("absent.csv")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, bad);
        assert_eq!(report.outputs(), vec![dir.join("courses_Winter_2023.json").as_path()]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
