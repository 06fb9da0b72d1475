//! Derives the academic term label and the output file name from a source name.
//!
//! Grade-report exports are named like `202301 Winter Quarter 2023.csv`. The
//! six-digit registrar term code, the quarter name and the year are pulled out
//! of the file name; anything unrecognized falls back to [`UNKNOWN_TERM`].

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Term label used when the source name carries no recognizable term.
pub const UNKNOWN_TERM: &str = "UNKNOWN";

/// Output file name used when the source name carries no recognizable term.
pub const FALLBACK_OUTPUT: &str = "courses_output.json";

static TERM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{6})\s+(Winter|Spring|Summer|Fall)\s+Quarter\s+(\d{4})")
        .expect("term pattern is valid")
});

/// One of the four academic quarters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quarter {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Quarter {
    /// Parses the quarter name exactly as it appears in export file names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Winter" => Some(Quarter::Winter),
            "Spring" => Some(Quarter::Spring),
            "Summer" => Some(Quarter::Summer),
            "Fall" => Some(Quarter::Fall),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Quarter::Winter => "Winter",
            Quarter::Spring => "Spring",
            Quarter::Summer => "Summer",
            Quarter::Fall => "Fall",
        }
    }

    /// Short prefix of the term label.
    ///
    /// | Quarter | Prefix |
    /// |---------|--------|
    /// | Winter  | WQ     |
    /// | Spring  | SQ     |
    /// | Summer  | SMQ    |
    /// | Fall    | FQ     |
    pub fn abbreviation(self) -> &'static str {
        match self {
            Quarter::Winter => "WQ",
            Quarter::Spring => "SQ",
            Quarter::Summer => "SMQ",
            Quarter::Fall => "FQ",
        }
    }
}

/// Term information derived from one source name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Label attached to every course section, e.g. `WQ2023` or `UNKNOWN`.
    pub label: String,
    /// File name the converted document is written to.
    pub output_name: String,
    /// Six-digit registrar term code, when recognized.
    pub term_code: Option<String>,
}

impl Term {
    /// Derives the term from the final path component of `source`.
    ///
    /// Never fails: an unrecognized name yields [`Term::unknown`].
    pub fn from_source_name(source: &str) -> Self {
        let file_name = Path::new(source)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string());

        let Some(caps) = TERM_PATTERN.captures(&file_name) else {
            debug!(file_name = %file_name, "No term found in source name");
            return Self::unknown();
        };

        let term_code = caps[1].to_string();
        let Some(quarter) = Quarter::from_name(&caps[2]) else {
            return Self::unknown();
        };
        let year = &caps[3];

        let term = Term {
            label: format!("{}{}", quarter.abbreviation(), year),
            output_name: format!("courses_{}_{}.json", quarter.name(), year),
            term_code: Some(term_code),
        };
        debug!(
            term_code = ?term.term_code,
            label = %term.label,
            output = %term.output_name,
            "Derived term"
        );
        term
    }

    pub fn unknown() -> Self {
        Term {
            label: UNKNOWN_TERM.to_string(),
            output_name: FALLBACK_OUTPUT.to_string(),
            term_code: None,
        }
    }
}
