//! CSV reader for grade-distribution exports.
//!
//! Columns are located by header name. Missing text columns read as empty
//! strings and a missing `CNTOFGRADE` column reads as zero, but a count that
//! is present and not a non-negative integer is an error. Rows may be longer
//! or shorter than the header: extra fields are ignored and absent ones read
//! as missing columns.

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use std::io::Read;
use tracing::debug;

pub const SUBJ: &str = "SUBJ";
pub const CRSE: &str = "CRSE";
pub const SECTION: &str = "SECTION";
pub const ILNAME: &str = "ILNAME";
pub const IFNAME: &str = "IFNAME";
pub const CRSE_TITLE: &str = "CRSE_TITLE";
pub const UNITS: &str = "UNITS";
pub const GRADE: &str = "GRADE";
pub const CNTOFGRADE: &str = "CNTOFGRADE";

/// One decoded export row. Text fields are trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeRow {
    pub subj: String,
    pub crse: String,
    pub section: String,
    pub instructor_last: String,
    pub instructor_first: String,
    pub title: String,
    pub units: String,
    pub grade: String,
    pub count: u64,
}

/// Header positions of the columns the converter reads.
#[derive(Debug, Clone, Copy, Default)]
struct Columns {
    subj: Option<usize>,
    crse: Option<usize>,
    section: Option<usize>,
    instructor_last: Option<usize>,
    instructor_first: Option<usize>,
    title: Option<usize>,
    units: Option<usize>,
    grade: Option<usize>,
    count: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        // a repeated header name resolves to its last occurrence
        let find = |name: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == name)
                .map(|(i, _)| i)
                .last()
        };
        Columns {
            subj: find(SUBJ),
            crse: find(CRSE),
            section: find(SECTION),
            instructor_last: find(ILNAME),
            instructor_first: find(IFNAME),
            title: find(CRSE_TITLE),
            units: find(UNITS),
            grade: find(GRADE),
            count: find(CNTOFGRADE),
        }
    }

    fn text(record: &StringRecord, column: Option<usize>) -> String {
        column
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .trim()
            .to_string()
    }

    fn decode(&self, record: &StringRecord, line: u64) -> Result<GradeRow> {
        let count = match self.count.and_then(|i| record.get(i)) {
            None => 0,
            Some(raw) => parse_count(raw).with_context(|| format!("line {}", line))?,
        };

        Ok(GradeRow {
            subj: Self::text(record, self.subj),
            crse: Self::text(record, self.crse),
            section: Self::text(record, self.section),
            instructor_last: Self::text(record, self.instructor_last),
            instructor_first: Self::text(record, self.instructor_first),
            title: Self::text(record, self.title),
            units: Self::text(record, self.units),
            grade: Self::text(record, self.grade),
            count,
        })
    }
}

/// Parses a `CNTOFGRADE` value as a non-negative integer.
pub fn parse_count(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    if trimmed.starts_with('-') {
        bail!("negative {} value {:?}", CNTOFGRADE, raw);
    }
    trimmed
        .parse::<u64>()
        .with_context(|| format!("invalid {} value {:?}", CNTOFGRADE, raw))
}

/// Iterator over the decoded rows of one export.
pub struct GradeRows<R> {
    records: StringRecordsIntoIter<R>,
    columns: Columns,
}

impl<R: Read> Iterator for GradeRows<R> {
    type Item = Result<GradeRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(anyhow::Error::new(e).context("malformed CSV row"))),
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        Some(self.columns.decode(&record, line))
    }
}

/// Reads the header row of `reader` and returns an iterator over its rows.
///
/// # Errors
///
/// Returns an error if the header row is not valid CSV or not UTF-8. Errors
/// for individual rows are yielded by the iterator.
pub fn read_rows<R: Read>(reader: R) -> Result<GradeRows<R>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("failed to read CSV header")?;
    let columns = Columns::from_headers(headers);
    debug!(?columns, "Resolved CSV columns");

    Ok(GradeRows {
        records: rdr.into_records(),
        columns,
    })
}
