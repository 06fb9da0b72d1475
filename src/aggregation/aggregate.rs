use crate::aggregation::grade::GradeCounter;
use crate::aggregation::types::{CourseSection, SectionKey};
use crate::parser::GradeRow;
use anyhow::Result;
use std::collections::HashMap;
use tracing::debug;

/// Groups export rows into course sections for one term.
///
/// Sections are kept in the order their identity was first seen.
pub struct SectionAggregator {
    quarter: String,
    index: HashMap<SectionKey, usize>,
    sections: Vec<CourseSection>,
    rows: usize,
    ignored_rows: usize,
}

impl SectionAggregator {
    pub fn new(quarter: &str) -> Self {
        Self {
            quarter: quarter.to_string(),
            index: HashMap::new(),
            sections: Vec::new(),
            rows: 0,
            ignored_rows: 0,
        }
    }

    /// Returns the section for `key`, creating an empty one on first sight.
    pub fn section_mut(&mut self, key: SectionKey) -> &mut CourseSection {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.sections.push(CourseSection::new(&self.quarter));
                let idx = self.sections.len() - 1;
                self.index.insert(key, idx);
                idx
            }
        };
        &mut self.sections[idx]
    }

    /// Folds one row into its section.
    pub fn ingest(&mut self, row: &GradeRow) {
        self.rows += 1;
        let counter = GradeCounter::from_token(&row.grade);
        if counter.is_none() {
            self.ignored_rows += 1;
        }

        let key = SectionKey {
            subj: row.subj.clone(),
            crse: row.crse.clone(),
            section: row.section.clone(),
            instructor_last: row.instructor_last.clone(),
            instructor_first: row.instructor_first.clone(),
        };
        let section = self.section_mut(key);

        // an untitled section takes its descriptive fields from the next row
        if section.name.is_empty() {
            section.name = row.title.clone();
            section.subj = row.subj.clone();
            section.code = row.crse.clone();
            section.course_id = format!("{}{}", row.subj, row.crse);
            section.instructor = format!("{} {}", row.instructor_first, row.instructor_last)
                .trim()
                .to_string();
            section.units = row.units.clone();
        }

        if let Some(counter) = counter {
            section.add(counter, row.count);
        }
    }

    /// Finishes the pass and returns the sections in first-seen order.
    pub fn into_sections(self) -> Vec<CourseSection> {
        debug!(
            rows = self.rows,
            ignored_rows = self.ignored_rows,
            sections = self.sections.len(),
            graded = self.sections.iter().map(CourseSection::total_graded).sum::<u64>(),
            "Aggregation finished"
        );
        self.sections
    }
}

/// Aggregates every row yielded by `rows`, stopping at the first error.
pub fn aggregate_rows<I>(quarter: &str, rows: I) -> Result<Vec<CourseSection>>
where
    I: IntoIterator<Item = Result<GradeRow>>,
{
    let mut aggregator = SectionAggregator::new(quarter);
    for row in rows {
        aggregator.ingest(&row?);
    }
    Ok(aggregator.into_sections())
}
