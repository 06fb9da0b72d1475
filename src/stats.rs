use std::path::PathBuf;

use crate::aggregation::types::CourseSection;

/// Summary of one converted source, reported by the batch driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStats {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quarter: String,
    pub sections: usize,

    // Y-grade diagnostics
    pub total_y: u64,
    pub sections_with_y: usize,
}

impl SourceStats {
    pub fn from_sections(sections: &[CourseSection]) -> Self {
        let mut s = SourceStats {
            sections: sections.len(),
            ..Default::default()
        };

        for section in sections {
            if section.y > 0 {
                s.total_y = s.total_y.saturating_add(section.y);
                s.sections_with_y += 1;
            }
        }

        s
    }

    /// Set source, output and term metadata
    pub fn with_paths(mut self, source: PathBuf, output: PathBuf, quarter: &str) -> Self {
        self.source = source;
        self.output = output;
        self.quarter = quarter.to_string();
        self
    }

    pub fn pct_with_y(&self) -> f64 {
        if self.sections == 0 {
            0.0
        } else {
            (self.sections_with_y as f64 / self.sections as f64) * 100.0
        }
    }
}
