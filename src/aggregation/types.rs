//! Data types used by the aggregation pipeline.

use serde::Serialize;

use crate::aggregation::grade::GradeCounter;

/// Identity of a course section: one offering of a course by one instructor.
///
/// All parts are trimmed before the key is built; comparison is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionKey {
    pub subj: String,
    pub crse: String,
    pub section: String,
    pub instructor_last: String,
    pub instructor_first: String,
}

/// One aggregated course section, serialized as a JSON object.
///
/// Field order is the output key order. `enrollment`, `_id`, `crn`,
/// `ge_list`, `seats`, `max_seats`, `description`, `final_exam` and `prereq`
/// are not present in grade exports and are always written empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CourseSection {
    pub enrollment: Vec<String>,
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub crn: Vec<String>,
    pub subj: String,
    pub code: String,
    pub course_id: String,
    pub instructor: String,

    // grade counters
    pub aplus: u64,
    pub a: u64,
    pub aminus: u64,
    pub bplus: u64,
    pub b: u64,
    pub bminus: u64,
    pub cplus: u64,
    pub c: u64,
    pub cminus: u64,
    pub dplus: u64,
    pub d: u64,
    pub dminus: u64,
    pub f: u64,
    #[serde(rename = "I")]
    pub incomplete: u64,
    #[serde(rename = "P")]
    pub pass: u64,
    #[serde(rename = "NP")]
    pub no_pass: u64,
    #[serde(rename = "Y")]
    pub y: u64,

    pub quarter: String,
    pub ge_list: Vec<String>,
    pub units: String,
    pub seats: String,
    pub max_seats: String,
    pub description: String,
    pub final_exam: String,
    pub prereq: String,
}

impl CourseSection {
    /// Empty section for `quarter`: all counters zero, all text fields empty.
    pub fn new(quarter: &str) -> Self {
        CourseSection {
            quarter: quarter.to_string(),
            ..Default::default()
        }
    }

    pub fn counter(&self, counter: GradeCounter) -> u64 {
        match counter {
            GradeCounter::APlus => self.aplus,
            GradeCounter::A => self.a,
            GradeCounter::AMinus => self.aminus,
            GradeCounter::BPlus => self.bplus,
            GradeCounter::B => self.b,
            GradeCounter::BMinus => self.bminus,
            GradeCounter::CPlus => self.cplus,
            GradeCounter::C => self.c,
            GradeCounter::CMinus => self.cminus,
            GradeCounter::DPlus => self.dplus,
            GradeCounter::D => self.d,
            GradeCounter::DMinus => self.dminus,
            GradeCounter::F => self.f,
            GradeCounter::Incomplete => self.incomplete,
            GradeCounter::Pass => self.pass,
            GradeCounter::NoPass => self.no_pass,
            GradeCounter::Y => self.y,
        }
    }

    fn counter_mut(&mut self, counter: GradeCounter) -> &mut u64 {
        match counter {
            GradeCounter::APlus => &mut self.aplus,
            GradeCounter::A => &mut self.a,
            GradeCounter::AMinus => &mut self.aminus,
            GradeCounter::BPlus => &mut self.bplus,
            GradeCounter::B => &mut self.b,
            GradeCounter::BMinus => &mut self.bminus,
            GradeCounter::CPlus => &mut self.cplus,
            GradeCounter::C => &mut self.c,
            GradeCounter::CMinus => &mut self.cminus,
            GradeCounter::DPlus => &mut self.dplus,
            GradeCounter::D => &mut self.d,
            GradeCounter::DMinus => &mut self.dminus,
            GradeCounter::F => &mut self.f,
            GradeCounter::Incomplete => &mut self.incomplete,
            GradeCounter::Pass => &mut self.pass,
            GradeCounter::NoPass => &mut self.no_pass,
            GradeCounter::Y => &mut self.y,
        }
    }

    /// Adds `count` occurrences to `counter`. Saturates rather than wrapping.
    pub fn add(&mut self, counter: GradeCounter, count: u64) {
        let slot = self.counter_mut(counter);
        *slot = slot.saturating_add(count);
    }

    /// Sum of every grade counter.
    pub fn total_graded(&self) -> u64 {
        GradeCounter::ALL
            .iter()
            .map(|&c| self.counter(c))
            .fold(0u64, u64::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_section_is_empty() {
        let section = CourseSection::new("WQ2023");
        assert_eq!(section.quarter, "WQ2023");
        assert!(section.name.is_empty());
        assert!(section.enrollment.is_empty());
        assert_eq!(section.total_graded(), 0);
    }

    #[test]
    fn test_add_touches_only_one_counter() {
        for counter in GradeCounter::ALL {
            let mut section = CourseSection::new("WQ2023");
            section.add(counter, 7);
            for other in GradeCounter::ALL {
                let expected = if other == counter { 7 } else { 0 };
                assert_eq!(section.counter(other), expected, "{}", other.field_name());
            }
        }
    }

    #[test]
    fn test_serialized_key_order() {
        let section = CourseSection::new("WQ2023");
        let json = serde_json::to_string(&section).unwrap();
        let mut expected = vec![
            "enrollment", "_id", "name", "crn", "subj", "code", "course_id", "instructor",
        ];
        expected.extend(GradeCounter::ALL.iter().map(|c| c.field_name()));
        expected.extend([
            "quarter", "ge_list", "units", "seats", "max_seats", "description", "final_exam",
            "prereq",
        ]);

        let positions: Vec<usize> = expected
            .iter()
            .map(|key| json.find(&format!("\"{}\":", key)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(json.matches("\":").count(), expected.len());
    }
}
