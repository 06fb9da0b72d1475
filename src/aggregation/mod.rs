//! Course-section aggregation.
//!
//! Maps grade tokens onto output counters and folds export rows into one
//! record per course section, keeping first-seen order.

pub mod aggregate;
pub mod grade;
pub mod types;
