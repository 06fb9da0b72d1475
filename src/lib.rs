pub mod aggregation;
pub mod convert;
pub mod output;
pub mod parser;
pub mod stats;
pub mod term;
