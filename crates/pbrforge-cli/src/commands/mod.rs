//! CLI command implementations

pub mod generate;
pub mod import;
pub mod list;

mod reporting;
