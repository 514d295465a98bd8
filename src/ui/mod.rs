//! Terminal presentation: formatting helpers, line input, and the dashboard.

pub mod dashboard;
pub mod format;
pub mod prompt;
