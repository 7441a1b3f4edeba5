//! Outbreak aggregations.
//!
//! Each analyzer reads a loaded [`Table`](crate::table::Table) and produces an
//! owned, sorted summary. Empty tables yield empty summaries; the trend fit
//! reports [`TrendFit::Insufficient`](types::TrendFit::Insufficient) instead of
//! a degenerate line.

pub mod contaminant;
pub mod location;
pub mod trend;
pub mod types;
pub mod utility;

pub use contaminant::analyze_contaminants;
pub use location::analyze_locations;
pub use trend::analyze_trend;
