//! Sensor Readings
//!
//! Append-only reading history fed by the ingestion pipeline, plus the
//! summary statistics and per-metric series the analysis crates consume.

mod history;
mod reading;
mod replay;
mod statistics;

pub use history::ReadingHistory;
pub use reading::{Metric, Reading, DEFAULT_DEVICE_ID};
pub use replay::{load_csv, parse_csv};
pub use statistics::SummaryStats;

use thiserror::Error;

/// Errors while loading readings from CSV
#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Line {line}: invalid {field}: {value:?}")]
    InvalidField {
        line: u64,
        field: &'static str,
        value: String,
    },
    #[error("Line {line}: expected at least 4 columns, found {found}")]
    MissingColumns { line: u64, found: usize },
}
