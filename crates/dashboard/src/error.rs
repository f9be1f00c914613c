//! Dashboard errors

use thiserror::Error;

/// Errors surfaced by the dashboard core
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Settings error: {0}")]
    Threshold(#[from] thresholds::ThresholdError),
    #[error("Settings store error: {0}")]
    Store(#[from] thresholds::StoreError),
    #[error("Reading import error: {0}")]
    Readings(#[from] readings::ReadingError),
    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),
}
