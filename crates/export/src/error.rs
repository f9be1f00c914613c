//! Export errors

use thiserror::Error;

/// Errors produced while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data available to export")]
    NoData,
    #[error("PDF library not loaded")]
    BackendUnavailable,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Chart image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Renderer error: {0}")]
    Render(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
