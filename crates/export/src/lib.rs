//! Export Module
//!
//! Turns the reading history into a CSV file or a paginated report. Both
//! exports are built fully in memory and written with a single atomic save.

mod canvas;
mod error;
mod report;
mod save;
mod table;

pub use canvas::{wrap_text, PdfBackend, ReportCanvas, Rgb};
pub use error::ExportError;
pub use report::{fit_chart, layout_report, render_report, ImageBox, ReportData};
pub use save::{csv_file_name, pdf_file_name, save_atomic};
pub use table::{render_csv, CSV_HEADER};

use chrono::NaiveDate;
use readings::Reading;
use std::path::{Path, PathBuf};

/// Writes exports into one directory
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    /// Exporter writing into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Export readings as `envitrack_data_<date>.csv`
    pub fn export_csv(&self, readings: &[Reading], date: NaiveDate) -> Result<PathBuf, ExportError> {
        let csv = render_csv(readings)?;
        save_atomic(&self.dir, &csv_file_name(date), csv.as_bytes())
    }

    /// Render the report and save it as `envitrack_ai_report_<date>.pdf`
    pub fn export_pdf(
        &self,
        backend: Option<&dyn PdfBackend>,
        data: &ReportData<'_>,
        date: NaiveDate,
    ) -> Result<PathBuf, ExportError> {
        let backend = backend.ok_or(ExportError::BackendUnavailable)?;
        let bytes = render_report(backend, data)?;
        save_atomic(&self.dir, &pdf_file_name(date), &bytes)
    }
}
