//! Writing finished exports to disk

use crate::ExportError;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// `envitrack_data_<YYYY-MM-DD>.csv`
pub fn csv_file_name(date: NaiveDate) -> String {
    format!("envitrack_data_{}.csv", date.format("%Y-%m-%d"))
}

/// `envitrack_ai_report_<YYYY-MM-DD>.pdf`
pub fn pdf_file_name(date: NaiveDate) -> String {
    format!("envitrack_ai_report_{}.pdf", date.format("%Y-%m-%d"))
}

/// Write `bytes` to `dir/name` through a temporary file.
///
/// The temporary file is removed if the write or rename fails, so a failed
/// export never leaves a partial file behind.
pub fn save_atomic(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let target = dir.join(name);
    let tmp = dir.join(format!(".{name}.tmp"));

    let result = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, &target));
    if let Err(e) = result {
        if tmp.exists() {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!("Failed to remove {}: {}", tmp.display(), cleanup);
            }
        }
        return Err(e.into());
    }

    info!("Saved {} ({} bytes)", target.display(), bytes.len());
    Ok(target)
}
