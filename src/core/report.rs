// src/core/report.rs

use std::path::{Path, PathBuf};

use tracing::{error, info};

/// Every report is saved under this name; a newer scan overwrites the older file.
pub const REPORT_FILE_NAME: &str = "scan-report.pdf";

/// Writes the decoded report into `dir`, creating the directory if needed.
pub async fn save_report(dir: &Path, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(REPORT_FILE_NAME);
    match tokio::fs::write(&path, bytes).await {
        Ok(()) => {
            info!(path = %path.display(), bytes = bytes.len(), "Saved scan report.");
            Ok(path)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to save scan report.");
            Err(e)
        }
    }
}
