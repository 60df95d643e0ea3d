//! Writes export artifacts into the output directory.
//!
//! The CSV file is prefixed with a UTF-8 byte-order mark so spreadsheet
//! applications detect the encoding of CJK text. Files are written to a
//! temporary sibling first and renamed into place; a failed write removes
//! the temporary file, so neither a partial artifact nor a leftover temp
//! file remains.

use crate::models::Note;
use crate::outputs::json;
use crate::utils::{ensure_writable_dir, export_filename};
use chrono::NaiveDate;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Something that can deliver encoded CSV text as a downloadable artifact.
pub trait Emitter {
    /// Deliver `csv` (and optionally the `notes` it was encoded from),
    /// returning the location of the CSV artifact.
    async fn emit(&self, csv: &str, notes: &[Note]) -> io::Result<PathBuf>;
}

/// The CSV text as file bytes: BOM followed by the UTF-8 text.
pub fn csv_bytes(csv: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + csv.len());
    bytes.extend_from_slice(&UTF8_BOM);
    bytes.extend_from_slice(csv.as_bytes());
    bytes
}

/// Write `bytes` to `path` through a temporary sibling file.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".part");
    let tmp_path = path.with_file_name(tmp_name);

    let written = match fs::write(&tmp_path, bytes).await {
        Ok(()) => fs::rename(&tmp_path, path).await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp_path).await {
            debug!(path = %tmp_path.display(), error = %cleanup, "No temporary file to remove");
        }
        return Err(e);
    }
    Ok(())
}

/// Saves exports into a directory as `<label>_<YYYY-MM-DD>.csv`.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    pub output_dir: PathBuf,
    pub label: String,
    pub date: NaiveDate,
    /// Also write `<label>_<YYYY-MM-DD>.json`.
    pub json_sidecar: bool,
}

impl DownloadDir {
    pub fn csv_path(&self) -> PathBuf {
        self.output_dir
            .join(export_filename(&self.label, self.date, "csv"))
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir
            .join(export_filename(&self.label, self.date, "json"))
    }
}

impl Emitter for DownloadDir {
    #[instrument(level = "info", skip_all, fields(output_dir = %self.output_dir.display()))]
    async fn emit(&self, csv: &str, notes: &[Note]) -> io::Result<PathBuf> {
        ensure_writable_dir(&self.output_dir).await?;

        let csv_path = self.csv_path();
        if fs::try_exists(&csv_path).await.unwrap_or(false) {
            warn!(path = %csv_path.display(), "Overwriting existing export from today");
        }
        write_atomic(&csv_path, &csv_bytes(csv)).await?;
        info!(path = %csv_path.display(), bytes = csv.len() + UTF8_BOM.len(), "Wrote CSV export");

        // The CSV is the export; a failed sidecar does not undo it.
        if self.json_sidecar {
            let json_path = self.json_path();
            if let Err(e) = json::write_notes(notes, &json_path).await {
                warn!(path = %json_path.display(), error = %e, "Failed to write JSON sidecar");
            }
        }

        Ok(csv_path)
    }
}
