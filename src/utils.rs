//! Utility functions for string handling, dates and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation for logging
//! - Export file naming with the current UTC date
//! - File system validation for the output directory

use chrono::{NaiveDate, Utc};
use std::fs as stdfs;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended. Truncation respects character boundaries,
/// so CJK text is safe to pass in.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Today's date in UTC, as in an ISO 8601 timestamp's date part.
///
/// Export names use the UTC date regardless of the machine's time zone.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// File name for an export: `<label>_<YYYY-MM-DD>.<extension>`.
pub fn export_filename(label: &str, date: NaiveDate, extension: &str) -> String {
    format!("{}_{}.{}", label, date.format("%Y-%m-%d"), extension)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and immediately
/// deletes a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await?;
    // A small sync write has the simplest error surface.
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let s = "小红书笔记";
        assert_eq!(truncate_for_log(s, 2), "小红…(+9 bytes)");
        assert_eq!(truncate_for_log(s, 5), "小红书笔记");
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            export_filename("xiaohongshu_notes", date, "csv"),
            "xiaohongshu_notes_2025-03-07.csv"
        );
        assert_eq!(export_filename("小红书笔记", date, "json"), "小红书笔记_2025-03-07.json");
    }

    #[test]
    fn test_export_filename_uses_utc_iso_date() {
        let expected = format!("xiaohongshu_notes_{}.csv", &Utc::now().to_rfc3339()[..10]);
        assert_eq!(export_filename("xiaohongshu_notes", utc_today(), "csv"), expected);
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        ensure_writable_dir(&nested).await.unwrap();

        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }
}
