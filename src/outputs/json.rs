//! JSON sidecar output.
//!
//! Serializes the exported notes with `serde_json` so the same data is
//! available to tools that prefer structured input over CSV.

use crate::models::Note;
use std::io;
use std::path::Path;
use tracing::{info, instrument};

use super::file::write_atomic;

/// Pretty-printed JSON array of `notes`.
pub fn notes_to_json(notes: &[Note]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(notes)
}

/// Write `notes` as JSON to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_notes(notes: &[Note], path: &Path) -> io::Result<()> {
    let json = notes_to_json(notes)?;
    write_atomic(path, json.as_bytes()).await?;
    info!(count = notes.len(), "Wrote JSON sidecar");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;

    #[test]
    fn test_notes_to_json() {
        let notes = vec![Note {
            title: "T".to_string(),
            author: "A".to_string(),
            content_type: ContentType::Video,
            content: "C".to_string(),
        }];

        let json = notes_to_json(&notes).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["title"], "T");
        assert_eq!(value[0]["content_type"], "video");
    }

    #[tokio::test]
    async fn test_write_notes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.json");

        write_notes(&[], &path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
