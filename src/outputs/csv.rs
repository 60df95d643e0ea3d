//! CSV encoding of notes.
//!
//! The header row carries the locale's four column labels unquoted. Every
//! data field is wrapped in double quotes with inner quotes doubled, fields
//! are joined by `,` and rows by `\n`, with no trailing newline.

use crate::models::{Labels, Note};

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Encode `notes` as CSV text.
pub fn notes_to_csv(notes: &[Note], labels: &Labels) -> String {
    let mut rows = Vec::with_capacity(notes.len() + 1);
    rows.push(labels.header.join(","));

    for note in notes {
        let fields = [
            quote(&note.title),
            quote(&note.author),
            quote(labels.content_type(note.content_type)),
            quote(&note.content),
        ];
        rows.push(fields.join(","));
    }

    rows.join("\n")
}
