//! Output generation for extracted notes.
//!
//! # Submodules
//!
//! - [`csv`]: Encodes notes as CSV text
//! - [`json`]: Serializes notes to a JSON sidecar file
//! - [`file`]: Writes the export artifacts into the output directory
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── xiaohongshu_notes_2025-05-06.csv   # UTF-8 with BOM
//! └── xiaohongshu_notes_2025-05-06.json  # only with --json
//! ```

pub mod csv;
pub mod file;
pub mod json;
