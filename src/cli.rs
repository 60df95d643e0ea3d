//! Command-line interface definitions for xhs_notes_export.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment variables.

use crate::models::Locale;
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Command-line arguments for xhs_notes_export.
///
/// The page to export is identified by its URL, which selects the
/// extraction mode. Its HTML comes from `--input` when given (a page saved
/// from the browser) and is fetched from the URL otherwise.
///
/// # Examples
///
/// ```sh
/// # Export the notes of a page saved from the browser
/// xhs_notes_export --url https://www.xiaohongshu.com/explore --input explore.html
///
/// # Fetch a note page directly, Chinese labels, JSON copy alongside the CSV
/// xhs_notes_export -u https://www.xiaohongshu.com/explore/64f0c0de --locale zh --json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URL of the page being exported
    #[arg(short, long, env = "XHS_URL")]
    pub url: Url,

    /// Saved HTML of the rendered page (fetched from --url when omitted)
    #[arg(short, long, env = "XHS_INPUT")]
    pub input: Option<PathBuf>,

    /// Directory the export is written to
    #[arg(short, long, env = "XHS_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Language of the CSV header, placeholders and content-type names
    #[arg(long, env = "XHS_LOCALE", value_enum, default_value_t = Locale::En)]
    pub locale: Locale,

    /// Site label used in the file name (defaults to the locale's label)
    #[arg(long, env = "XHS_LABEL")]
    pub label: Option<String>,

    /// Also write the notes as JSON next to the CSV
    #[arg(long, env = "XHS_JSON")]
    pub json: bool,

    /// Timeout in seconds for fetching a live page
    #[arg(long, env = "XHS_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Cli {
    /// The file label: `--label`, or the locale's default.
    pub fn file_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.locale.labels().file_label.to_string())
    }
}
