//! # xhs_notes_export
//!
//! Extracts notes (title, author, content type, body text) from a rendered
//! Xiaohongshu page and exports them as a CSV file that spreadsheet
//! applications open correctly, CJK text included.
//!
//! ## Usage
//!
//! ```sh
//! xhs_notes_export --url https://www.xiaohongshu.com/explore --input explore.html -o ./exports
//! ```
//!
//! ## Architecture
//!
//! One export runs as a short pipeline:
//! 1. **Resolve**: Identify the page (URL plus saved snapshot or live fetch)
//! 2. **Extract**: Parse the document and pull notes out of the detail view
//!    and/or the listing cards, depending on the URL
//! 3. **Encode**: Turn the notes into quoted CSV text
//! 4. **Emit**: Write `<label>_<YYYY-MM-DD>.csv` with a UTF-8 byte-order mark
//!
//! Status changes are published by the orchestrator and printed here.

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod bridge;
mod cli;
mod dom;
mod models;
mod orchestrator;
mod outputs;
mod scrapers;
mod utils;

use bridge::{CliTab, SnapshotBridge};
use cli::Cli;
use orchestrator::Exporter;
use outputs::file::DownloadDir;
use utils::utc_today;

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");
    info!(url = %args.url, locale = %args.locale, "xhs_notes_export starting up");

    let bridge = match SnapshotBridge::new(Duration::from_secs(args.timeout_secs)) {
        Ok(bridge) => bridge,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };
    let resolver = CliTab {
        url: args.url.clone(),
        input: args.input.clone(),
    };
    let emitter = DownloadDir {
        output_dir: args.output_dir.clone(),
        label: args.file_label(),
        date: utc_today(),
        json_sidecar: args.json,
    };
    let exporter = Exporter::new(resolver, bridge, emitter, args.locale.labels());

    // --- Status rendering ---
    let mut status_rx = exporter.subscribe();
    let renderer = tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let status = status_rx.borrow_and_update().clone();
            println!("{status}");
        }
    });

    let status = exporter.run().await;
    drop(exporter);
    if let Err(e) = renderer.await {
        error!(error = %e, "Status renderer stopped unexpectedly");
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, millis = elapsed.as_millis(), "Execution complete");

    if status.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
