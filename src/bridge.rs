//! Access to the page being exported.
//!
//! Two host capabilities sit behind traits so the orchestrator can be driven
//! by in-process fakes:
//! - [`TabResolver`]: identifies the "active tab" (page URL plus where its
//!   rendered HTML comes from)
//! - [`PageBridge`]: loads that tab's document and runs an extraction
//!   function inside it; this is the only asynchronous step of an export
//!
//! [`SnapshotBridge`] is the real bridge. It reads a saved HTML snapshot of
//! the rendered page or, without one, fetches the URL over HTTP. Xiaohongshu
//! renders most of its feed client-side, so a snapshot saved from the
//! browser usually yields more notes than a live fetch.

use crate::models::Note;
use crate::utils::truncate_for_log;
use reqwest::header::CONTENT_TYPE;
use scraper::Html;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Failures while resolving a tab or running the extractor inside it.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The tab cannot be resolved or its document is not reachable.
    #[error("tab unavailable: {0}")]
    TabUnavailable(String),

    /// Reading the saved page snapshot failed.
    #[error("cannot read page snapshot {}: {source}", .path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Fetching the live page failed.
    #[error("cannot load page: {0}")]
    Http(#[from] reqwest::Error),

    /// The page context produced something that is not a document.
    #[error("malformed page result: {0}")]
    MalformedResult(String),
}

/// Where a tab's rendered HTML comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    /// A saved copy of the rendered page.
    Snapshot(PathBuf),
    /// Fetch the URL over HTTP.
    Live,
}

/// The page an export runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub url: Url,
    pub source: PageSource,
}

/// Resolves the currently active tab.
pub trait TabResolver {
    async fn active_tab(&self) -> Result<Tab, BridgeError>;
}

/// Runs an extraction function inside a tab's document context.
pub trait PageBridge {
    /// Load `tab`'s document and return what `extract` produces for it.
    ///
    /// `extract` receives the parsed document and the tab URL.
    async fn execute_in_context<F>(&self, tab: &Tab, extract: F) -> Result<Vec<Note>, BridgeError>
    where
        F: Fn(&Html, &str) -> Vec<Note>;
}

/// A tab resolved from command-line arguments.
#[derive(Debug, Clone)]
pub struct CliTab {
    pub url: Url,
    pub input: Option<PathBuf>,
}

impl TabResolver for CliTab {
    async fn active_tab(&self) -> Result<Tab, BridgeError> {
        let source = match &self.input {
            Some(path) => {
                if !fs::try_exists(path).await.unwrap_or(false) {
                    return Err(BridgeError::TabUnavailable(format!(
                        "snapshot {} does not exist",
                        path.display()
                    )));
                }
                PageSource::Snapshot(path.clone())
            }
            None => PageSource::Live,
        };
        debug!(url = %self.url, ?source, "Resolved active tab");
        Ok(Tab {
            url: self.url.clone(),
            source,
        })
    }
}

/// Loads pages from snapshots or over HTTP and runs the extractor on them.
#[derive(Debug, Clone)]
pub struct SnapshotBridge {
    client: reqwest::Client,
}

impl SnapshotBridge {
    pub fn new(timeout: Duration) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    async fn read_snapshot(&self, path: &Path) -> Result<String, BridgeError> {
        let bytes = fs::read(path).await.map_err(|source| BridgeError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        info!(bytes = bytes.len(), "Read page snapshot");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_live(&self, url: &Url) -> Result<String, BridgeError> {
        let t0 = Instant::now();
        let response = self.client.get(url.clone()).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.is_empty() && !content_type.contains("html") {
            return Err(BridgeError::MalformedResult(format!(
                "expected an HTML document, got {content_type}"
            )));
        }

        let body = response.text().await?;
        info!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Fetched live page"
        );
        Ok(body)
    }
}

impl PageBridge for SnapshotBridge {
    #[instrument(level = "info", skip_all, fields(url = %tab.url))]
    async fn execute_in_context<F>(&self, tab: &Tab, extract: F) -> Result<Vec<Note>, BridgeError>
    where
        F: Fn(&Html, &str) -> Vec<Note>,
    {
        let body = match &tab.source {
            PageSource::Snapshot(path) => self.read_snapshot(path).await?,
            PageSource::Live => self.fetch_live(&tab.url).await?,
        };

        if body.trim().is_empty() {
            return Err(BridgeError::MalformedResult("page body is empty".to_string()));
        }

        let document = Html::parse_document(&body);
        if !document.errors.is_empty() {
            warn!(
                parse_errors = document.errors.len(),
                first = %truncate_for_log(&document.errors[0], 80),
                "HTML parsed with recoverable errors"
            );
        }

        Ok(extract(&document, tab.url.as_str()))
    }
}
