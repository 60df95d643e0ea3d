//! Export orchestration and status reporting.
//!
//! [`Exporter::run`] drives one export: resolve the active tab, run the
//! Xiaohongshu extractor inside it through the [`PageBridge`], encode the
//! notes as CSV and hand them to the [`Emitter`]. Progress is published as an
//! [`ExportStatus`] on a `watch` channel so a presentation layer can render
//! it; nothing here touches the terminal.
//!
//! # Status Flow
//!
//! ```text
//! Idle -> Fetching -> Exported | NotFound | Failed
//! ```
//!
//! Each call to `run` is an independent cycle. There is no retry: a failed
//! export stays failed until the next invocation.

use crate::bridge::{BridgeError, PageBridge, TabResolver};
use crate::models::Labels;
use crate::outputs::csv::notes_to_csv;
use crate::outputs::file::Emitter;
use crate::scrapers::xiaohongshu::extract_notes;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, instrument};

/// User-visible state of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Idle,
    Fetching,
    Exported { count: usize, path: PathBuf },
    NotFound,
    Failed { message: String },
}

impl ExportStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, ExportStatus::Failed { .. })
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStatus::Idle => f.write_str("Ready"),
            ExportStatus::Fetching => f.write_str("Fetching notes..."),
            ExportStatus::Exported { count, path } => {
                write!(f, "Exported {} notes to {}", count, path.display())
            }
            ExportStatus::NotFound => f.write_str(
                "No notes found. Make sure the page is a Xiaohongshu note or explore page.",
            ),
            ExportStatus::Failed { message } => write!(f, "Export failed: {message}"),
        }
    }
}

/// Anything that stops an export before the file is saved.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("cannot save export: {0}")]
    Emit(#[from] io::Error),
}

/// Runs exports against one tab resolver, bridge and emitter.
pub struct Exporter<R, B, E> {
    resolver: R,
    bridge: B,
    emitter: E,
    labels: &'static Labels,
    status: watch::Sender<ExportStatus>,
}

impl<R, B, E> Exporter<R, B, E>
where
    R: TabResolver,
    B: PageBridge,
    E: Emitter,
{
    pub fn new(resolver: R, bridge: B, emitter: E, labels: &'static Labels) -> Self {
        let (status, _) = watch::channel(ExportStatus::Idle);
        Self {
            resolver,
            bridge,
            emitter,
            labels,
            status,
        }
    }

    /// Receive every status this exporter publishes from now on.
    pub fn subscribe(&self) -> watch::Receiver<ExportStatus> {
        self.status.subscribe()
    }

    fn publish(&self, status: ExportStatus) {
        self.status.send_replace(status);
    }

    /// Run one export cycle and return its final status.
    ///
    /// Never fails: every error ends up in [`ExportStatus::Failed`].
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self) -> ExportStatus {
        self.publish(ExportStatus::Fetching);

        let status = match self.export().await {
            Ok(Some((count, path))) => {
                info!(count, path = %path.display(), "Export complete");
                ExportStatus::Exported { count, path }
            }
            Ok(None) => {
                info!("No notes found on page");
                ExportStatus::NotFound
            }
            Err(e) => {
                error!(error = %e, "Export failed");
                ExportStatus::Failed {
                    message: e.to_string(),
                }
            }
        };

        self.publish(status.clone());
        status
    }

    async fn export(&self) -> Result<Option<(usize, PathBuf)>, ExportError> {
        let tab = self.resolver.active_tab().await?;
        let labels = self.labels;

        let notes = self
            .bridge
            .execute_in_context(&tab, |doc, url| extract_notes(doc, url, labels))
            .await?;
        if notes.is_empty() {
            return Ok(None);
        }

        let csv = notes_to_csv(&notes, labels);
        let path = self.emitter.emit(&csv, &notes).await?;
        Ok(Some((notes.len(), path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{PageSource, Tab};
    use crate::models::{EN_LABELS, Note};
    use scraper::Html;
    use std::sync::Mutex;
    use url::Url;

    struct FixedTab(&'static str);

    impl TabResolver for FixedTab {
        async fn active_tab(&self) -> Result<Tab, BridgeError> {
            Ok(Tab {
                url: Url::parse(self.0).unwrap(),
                source: PageSource::Live,
            })
        }
    }

    enum FakeBridge {
        Page(&'static str),
        Reject(&'static str),
    }

    impl PageBridge for FakeBridge {
        async fn execute_in_context<F>(&self, tab: &Tab, extract: F) -> Result<Vec<Note>, BridgeError>
        where
            F: Fn(&Html, &str) -> Vec<Note>,
        {
            match self {
                FakeBridge::Page(html) => Ok(extract(&Html::parse_document(html), tab.url.as_str())),
                FakeBridge::Reject(message) => Err(BridgeError::TabUnavailable(message.to_string())),
            }
        }
    }

    #[derive(Default)]
    struct RecordingEmitter {
        emitted: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Emitter for RecordingEmitter {
        async fn emit(&self, csv: &str, _notes: &[Note]) -> io::Result<PathBuf> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.emitted.lock().unwrap().push(csv.to_string());
            Ok(PathBuf::from("/downloads/xiaohongshu_notes_2025-05-06.csv"))
        }
    }

    const LISTING_PAGE: &str = r#"
        <div class="note-card"><span class="title">One</span></div>
        <div class="note-card"><span class="title">Two</span></div>
        <div class="note-card"><span class="title">Three</span></div>
    "#;

    fn exporter(
        url: &'static str,
        bridge: FakeBridge,
        emitter: RecordingEmitter,
    ) -> Exporter<FixedTab, FakeBridge, RecordingEmitter> {
        Exporter::new(FixedTab(url), bridge, emitter, &EN_LABELS)
    }

    #[tokio::test]
    async fn test_run_exports_listing_notes() {
        let exporter = exporter(
            "https://www.xiaohongshu.com/",
            FakeBridge::Page(LISTING_PAGE),
            RecordingEmitter::default(),
        );

        let status = exporter.run().await;

        assert_eq!(
            status,
            ExportStatus::Exported {
                count: 3,
                path: PathBuf::from("/downloads/xiaohongshu_notes_2025-05-06.csv"),
            }
        );
        let emitted = exporter.emitter.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].lines().count(), 4);
        assert!(emitted[0].contains(r#""Two","Unknown author","image/text","No content""#));
    }

    #[tokio::test]
    async fn test_run_unrecognized_page_is_not_found() {
        let exporter = exporter(
            "https://www.xiaohongshu.com/user/profile/1",
            FakeBridge::Page(LISTING_PAGE),
            RecordingEmitter::default(),
        );

        assert_eq!(exporter.run().await, ExportStatus::NotFound);
        assert!(exporter.emitter.emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_bridge_rejection_is_failure() {
        let exporter = exporter(
            "https://www.xiaohongshu.com/",
            FakeBridge::Reject("tab closed"),
            RecordingEmitter::default(),
        );

        let status = exporter.run().await;

        assert!(status.is_failure());
        assert!(status.to_string().contains("tab closed"));
        assert!(exporter.emitter.emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_emit_failure_is_failure() {
        let exporter = exporter(
            "https://www.xiaohongshu.com/",
            FakeBridge::Page(LISTING_PAGE),
            RecordingEmitter {
                fail: true,
                ..Default::default()
            },
        );

        match exporter.run().await {
            ExportStatus::Failed { message } => assert!(message.contains("read-only")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_subscribers_observe_final_status() {
        let exporter = exporter(
            "https://www.xiaohongshu.com/",
            FakeBridge::Reject("denied"),
            RecordingEmitter::default(),
        );
        let mut rx = exporter.subscribe();
        assert_eq!(*rx.borrow(), ExportStatus::Idle);

        exporter.run().await;

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_failure());
    }

    #[tokio::test]
    async fn test_runs_are_independent() {
        let exporter = exporter(
            "https://www.xiaohongshu.com/",
            FakeBridge::Page(LISTING_PAGE),
            RecordingEmitter::default(),
        );

        exporter.run().await;
        exporter.run().await;

        assert_eq!(exporter.emitter.emitted.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_overlapping_runs_each_complete() {
        let exporter = exporter(
            "https://www.xiaohongshu.com/",
            FakeBridge::Page(LISTING_PAGE),
            RecordingEmitter::default(),
        );

        let (first, second) = tokio::join!(exporter.run(), exporter.run());

        assert!(matches!(first, ExportStatus::Exported { count: 3, .. }));
        assert!(matches!(second, ExportStatus::Exported { count: 3, .. }));
        let emitted = exporter.emitter.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[0], emitted[1]);
        assert_eq!(*exporter.subscribe().borrow(), first);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(ExportStatus::Fetching.to_string(), "Fetching notes...");
        assert_eq!(
            ExportStatus::Exported {
                count: 2,
                path: PathBuf::from("out.csv")
            }
            .to_string(),
            "Exported 2 notes to out.csv"
        );
        assert!(ExportStatus::NotFound.to_string().starts_with("No notes found"));
        assert_eq!(
            ExportStatus::Failed {
                message: "boom".to_string()
            }
            .to_string(),
            "Export failed: boom"
        );
    }
}
