//! # Indexing Worker Module
//!
//! This module runs the extractor over pages handed out by a coordinator.
//! A worker receives one task at a time (a rendered file and its URL), reads
//! and parses the file, streams every extracted record back, and finishes the
//! task with a message saying whether anything was produced.
//!
//! ## Key Components
//!
//! - `Task` / `WorkerMessage`: The messages of the worker protocol
//! - `Worker`: Processes tasks from an inbox until told to shut down
//! - `WorkerPool`: Local coordinator running several workers in parallel
//! - `serve_stdio`: The worker protocol as newline-delimited JSON
//!
//! ## Failure handling
//!
//! A missing page is skipped silently, any other read failure is logged.
//! Either way the task finishes normally with zero records; nothing a page
//! does can fail the coordinator.

mod error;
mod pool;
mod stdio;
mod task;

pub use error::WorkerError;
pub use pool::{PoolConfig, PoolConfigBuilder, PoolOutput, ScanSummary, TaskReport, WorkerPool};
pub use stdio::serve_stdio;
pub use task::{Task, WorkerMessage};

use crate::extractor::{Extractor, VersionTable};
use scraper::Html;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

/// A single-task-at-a-time indexing worker
#[derive(Debug, Clone)]
pub struct Worker {
    id: usize,
    extractor: Arc<Extractor>,
    versions: Option<Arc<VersionTable>>,
}

impl Worker {
    /// Create a worker sharing the given extractor and version table
    pub fn new(extractor: Arc<Extractor>, versions: Option<Arc<VersionTable>>) -> Self {
        Self {
            id: 0,
            extractor,
            versions,
        }
    }

    /// Set the id used in logs
    pub fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    /// Id of this worker
    pub fn id(&self) -> usize {
        self.id
    }

    /// Process one task.
    ///
    /// Sends a `Record` message per extracted record as soon as it is
    /// produced, then a single `Finished` message. Returns whether any record
    /// was produced.
    #[instrument(skip(self, task, outbox), fields(worker = self.id, url = %task.url))]
    pub async fn process_task(
        &self,
        task: &Task,
        outbox: &mpsc::UnboundedSender<WorkerMessage>,
    ) -> bool {
        let produced = match read_page(&task.path).await {
            Ok(Some(source)) => self.extract(source, task.url.clone(), outbox.clone()).await,
            Ok(None) => {
                debug!("Page not found: {}", task.path.display());
                false
            }
            Err(e) => {
                error!("{}", e);
                false
            }
        };

        if outbox.send(WorkerMessage::Finished { produced }).is_err() {
            debug!("Coordinator hung up before task completion");
        }
        produced
    }

    /// Parse and extract on the blocking pool, streaming records to `outbox`
    async fn extract(
        &self,
        source: String,
        url: String,
        outbox: mpsc::UnboundedSender<WorkerMessage>,
    ) -> bool {
        let extractor = Arc::clone(&self.extractor);
        let versions = self.versions.clone();

        let result = tokio::task::spawn_blocking(move || {
            let document = Html::parse_document(&source);
            let mut produced = false;
            for record in extractor.extract(&document, &url, versions.as_deref()) {
                produced = true;
                if outbox.send(WorkerMessage::Record(record)).is_err() {
                    break;
                }
            }
            produced
        })
        .await;

        match result {
            Ok(produced) => produced,
            Err(e) => {
                error!("Extraction task failed: {}", WorkerError::from(e));
                false
            }
        }
    }

    /// Process tasks from `inbox` until a `None` shutdown message arrives or
    /// the inbox is closed.
    pub async fn run(
        self,
        mut inbox: mpsc::Receiver<Option<Task>>,
        outbox: mpsc::UnboundedSender<WorkerMessage>,
    ) {
        debug!(worker = self.id, "Worker started");
        let mut handled = 0usize;

        while let Some(message) = inbox.recv().await {
            let Some(task) = message else {
                debug!(worker = self.id, "Shutdown requested");
                break;
            };
            self.process_task(&task, &outbox).await;
            handled += 1;
        }

        inbox.close();
        info!(worker = self.id, "Worker stopped after {} tasks", handled);
    }
}

/// Read a rendered page. `Ok(None)` means the file does not exist.
async fn read_page(path: &Path) -> Result<Option<String>, WorkerError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(WorkerError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
