//! Local coordinator running a pool of workers
//!
//! Each worker gets its own inbox and outbox. A driver per worker pulls the
//! next task from a shared queue, hands it over, forwards the records it
//! streams back, and waits for the task's `Finished` message before handing
//! out the next one. When the queue is empty every worker is sent `None`.

use crate::error::Result;
use crate::extractor::{Extractor, SearchRecord, VersionTable};
use crate::worker::{Task, Worker, WorkerError, WorkerMessage};
use futures::future;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Configuration for the worker pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of workers
    pub workers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Builder for PoolConfig
#[derive(Debug, Default)]
pub struct PoolConfigBuilder {
    config: PoolConfig,
}

impl PoolConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: PoolConfig::default(),
        }
    }

    /// Set the number of workers
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Build the configuration
    pub fn build(self) -> PoolConfig {
        self.config
    }
}

impl PoolConfig {
    /// Create a new builder
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::new()
    }
}

/// Completion report for one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// URL of the task
    pub url: String,

    /// Whether the page produced records
    pub produced: bool,
}

/// Counters for a pool run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Tasks handed to workers
    pub tasks: usize,

    /// Tasks that produced at least one record
    pub indexed: usize,

    /// Records produced
    pub records: usize,
}

/// Records and counters of a pool run
#[derive(Debug, Clone)]
pub struct PoolOutput {
    /// Every record produced, in document order per page
    pub records: Vec<SearchRecord>,

    /// Counters
    pub summary: ScanSummary,
}

/// A pool of indexing workers
#[derive(Debug, Clone)]
pub struct WorkerPool {
    extractor: Arc<Extractor>,
    versions: Option<Arc<VersionTable>>,
    config: PoolConfig,
}

impl WorkerPool {
    /// Create a pool; workers are spawned per run
    pub fn new(
        extractor: Arc<Extractor>,
        versions: Option<Arc<VersionTable>>,
        config: PoolConfig,
    ) -> Self {
        Self {
            extractor,
            versions,
            config,
        }
    }

    /// Index every task and collect the records.
    ///
    /// Records of one page stay contiguous and in document order; pages
    /// finish in no particular order. When `progress` is given a report is
    /// sent after every task.
    #[instrument(
        skip(self, tasks, progress),
        fields(tasks = tasks.len(), workers = self.config.workers)
    )]
    pub async fn run(
        &self,
        tasks: Vec<Task>,
        progress: Option<mpsc::Sender<TaskReport>>,
    ) -> Result<PoolOutput> {
        let total = tasks.len();
        let workers = self.config.workers.max(1).min(total.max(1));
        let queue = Arc::new(Mutex::new(VecDeque::from(tasks)));
        let (page_tx, mut page_rx) = mpsc::unbounded_channel::<Vec<SearchRecord>>();

        info!("Indexing {} pages with {} workers", total, workers);

        let drivers = (0..workers)
            .map(|id| {
                let worker = Worker::new(Arc::clone(&self.extractor), self.versions.clone())
                    .with_id(id);
                let queue = Arc::clone(&queue);
                let page_tx = page_tx.clone();
                let progress = progress.clone();
                tokio::spawn(drive_worker(worker, queue, page_tx, progress))
            })
            .collect::<Vec<_>>();
        drop(page_tx);

        let mut summary = ScanSummary::default();
        for result in future::join_all(drivers).await {
            let (tasks, indexed) = result.map_err(WorkerError::from)??;
            summary.tasks += tasks;
            summary.indexed += indexed;
        }

        let mut records = Vec::new();
        while let Some(page) = page_rx.recv().await {
            records.extend(page);
        }
        summary.records = records.len();

        info!(
            "Indexed {} of {} pages, {} records",
            summary.indexed, summary.tasks, summary.records
        );
        Ok(PoolOutput { records, summary })
    }
}

fn next_task(queue: &Mutex<VecDeque<Task>>) -> Option<Task> {
    queue.lock().ok().and_then(|mut queue| queue.pop_front())
}

/// Feed one worker from the shared queue. Returns (tasks, indexed).
async fn drive_worker(
    worker: Worker,
    queue: Arc<Mutex<VecDeque<Task>>>,
    pages: mpsc::UnboundedSender<Vec<SearchRecord>>,
    progress: Option<mpsc::Sender<TaskReport>>,
) -> std::result::Result<(usize, usize), WorkerError> {
    let id = worker.id();
    let (task_tx, task_rx) = mpsc::channel::<Option<Task>>(1);
    let (message_tx, mut message_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(worker.run(task_rx, message_tx));

    let mut handled = 0usize;
    let mut indexed = 0usize;

    while let Some(task) = next_task(&queue) {
        let url = task.url.clone();
        task_tx
            .send(Some(task))
            .await
            .map_err(|_| WorkerError::ChannelClosed(id))?;

        let mut page = Vec::new();
        let produced = loop {
            match message_rx.recv().await {
                Some(WorkerMessage::Record(record)) => page.push(record),
                Some(WorkerMessage::Finished { produced }) => break produced,
                None => return Err(WorkerError::ChannelClosed(id)),
            }
        };

        handled += 1;
        if produced {
            indexed += 1;
            // the receiver lives until every driver has finished
            let _ = pages.send(page);
        }
        if let Some(progress) = &progress {
            let _ = progress.send(TaskReport { url, produced }).await;
        }
    }

    let _ = task_tx.send(None).await;
    handle.await?;
    debug!(worker = id, "Driver finished after {} tasks", handled);
    Ok((handled, indexed))
}
