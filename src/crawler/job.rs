//! Crawl jobs running on their own task
//!
//! A driving interface starts a job with [`spawn_crawl`] or [`spawn_members`]
//! and gets back a [`CrawlHandle`]: a one-way stream of integer progress
//! percentages, exactly one terminal result, and a cooperative cancel switch.

use crate::config::{ClientConfig, CrawlConfig, MembersConfig};
use crate::crawler::client::ApiClient;
use crate::crawler::coordinator::Coordinator;
use crate::crawler::members::fetch_members;
use crate::model::{Record, ResultSet};
use crate::output::{summarize, CrawlSummary};
use crate::HarvestError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Result of a finished job
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub records: ResultSet,
    pub summary: CrawlSummary,
    /// Hash of the settings that produced the records
    pub fingerprint: String,
    /// Community member total reported upstream (member jobs only)
    pub member_total: Option<i64>,
}

impl CrawlOutcome {
    pub fn new(records: ResultSet, fingerprint: String) -> Self {
        let summary = summarize(&records);
        Self {
            records,
            summary,
            fingerprint,
            member_total: None,
        }
    }
}

/// Sends monotonic, de-duplicated progress percentages
#[derive(Debug, Default)]
pub struct ProgressReporter {
    tx: Option<mpsc::UnboundedSender<u8>>,
    last: Option<u8>,
}

impl ProgressReporter {
    pub fn new(tx: mpsc::UnboundedSender<u8>) -> Self {
        Self { tx: Some(tx), last: None }
    }

    /// A reporter that only tracks the last value
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.send(0);
    }

    /// Reports `processed / total`, rounded down to a whole percent
    pub fn report(&mut self, processed: usize, total: usize) {
        let percent = if total == 0 {
            100
        } else {
            (processed.min(total) * 100 / total) as u8
        };
        self.send(percent);
    }

    pub fn finish(&mut self) {
        self.send(100);
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }

    fn send(&mut self, percent: u8) {
        if self.last.is_some_and(|last| percent <= last) {
            return;
        }
        self.last = Some(percent);
        if let Some(tx) = &self.tx {
            // The receiver may be gone if the interface stopped listening
            let _ = tx.send(percent);
        }
    }
}

/// Handle to a running job
pub struct CrawlHandle {
    progress: mpsc::UnboundedReceiver<u8>,
    result: oneshot::Receiver<Result<CrawlOutcome, HarvestError>>,
    cancelled: Arc<AtomicBool>,
}

impl CrawlHandle {
    /// Next progress update; None once the job has stopped reporting
    pub async fn next_progress(&mut self) -> Option<u8> {
        self.progress.recv().await
    }

    /// Asks the job to stop at its next suspension point
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Waits for the terminal event
    pub async fn wait(self) -> Result<CrawlOutcome, HarvestError> {
        self.result.await.unwrap_or(Err(HarvestError::JobLost))
    }
}

/// Starts a wall crawl on a new tokio task
///
/// Must be called from within a tokio runtime.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use vk_harvest::config::{load_config, CrawlConfig};
/// use vk_harvest::crawler::spawn_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let mut handle = spawn_crawl(CrawlConfig::try_from(&config)?);
/// while let Some(percent) = handle.next_progress().await {
///     println!("{}%", percent);
/// }
/// let outcome = handle.wait().await?;
/// println!("{} records", outcome.summary.total);
/// # Ok(())
/// # }
/// ```
pub fn spawn_crawl(config: CrawlConfig) -> CrawlHandle {
    let fingerprint = config.fingerprint();
    tracing::info!("[{}] Job fingerprint {}", config.domain, fingerprint);

    spawn_job(move |cancelled, mut progress| async move {
        let coordinator = Coordinator::new(config, cancelled).await?;
        let records = coordinator.run(&mut progress).await?;
        Ok(CrawlOutcome::new(records, fingerprint))
    })
}

/// Starts a single-page member listing on a new tokio task
///
/// Only the connection settings are needed; no wall target is involved.
pub fn spawn_members(client: ClientConfig, request: MembersConfig) -> CrawlHandle {
    let fingerprint = request.fingerprint(&client);
    tracing::info!("[{}] Job fingerprint {}", request.group_id, fingerprint);

    spawn_job(move |cancelled, mut progress| async move {
        if cancelled.load(Ordering::SeqCst) {
            return Err(HarvestError::Cancelled);
        }

        let api = ApiClient::new(&client)?;
        let (members, total) = fetch_members(&api, &request).await?;
        progress.finish();

        let mut records = ResultSet::new();
        records.extend(members.into_iter().map(Record::Member));

        let mut outcome = CrawlOutcome::new(records, fingerprint);
        outcome.member_total = Some(total);
        Ok(outcome)
    })
}

fn spawn_job<F, Fut>(job: F) -> CrawlHandle
where
    F: FnOnce(Arc<AtomicBool>, ProgressReporter) -> Fut,
    Fut: std::future::Future<Output = Result<CrawlOutcome, HarvestError>> + Send + 'static,
{
    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let (result_tx, result_rx) = oneshot::channel();
    let cancelled = Arc::new(AtomicBool::new(false));

    let mut progress = ProgressReporter::new(progress_tx);
    progress.start();
    let future = job(Arc::clone(&cancelled), progress);

    tokio::spawn(async move {
        let outcome = future.await;
        if let Err(e) = &outcome {
            tracing::error!("Crawl job failed: {}", e);
        }
        let _ = result_tx.send(outcome);
    });

    CrawlHandle {
        progress: progress_rx,
        result: result_rx,
        cancelled,
    }
}
