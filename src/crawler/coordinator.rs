//! Crawler coordinator - wall crawl orchestration
//!
//! The coordinator owns everything one crawl job needs: the immutable job
//! settings, the API client with its rate limiter, the keyword filter and the
//! cancellation flag. The post, comment and reply crawlers are implemented on
//! it in sibling modules and all append into a single [`ResultSet`] that is
//! threaded through the calls.

use crate::config::CrawlConfig;
use crate::crawler::client::ApiClient;
use crate::crawler::job::ProgressReporter;
use crate::filter::KeywordFilter;
use crate::model::ResultSet;
use crate::HarvestError;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Main crawler coordinator structure
pub struct Coordinator {
    pub(crate) config: Arc<CrawlConfig>,
    client: ApiClient,
    pub(crate) filter: KeywordFilter,
    cancelled: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a coordinator, loading the keyword list when filtering is enabled
    ///
    /// # Arguments
    ///
    /// * `config` - The job settings
    /// * `cancelled` - Flag checked before every upstream call
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub async fn new(config: CrawlConfig, cancelled: Arc<AtomicBool>) -> Result<Self, HarvestError> {
        let client = ApiClient::new(&config.client)?;
        let filter = KeywordFilter::for_job(&config.keywords_path, config.filter_keywords).await;

        Ok(Self {
            config: Arc::new(config),
            client,
            filter,
            cancelled,
        })
    }

    /// Runs the wall crawl
    ///
    /// This is the core crawling logic that:
    /// 1. Fetches the first page of wall posts
    /// 2. Normalizes every post that passes the keyword filter
    /// 3. Descends into its comments and comment threads
    /// 4. Reports progress after each post
    pub async fn run(&self, progress: &mut ProgressReporter) -> Result<ResultSet, HarvestError> {
        tracing::info!("[{}] Starting wall crawl", self.config.domain);
        let start_time = std::time::Instant::now();

        let mut records = ResultSet::new();
        self.crawl_wall(&mut records, progress).await?;

        tracing::info!(
            "[{}] Crawl completed: {} records in {:?}",
            self.config.domain,
            records.len(),
            start_time.elapsed()
        );

        Ok(records)
    }

    /// Cooperative cancellation point
    pub(crate) fn checkpoint(&self) -> Result<(), HarvestError> {
        if self.cancelled.load(Ordering::SeqCst) {
            tracing::info!("[{}] Crawl cancelled", self.config.domain);
            return Err(HarvestError::Cancelled);
        }
        Ok(())
    }

    /// Checks for cancellation, then issues one API call through the limiter
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, HarvestError> {
        self.checkpoint()?;
        self.client.call_json(method, params).await
    }
}
