//! Crawler module for wall, comment and member harvesting
//!
//! This module contains the core crawling logic, including:
//! - Rate-limited API calls against a single upstream endpoint
//! - The first page of wall posts
//! - Paginated fan-out over comments and comment threads
//! - Single-page member listings
//! - Job handles with progress reporting and cancellation

mod client;
mod comments;
mod coordinator;
mod job;
mod limiter;
mod members;
mod posts;

pub use client::{build_http_client, decode_response, ApiClient};
pub use comments::{page_offsets, COMMENTS_METHOD, COMMENT_PAGE_SIZE};
pub use coordinator::Coordinator;
pub use job::{spawn_crawl, spawn_members, CrawlHandle, CrawlOutcome, ProgressReporter};
pub use limiter::RateLimiter;
pub use members::{fetch_members, member_params, MEMBERS_METHOD};
pub use posts::WALL_METHOD;

use crate::config::CrawlConfig;
use crate::model::ResultSet;
use crate::HarvestError;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Runs a complete wall crawl on the current task
///
/// This is the blocking-style entry point for callers that do not need a
/// handle. It will:
/// 1. Load the keyword list if filtering is enabled
/// 2. Build the API client and rate limiter
/// 3. Fetch the first page of posts
/// 4. Crawl comments and replies post by post
///
/// # Returns
///
/// * `Ok(ResultSet)` - Every record in crawl order
/// * `Err(HarvestError)` - A job-fatal failure; no partial result is returned
pub async fn crawl(config: CrawlConfig) -> Result<ResultSet, HarvestError> {
    let coordinator = Coordinator::new(config, Arc::new(AtomicBool::new(false))).await?;
    coordinator.run(&mut ProgressReporter::silent()).await
}
