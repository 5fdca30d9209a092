//! VK-Harvest: a community wall harvester
//!
//! This crate crawls a community's public wall through the VK API: it fetches a
//! page of posts, descends into every post's comments and comment threads, applies
//! optional keyword filtering, and assembles a flat, typed record set for export.

pub mod config;
pub mod crawler;
pub mod filter;
pub mod model;
pub mod output;

use thiserror::Error;

/// Main error type for VK-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request {method} failed: {message}")]
    RequestFailed { method: String, message: String },

    #[error("API method {method} returned no response: {body}")]
    Api { method: String, body: String },

    #[error("Export error: {0}")]
    Export(#[from] output::ExportError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl was cancelled")]
    Cancelled,

    #[error("Crawl task ended without reporting a result")]
    JobLost,
}

impl HarvestError {
    /// Returns true for failures confined to a single comment or reply page.
    ///
    /// Sub-page crawls treat these as "page absent" and move on; the top-level
    /// wall and member listings propagate them as job-fatal.
    pub fn is_page_local(&self) -> bool {
        matches!(self, Self::RequestFailed { .. } | Self::Api { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for VK-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig};
pub use crawler::{spawn_crawl, spawn_members, CrawlHandle, CrawlOutcome};
pub use model::{Record, ResultSet};
