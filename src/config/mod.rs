//! Configuration module for VK-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use vk_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! if let Some(target) = &config.target {
//!     println!("Crawling the wall of: {}", target.domain);
//! }
//! ```

mod fingerprint;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, ClientConfig, Config, CrawlConfig, FilterConfig, MembersConfig, OutputConfig,
    TargetConfig,
};

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
