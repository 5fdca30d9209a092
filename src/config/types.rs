use crate::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for VK-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    /// Wall to crawl; only member listings may leave it out
    #[serde(default)]
    pub target: Option<TargetConfig>,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub members: Option<MembersConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Upstream API access configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Pre-obtained access token
    pub token: String,

    /// Protocol version sent with every call
    #[serde(default = "default_api_version")]
    pub version: String,

    /// Method endpoint root; each call is `{base-url}/{method}`
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Optional HTTP(S) proxy for all calls
    #[serde(default)]
    pub proxy: Option<String>,

    /// Minimum time between the starts of two requests (milliseconds)
    #[serde(rename = "min-interval-ms", default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// The community whose wall is crawled
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Short textual address of the community (e.g. "ddx_fitness")
    pub domain: String,

    /// Numeric owner id of the wall, negative for communities
    #[serde(rename = "owner-id")]
    pub owner_id: i64,

    /// Number of posts fetched from the top of the wall
    #[serde(default = "default_post_count")]
    pub count: u32,
}

/// Keyword filtering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Plain text file, one keyword per line
    #[serde(rename = "keywords-path", default = "default_keywords_path")]
    pub keywords_path: PathBuf,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            keywords_path: default_keywords_path(),
        }
    }
}

/// Member listing request parameters
#[derive(Debug, Clone, Deserialize)]
pub struct MembersConfig {
    #[serde(rename = "group-id")]
    pub group_id: String,

    #[serde(default = "default_member_count")]
    pub count: u32,

    #[serde(default)]
    pub offset: u32,

    #[serde(default)]
    pub sort: Option<String>,

    /// Comma separated profile fields to request
    #[serde(default)]
    pub fields: Option<String>,

    #[serde(default)]
    pub filter: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the export files are written into
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Export formats: "json", "csv", "xlsx"
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,

    /// File name stem; derived from the target when absent
    #[serde(rename = "base-name", default)]
    pub base_name: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            formats: default_formats(),
            base_name: None,
        }
    }
}

/// Connection settings shared by every job kind
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: String,
    pub min_interval: Duration,
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub api_base: String,
    pub api_version: String,
}

impl From<&ApiConfig> for ClientConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            token: api.token.clone(),
            min_interval: Duration::from_millis(api.min_interval_ms),
            timeout: Duration::from_secs(api.timeout_secs),
            proxy: api.proxy.clone(),
            api_base: api.base_url.clone(),
            api_version: api.version.clone(),
        }
    }
}

/// Settings of a single wall crawl job
///
/// Derived from the loaded [`Config`] once per job and never changed while the
/// job runs.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub client: ClientConfig,
    pub domain: String,
    pub owner_id: i64,
    pub count: u32,
    pub filter_keywords: bool,
    pub keywords_path: PathBuf,
}

impl TryFrom<&Config> for CrawlConfig {
    type Error = ConfigError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        let target = config.target.as_ref().ok_or_else(|| {
            ConfigError::Validation("a wall crawl requires a [target] section".to_string())
        })?;

        Ok(Self {
            client: ClientConfig::from(&config.api),
            domain: target.domain.clone(),
            owner_id: target.owner_id,
            count: target.count,
            filter_keywords: config.filter.enabled,
            keywords_path: config.filter.keywords_path.clone(),
        })
    }
}

fn default_api_version() -> String {
    "5.131".to_string()
}

fn default_base_url() -> String {
    "https://api.vk.com/method".to_string()
}

fn default_min_interval_ms() -> u64 {
    350
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_post_count() -> u32 {
    10
}

fn default_member_count() -> u32 {
    1000
}

fn default_keywords_path() -> PathBuf {
    PathBuf::from("data/words.txt")
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_formats() -> Vec<String> {
    vec!["json".to_string(), "csv".to_string(), "xlsx".to_string()]
}
