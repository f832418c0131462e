use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Standings-Crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// How the pages of one contest's standings are collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationMode {
    /// Discover every page link on page 1 and fetch them all at once
    #[default]
    Concurrent,
    /// Walk pages 1, 2, 3, ... until a page repeats content already seen
    Sequential,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of page fetches in flight for one discovery call
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: u32,

    /// Fixed delay between attempts of a failed request (seconds)
    #[serde(rename = "retry-delay-secs", default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Number of participant rows the source renders per standings page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub pagination: PaginationMode,
}

impl CrawlerConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent_fetches(),
            retry_delay_secs: default_retry_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            page_size: default_page_size(),
            pagination: PaginationMode::default(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Sent as the `From` header on every request
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Where the contest listings live
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Scheme and host of the contest site, e.g. "https://codeforces.com"
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Locale requested for index pages; some contests are listed in one locale only
    #[serde(default = "default_locale")]
    pub locale: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            locale: default_locale(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one `<contest_id>.txt` file per contest
    #[serde(rename = "standings-dir", default = "default_standings_dir")]
    pub standings_dir: String,

    /// File holding the list of rated contest ids
    #[serde(rename = "catalog-path", default = "default_catalog_path")]
    pub catalog_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            standings_dir: default_standings_dir(),
            catalog_path: default_catalog_path(),
        }
    }
}

fn default_max_concurrent_fetches() -> u32 {
    50
}

fn default_retry_delay_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> usize {
    100
}

fn default_base_url() -> String {
    "https://codeforces.com".to_string()
}

fn default_locale() -> Option<String> {
    Some("ru".to_string())
}

fn default_standings_dir() -> String {
    "./standings".to_string()
}

fn default_catalog_path() -> String {
    "./data/all_contests.txt".to_string()
}
