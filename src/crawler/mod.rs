//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a fixed-delay retry loop
//! - HTML queries and direct-child link extraction
//! - Concurrent page discovery
//! - Overall run coordination

mod coordinator;
mod discovery;
mod fetcher;
mod links;
mod parser;
mod retry;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{Coordinator, RunReport};
pub use discovery::{
    discover_page_keys, discover_pages, fetch_pages, normalize_page_key, page_requests,
    PageFailure, PageRequest,
};
pub use fetcher::{
    build_http_client, format_user_agent, HttpTransport, ResilientFetcher, Transport,
    TransportError,
};
pub use links::extract_links;
pub use parser::Document;
pub use retry::{Clock, Retry, TokioClock};

use crate::config::Config;

/// Runs a complete crawl: catalog sweep over `pages` index pages, then
/// standings for every contest found
///
/// # Example
///
/// ```no_run
/// use standings_crawler::config::load_config;
/// use standings_crawler::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawler.toml"))?;
/// let report = crawl(config, 3).await?;
/// report.log_summary();
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, pages: u32) -> crate::Result<RunReport> {
    Coordinator::new(config)?.run_crawl(pages).await
}
