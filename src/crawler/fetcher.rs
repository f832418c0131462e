//! HTTP fetcher implementation
//!
//! This module handles all requests the crawler makes:
//! - Building the HTTP client with the crawler's identifying headers
//! - A `Transport` seam so the network can be replaced in tests
//! - Error classification (transient vs. permanent)
//! - The resilient fetcher, which retries transient failures forever

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::Document;
use crate::crawler::retry::{Clock, Retry, TokioClock};
use crate::ConfigError;
use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, FROM};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("cannot build a request for {url}: {message}")]
    InvalidRequest { url: String, message: String },
}

impl TransportError {
    /// Returns true if a later attempt may succeed
    ///
    /// Timeouts, connection failures, any non-2xx status, and broken bodies are
    /// transient. A request that cannot even be built is not.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::InvalidRequest { .. })
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_builder() {
            Self::InvalidRequest {
                url,
                message: error.to_string(),
            }
        } else if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Request {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Something that can GET a URL and hand back the response body
pub trait Transport: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, TransportError>>;
}

/// Builds an HTTP client with proper configuration
///
/// Every request carries `User-Agent: Name/Version (+ContactURL)` and
/// `From: ContactEmail`. Redirects follow reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use standings_crawler::config::{CrawlerConfig, UserAgentConfig};
/// use standings_crawler::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "StandingsCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&user_agent, &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> crate::Result<Client> {
    let agent = format_user_agent(user_agent);

    let from = HeaderValue::from_str(&user_agent.contact_email).map_err(|e| {
        ConfigError::Validation(format!(
            "contact_email '{}' is not a valid header value: {}",
            user_agent.contact_email, e
        ))
    })?;
    let mut headers = HeaderMap::new();
    headers.insert(FROM, from);

    let client = Client::builder()
        .user_agent(agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Formats the `User-Agent` header value
pub fn format_user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    )
}

/// `Transport` over a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, TransportError>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| TransportError::from_reqwest(url, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| TransportError::from_reqwest(url, e))
        })
    }
}

/// Fetches documents, retrying transient failures with a fixed delay
///
/// Each attempt is one request against the remote site, so the number of
/// fetches in flight must be bounded by the caller.
#[derive(Debug, Clone)]
pub struct ResilientFetcher<T = HttpTransport, C = TokioClock> {
    transport: T,
    retry: Retry<C>,
}

impl<T: Transport, C: Clock> ResilientFetcher<T, C> {
    pub fn new(transport: T, retry: Retry<C>) -> Self {
        Self { transport, retry }
    }

    /// Fetches the raw body of `url`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The body of the first successful attempt
    /// * `Err(TransportError)` - Only for failures no retry can fix
    pub async fn fetch_body(&self, url: &str) -> Result<String, TransportError> {
        self.retry
            .run(
                |attempt| {
                    if attempt > 1 {
                        tracing::debug!("Fetching {} (attempt {})", url, attempt);
                    }
                    self.transport.get(url)
                },
                TransportError::is_transient,
            )
            .await
    }

    /// Fetches and parses `url`
    pub async fn fetch(&self, url: &str) -> Result<Document, TransportError> {
        let body = self.fetch_body(url).await?;
        Ok(Document::parse(url, &body))
    }
}
