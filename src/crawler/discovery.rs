//! Page discovery and concurrent fan-out
//!
//! Starting from an already fetched root document, discovery finds the sibling
//! pages it links to (pagination links, contest links), builds one URL per
//! page, and fetches them all through a bounded pool. Results come back in
//! completion order, keyed by the page key they were discovered under.

use crate::crawler::fetcher::{ResilientFetcher, Transport, TransportError};
use crate::crawler::links::extract_links;
use crate::crawler::parser::Document;
use crate::crawler::retry::Clock;
use crate::source::SourceUrls;
use crate::standings::PageBatch;
use crate::StandingsError;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use url::Url;

/// One page to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub key: String,
    pub url: Url,
}

/// A discovered page that could not be turned into a batch
#[derive(Debug)]
pub struct PageFailure {
    pub key: String,
    pub error: StandingsError,
}

/// Normalizes a discovered suffix into a page key
///
/// The first page is linked both as `1` and as `1?<query>`; both spellings
/// map to `1` so the page is fetched once.
pub fn normalize_page_key(suffix: &str) -> String {
    if suffix.starts_with("1?") {
        "1".to_string()
    } else {
        suffix.to_string()
    }
}

/// Distinct, normalized page keys linked from `root` under `prefix`
pub fn discover_page_keys(root: &Document, prefix: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    extract_links(root, prefix)
        .into_iter()
        .map(|suffix| normalize_page_key(&suffix))
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Builds `{prefix}{key}` or `{prefix}{key}/{suffix}` URLs for each key
pub fn page_requests(
    urls: &SourceUrls,
    keys: Vec<String>,
    prefix: &str,
    suffix: &str,
) -> Result<Vec<PageRequest>, url::ParseError> {
    keys.into_iter()
        .map(|key| {
            let path = if suffix.is_empty() {
                format!("{}{}", prefix, key)
            } else {
                format!("{}{}/{}", prefix, key, suffix)
            };
            Ok(PageRequest {
                url: urls.absolute(&path)?,
                key,
            })
        })
        .collect()
}

/// Fetches every request with at most `concurrency` in flight
///
/// `extract` runs on each parsed document as soon as it arrives. The output is
/// in completion order, not request order.
pub async fn fetch_pages<T, C, R, F>(
    fetcher: &ResilientFetcher<T, C>,
    requests: Vec<PageRequest>,
    concurrency: usize,
    extract: F,
) -> Vec<(String, Result<R, TransportError>)>
where
    T: Transport,
    C: Clock,
    F: Fn(&Document) -> R,
{
    tracing::debug!(
        "Fetching {} pages with concurrency {}",
        requests.len(),
        concurrency
    );

    let extract = &extract;
    stream::iter(requests)
        .map(|request| async move {
            let outcome = fetcher
                .fetch(request.url.as_str())
                .await
                .map(|doc| extract(&doc));
            (request.key, outcome)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

/// Discovers the pages linked from `root` and extracts their participant rows
///
/// A discovered page whose URL is the root's own URL is not fetched again; its
/// rows are read from `root`.
///
/// # Returns
///
/// One entry per discovered page, in no particular order:
/// * `Ok(PageBatch)` - The page's participant records
/// * `Err(PageFailure)` - The page could not be fetched or its rows are malformed
pub async fn discover_pages<T: Transport, C: Clock>(
    fetcher: &ResilientFetcher<T, C>,
    urls: &SourceUrls,
    root: &Document,
    prefix: &str,
    suffix: &str,
    concurrency: usize,
) -> Result<Vec<Result<PageBatch, PageFailure>>, url::ParseError> {
    let keys = discover_page_keys(root, prefix);
    let (own, remote): (Vec<_>, Vec<_>) = page_requests(urls, keys, prefix, suffix)?
        .into_iter()
        .partition(|request| request.url.as_str() == root.url());

    let mut pages: Vec<Result<PageBatch, PageFailure>> = own
        .into_iter()
        .map(|request| into_batch(request.key, Ok(root.participants())))
        .collect();

    let fetched = fetch_pages(fetcher, remote, concurrency, Document::participants).await;
    pages.extend(
        fetched
            .into_iter()
            .map(|(key, outcome)| into_batch(key, outcome)),
    );

    Ok(pages)
}

fn into_batch(
    key: String,
    outcome: Result<Result<Vec<crate::ParticipantRecord>, crate::StructuralError>, TransportError>,
) -> Result<PageBatch, PageFailure> {
    match outcome {
        Ok(Ok(records)) => Ok(PageBatch::new(key, records)),
        Ok(Err(e)) => Err(PageFailure {
            key,
            error: e.into(),
        }),
        Err(e) => Err(PageFailure {
            key,
            error: e.into(),
        }),
    }
}
