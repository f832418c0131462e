//! Catalog sweep over the contest index
//!
//! Index pages list contests newest first. Every candidate's ratings root is
//! fetched; a candidate enters the catalog only if that page shows at least one
//! participant row. The finished catalog is reversed to oldest first.

use crate::catalog::Catalog;
use crate::crawler::{
    extract_links, fetch_pages, page_requests, Clock, Document, ResilientFetcher, Transport,
};
use crate::source::{SourceUrls, CONTEST_LINK_PREFIX};
use std::collections::HashMap;

/// Result of a catalog sweep
#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    /// Contests with ranked participants, oldest first
    pub catalog: Catalog,

    /// Candidates whose ratings page could not be fetched, with the reason
    pub skipped: Vec<(u64, String)>,
}

/// Sweeps index pages `1..=pages` and builds the catalog
///
/// # Arguments
///
/// * `fetcher` - Fetcher used for index and ratings pages
/// * `urls` - URL templates of the site
/// * `pages` - Number of index pages to visit
/// * `concurrency` - Maximum ratings pages in flight per index page
///
/// # Returns
///
/// * `Ok(SweepOutcome)` - The catalog and any candidates that were skipped
/// * `Err(StandingsError)` - An index page could not be fetched
pub async fn sweep_catalog<T: Transport, C: Clock>(
    fetcher: &ResilientFetcher<T, C>,
    urls: &SourceUrls,
    pages: u32,
    concurrency: usize,
) -> crate::Result<SweepOutcome> {
    let mut outcome = SweepOutcome::default();

    for page in 1..=pages {
        let index_url = urls.index_page(page)?;
        let index = fetcher.fetch(index_url.as_str()).await?;

        let candidates: Vec<u64> = extract_links(&index, CONTEST_LINK_PREFIX)
            .iter()
            .filter_map(|suffix| suffix.parse().ok())
            .filter(|id| !outcome.catalog.contains(*id))
            .collect();

        tracing::info!(
            "Index page {}/{}: {} candidate contests",
            page,
            pages,
            candidates.len()
        );

        let requests = page_requests(
            urls,
            candidates.iter().map(u64::to_string).collect(),
            CONTEST_LINK_PREFIX,
            "ratings",
        )?;
        let mut counts: HashMap<String, _> =
            fetch_pages(fetcher, requests, concurrency, Document::participant_row_count)
                .await
                .into_iter()
                .collect();

        for id in candidates {
            match counts.remove(&id.to_string()) {
                Some(Ok(rows)) if rows > 0 => {
                    outcome.catalog.push(id);
                }
                Some(Ok(_)) => tracing::debug!("Contest {} has no ranked participants", id),
                Some(Err(e)) => {
                    tracing::warn!("Skipping contest {}: {}", id, e);
                    outcome.skipped.push((id, e.to_string()));
                }
                None => {}
            }
        }
    }

    outcome.catalog.reverse();
    tracing::info!(
        "Catalog sweep found {} contests ({} skipped)",
        outcome.catalog.len(),
        outcome.skipped.len()
    );

    Ok(outcome)
}
