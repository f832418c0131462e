//! Crawler coordinator - run orchestration
//!
//! The coordinator owns the configuration, the URL templates and the fetcher,
//! and drives the three runs the binary exposes:
//! - catalog: sweep the index and persist the contest list
//! - standings: reconstruct and persist standings for a list of contests
//! - crawl: both, one after the other
//!
//! Contests are processed strictly one after another. A contest that fails
//! is reported and skipped; it never stops the run and never leaves a file.

use crate::catalog::{sweep_catalog, SweepOutcome};
use crate::config::{Config, PaginationMode};
use crate::crawler::discovery::discover_pages;
use crate::crawler::fetcher::{build_http_client, HttpTransport, ResilientFetcher, Transport};
use crate::crawler::retry::{Clock, Retry, TokioClock};
use crate::source::SourceUrls;
use crate::standings::{order_pages, Aggregator, PageBatch, PageOutcome, Standings};
use crate::storage::{read_catalog, write_catalog, write_standings};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Outcome of a multi-contest run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Contests whose standings file was written, in processing order
    pub saved: Vec<u64>,

    /// Contests that were abandoned, with the reason
    pub failed: Vec<(u64, String)>,
}

impl RunReport {
    fn start() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            saved: Vec::new(),
            failed: Vec::new(),
        }
    }

    fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Returns true if no contest failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Logs a one-line summary plus one line per failed contest
    pub fn log_summary(&self) {
        tracing::info!(
            "Run finished in {}s: {} saved, {} failed",
            self.duration().num_seconds(),
            self.saved.len(),
            self.failed.len()
        );
        for (contest_id, reason) in &self.failed {
            tracing::error!("Contest {} failed: {}", contest_id, reason);
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<T = HttpTransport, C = TokioClock> {
    config: Config,
    urls: SourceUrls,
    fetcher: ResilientFetcher<T, C>,
}

impl Coordinator {
    /// Creates a coordinator that talks HTTP to the configured site
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(StandingsError)` - The HTTP client or base URL could not be built
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let retry = Retry::fixed(config.crawler.retry_delay());
        let fetcher = ResilientFetcher::new(HttpTransport::new(client), retry);
        Self::with_fetcher(config, fetcher)
    }
}

impl<T: Transport, C: Clock> Coordinator<T, C> {
    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: ResilientFetcher<T, C>) -> crate::Result<Self> {
        let urls = SourceUrls::new(&config.source)?;
        Ok(Self {
            config,
            urls,
            fetcher,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn concurrency(&self) -> usize {
        self.config.crawler.max_concurrent_fetches as usize
    }

    /// Reconstructs the complete standings of one contest
    ///
    /// Pages are collected as configured by `crawler.pagination`.
    ///
    /// # Returns
    ///
    /// * `Ok(Standings)` - The contest's tie-aware standings
    /// * `Err(StandingsError)` - A page was malformed, pagination could not be
    ///   ordered, or a non-transient transport error occurred
    pub async fn collect_standings(&self, contest_id: u64) -> crate::Result<Standings> {
        let mut aggregator = Aggregator::new(contest_id, self.config.crawler.page_size);

        match self.config.crawler.pagination {
            PaginationMode::Concurrent => self.collect_concurrent(&mut aggregator).await?,
            PaginationMode::Sequential => self.collect_sequential(&mut aggregator).await?,
        }

        tracing::debug!(
            "Contest {}: {} entries from {} pages ({})",
            contest_id,
            aggregator.len(),
            aggregator.pages_ingested(),
            aggregator.state()
        );
        Ok(aggregator.finalize()?)
    }

    /// Fetches page 1, discovers every other page from its links, fetches those
    /// concurrently and ingests them in page order
    async fn collect_concurrent(&self, aggregator: &mut Aggregator) -> crate::Result<()> {
        let contest_id = aggregator.contest_id();
        let root_url = self.urls.ratings_page(contest_id, 1)?;
        let root = self.fetcher.fetch(root_url.as_str()).await?;
        let title = root.title()?;
        let prefix = SourceUrls::ratings_page_prefix(contest_id);

        let mut batches = Vec::new();
        for page in discover_pages(
            &self.fetcher,
            &self.urls,
            &root,
            &prefix,
            "",
            self.concurrency(),
        )
        .await?
        {
            match page {
                Ok(batch) => batches.push(batch),
                Err(failure) => {
                    tracing::debug!(
                        "Contest {}: page {} failed: {}",
                        contest_id,
                        failure.key,
                        failure.error
                    );
                    return Err(failure.error);
                }
            }
        }

        // Single-page listings render no pagination links, and some listings
        // link every page but the current one
        if !batches.iter().any(|batch| batch.key == "1") {
            batches.push(PageBatch::new("1", root.participants()?));
        }

        for batch in order_pages(batches)? {
            aggregator.ingest_page(Some(title.as_str()), batch.records)?;
            if aggregator.state().is_terminal() {
                break;
            }
        }

        Ok(())
    }

    /// Walks pages 1, 2, 3, ... until a page repeats earlier content
    async fn collect_sequential(&self, aggregator: &mut Aggregator) -> crate::Result<()> {
        let contest_id = aggregator.contest_id();

        for page in 1u32.. {
            let url = self.urls.ratings_page(contest_id, page)?;
            let doc = self.fetcher.fetch(url.as_str()).await?;

            let title = if page == 1 { Some(doc.title()?) } else { None };
            let records = doc.participants()?;

            match aggregator.ingest_page(title.as_deref(), records)? {
                PageOutcome::Terminated => break,
                PageOutcome::Appended(n) => {
                    tracing::debug!("Contest {}: page {} added {} rows", contest_id, page, n)
                }
            }
        }

        Ok(())
    }

    /// Collects and persists standings for each contest in order
    ///
    /// Failures are logged and recorded in the report; the remaining contests
    /// are still processed.
    pub async fn save_standings(&self, contest_ids: &[u64]) -> RunReport {
        let mut report = RunReport::start();
        let dir = Path::new(&self.config.output.standings_dir);
        let total = contest_ids.len();

        for (index, &contest_id) in contest_ids.iter().enumerate() {
            tracing::info!("Contest {} ({}/{})", contest_id, index + 1, total);

            let saved = match self.collect_standings(contest_id).await {
                Ok(standings) => write_standings(dir, &standings)
                    .map(|path| (path, standings.len()))
                    .map_err(crate::StandingsError::from),
                Err(e) => Err(e),
            };

            match saved {
                Ok((path, entries)) => {
                    tracing::info!(
                        "Saved {} entries for contest {} to {}",
                        entries,
                        contest_id,
                        path.display()
                    );
                    report.saved.push(contest_id);
                }
                Err(e) => {
                    tracing::error!("Abandoning contest {}: {}", contest_id, e);
                    report.failed.push((contest_id, e.to_string()));
                }
            }
        }

        report.finish()
    }

    /// Sweeps `pages` index pages into a catalog without persisting it
    pub async fn sweep_catalog(&self, pages: u32) -> crate::Result<SweepOutcome> {
        sweep_catalog(&self.fetcher, &self.urls, pages, self.concurrency()).await
    }

    /// Sweeps the index and writes the catalog file
    pub async fn run_catalog(&self, pages: u32) -> crate::Result<SweepOutcome> {
        let outcome = self.sweep_catalog(pages).await?;
        let path = Path::new(&self.config.output.catalog_path);
        write_catalog(path, &outcome.catalog)?;
        tracing::info!(
            "Wrote {} contests to {}",
            outcome.catalog.len(),
            path.display()
        );
        Ok(outcome)
    }

    /// Contest ids from the catalog file, optionally only the last `last` of them
    pub fn catalog_ids(&self, last: Option<usize>) -> crate::Result<Vec<u64>> {
        let catalog = read_catalog(Path::new(&self.config.output.catalog_path))?;
        Ok(match last {
            Some(k) => catalog.last(k).ids(),
            None => catalog.ids(),
        })
    }

    /// Sweeps the index, writes the catalog, then saves standings for every contest in it
    pub async fn run_crawl(&self, pages: u32) -> crate::Result<RunReport> {
        let outcome = self.run_catalog(pages).await?;
        Ok(self.save_standings(&outcome.catalog.ids()).await)
    }
}
