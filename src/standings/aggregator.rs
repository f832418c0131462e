//! Standings aggregation state machine
//!
//! One `Aggregator` owns everything known about a single contest while its pages
//! are being ingested: the running sequence of participants, the captured title,
//! and the `rank -> tie_upper` map. Pages must be fed in increasing page order
//! (see `order_pages`).

use crate::standings::{ParticipantRecord, Standings, StandingsEntry};
use crate::StructuralError;
use std::collections::HashMap;
use std::fmt;

/// Lifecycle of an aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregatorState {
    /// No page ingested yet; the next page must carry the contest title
    AwaitingFirstPage,

    /// At least one page ingested; more may follow
    Accumulating,

    /// A page repeated content already seen; the listing is exhausted
    Terminated,
}

impl AggregatorState {
    /// Returns true if no further pages will be appended
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for AggregatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AwaitingFirstPage => "awaiting_first_page",
            Self::Accumulating => "accumulating",
            Self::Terminated => "terminated",
        };
        write!(f, "{}", s)
    }
}

/// What happened to a page handed to `ingest_page`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page's records were appended; carries how many
    Appended(usize),

    /// The page was redundant (or empty) and the aggregator is now terminated.
    /// Nothing was appended.
    Terminated,
}

/// Merges one contest's standings pages into tie-aware standings
#[derive(Debug)]
pub struct Aggregator {
    contest_id: u64,
    page_size: usize,
    state: AggregatorState,
    title: Option<String>,
    pages_ingested: u32,
    records: Vec<ParticipantRecord>,
    /// Highest sequential position reached by each rank's tie group
    tie_upper: HashMap<usize, usize>,
}

impl Aggregator {
    /// Creates an aggregator for one contest
    ///
    /// `page_size` is the number of rows the source renders per full page; it
    /// locates the entries the termination check compares against.
    pub fn new(contest_id: u64, page_size: usize) -> Self {
        Self {
            contest_id,
            page_size,
            state: AggregatorState::AwaitingFirstPage,
            title: None,
            pages_ingested: 0,
            records: Vec::new(),
            tie_upper: HashMap::new(),
        }
    }

    pub fn contest_id(&self) -> u64 {
        self.contest_id
    }

    pub fn state(&self) -> AggregatorState {
        self.state
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Number of participants accumulated so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of pages that were actually appended
    pub fn pages_ingested(&self) -> u32 {
        self.pages_ingested
    }

    /// Ingests the next page of the contest
    ///
    /// # Page 1
    ///
    /// `title` is required and captured; it is ignored on later pages.
    ///
    /// # Later pages
    ///
    /// Before anything is appended the page's first record is compared with the
    /// entries at sequential positions `page_size * (p - 1)` and
    /// `page_size * (p - 2) + 1`. The source serves its last page again for any
    /// page number beyond the end, so a match at either position means the listing
    /// is exhausted. An empty page ends the listing as well.
    ///
    /// # Tie validation
    ///
    /// Each record at sequential position `r` must either continue the previous
    /// record's tie group (same rank, `rank < r`) or start a fresh group
    /// (`rank == r`). A violation rejects the whole page and is fatal for the
    /// contest.
    ///
    /// # Returns
    ///
    /// * `Ok(PageOutcome::Appended(n))` - `n` records appended
    /// * `Ok(PageOutcome::Terminated)` - listing exhausted, nothing appended
    /// * `Err(StructuralError)` - missing title or broken tie structure
    pub fn ingest_page(
        &mut self,
        title: Option<&str>,
        records: Vec<ParticipantRecord>,
    ) -> Result<PageOutcome, StructuralError> {
        match self.state {
            AggregatorState::Terminated => return Ok(PageOutcome::Terminated),
            AggregatorState::AwaitingFirstPage => {
                let title = title
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or(StructuralError::TitleRequired)?;
                self.validate(&records)?;
                self.title = Some(title.to_string());
                self.state = AggregatorState::Accumulating;
            }
            AggregatorState::Accumulating => {
                let page = self.pages_ingested + 1;
                if self.is_redundant(page, &records) {
                    tracing::debug!(
                        "Contest {}: page {} repeats earlier content, listing complete at {} entries",
                        self.contest_id,
                        page,
                        self.records.len()
                    );
                    self.state = AggregatorState::Terminated;
                    return Ok(PageOutcome::Terminated);
                }
                self.validate(&records)?;
            }
        }

        let appended = records.len();
        for record in records {
            let position = self.records.len() + 1;
            self.tie_upper.insert(record.rank, position);
            self.records.push(record);
        }
        self.pages_ingested += 1;

        Ok(PageOutcome::Appended(appended))
    }

    /// Checks whether page `page` (1-based, > 1) adds nothing new
    fn is_redundant(&self, page: u32, records: &[ParticipantRecord]) -> bool {
        let Some(first) = records.first() else {
            return true;
        };

        // Saturated positions fall past the end and match nothing
        let page = page as usize;
        let last_of_previous = self.page_size.saturating_mul(page - 1);
        let first_of_previous = self.page_size.saturating_mul(page - 2).saturating_add(1);

        [last_of_previous, first_of_previous]
            .into_iter()
            .filter_map(|position| self.records.get(position.checked_sub(1)?))
            .any(|seen| seen == first)
    }

    /// Checks the tie structure of a page as if it were appended now
    fn validate(&self, records: &[ParticipantRecord]) -> Result<(), StructuralError> {
        let mut previous = self.records.last().map(|r| r.rank);

        for (offset, record) in records.iter().enumerate() {
            let position = self.records.len() + offset + 1;
            let consistent = match previous {
                Some(prev) if prev == record.rank => record.rank < position,
                _ => record.rank == position,
            };
            if !consistent {
                return Err(StructuralError::TieViolation {
                    position,
                    rank: record.rank,
                    previous,
                });
            }
            previous = Some(record.rank);
        }

        Ok(())
    }

    /// Produces the final standings
    ///
    /// Every entry's `tie_upper` is the last position reached by its rank's
    /// tie group.
    ///
    /// # Returns
    ///
    /// * `Ok(Standings)` - The contest's standings
    /// * `Err(StructuralError::NoPages)` - No page was ever ingested
    pub fn finalize(self) -> Result<Standings, StructuralError> {
        let title = self.title.ok_or(StructuralError::NoPages)?;
        let tie_upper = self.tie_upper;

        let entries = self
            .records
            .into_iter()
            .map(|record| {
                let upper = tie_upper.get(&record.rank).copied().unwrap_or(record.rank);
                StandingsEntry {
                    handle: record.handle,
                    rank: record.rank,
                    tie_upper: upper,
                }
            })
            .collect();

        Ok(Standings {
            contest_id: self.contest_id,
            title,
            entries,
        })
    }
}
