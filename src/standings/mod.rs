//! Standings model and reconstruction
//!
//! A contest's standings arrive as numbered pages of participant rows. This module
//! puts those pages in order, stitches them into one sequence, and resolves the
//! extent of every tie group.
//!
//! # Components
//!
//! - `ordering`: sorts discovered pages by page number and rejects gaps or duplicates
//! - `Aggregator`: merges ordered pages, validates tie structure, detects the end
//!   of the listing

mod aggregator;
mod ordering;

pub use aggregator::{Aggregator, AggregatorState, PageOutcome};
pub use ordering::{order_pages, parse_page_key};

/// One participant row as the source reports it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantRecord {
    pub handle: String,

    /// 1-based rank reported by the source; tied participants share it
    pub rank: usize,
}

impl ParticipantRecord {
    pub fn new(handle: impl Into<String>, rank: usize) -> Self {
        Self {
            handle: handle.into(),
            rank,
        }
    }
}

/// A participant's final place, including the extent of their tie group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsEntry {
    pub handle: String,

    /// First sequential position of the tie group
    pub rank: usize,

    /// Last sequential position of the tie group
    pub tie_upper: usize,
}

/// The complete standings of one contest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standings {
    pub contest_id: u64,
    pub title: String,
    pub entries: Vec<StandingsEntry>,
}

impl Standings {
    /// Number of ranked participants
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The participant rows of one fetched page, keyed by the page it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBatch {
    /// Page suffix as discovered in the pagination links, e.g. "3"
    pub key: String,
    pub records: Vec<ParticipantRecord>,
}

impl PageBatch {
    pub fn new(key: impl Into<String>, records: Vec<ParticipantRecord>) -> Self {
        Self {
            key: key.into(),
            records,
        }
    }
}
