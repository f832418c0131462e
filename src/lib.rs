//! Standings-Crawler: tie-aware contest standings from paginated HTML listings
//!
//! This crate walks a contest site's index pages to find contests with at least
//! one rated participant, then reconstructs each contest's complete standings,
//! resolving the width of every tie group across page boundaries.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod source;
pub mod standings;
pub mod storage;

use thiserror::Error;

/// Main error type for Standings-Crawler operations
#[derive(Debug, Error)]
pub enum StandingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] crawler::TransportError),

    #[error("Malformed listing: {0}")]
    Structural(#[from] StructuralError),

    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// A page that was fetched successfully but does not have the expected shape
///
/// These are never retried: the content will not change on a second request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("no contest title element on {url}")]
    MissingTitle { url: String },

    #[error("participant row {row} on {url} is missing its {cell} cell")]
    MissingCell {
        url: String,
        row: usize,
        cell: &'static str,
    },

    #[error("participant row {row} on {url} has a non-numeric rank '{text}'")]
    InvalidRank { url: String, row: usize, text: String },

    #[error("first page carried no contest title")]
    TitleRequired,

    #[error(
        "rank {rank} at position {position} breaks the tie structure (previous rank {previous:?})"
    )]
    TieViolation {
        position: usize,
        rank: usize,
        previous: Option<usize>,
    },

    #[error("standings finalized before any page was ingested")]
    NoPages,
}

/// Errors raised while putting discovered pages into ingestion order
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page key '{0}' is not a positive page number")]
    InvalidPageKey(String),

    #[error("page {0} was delivered more than once")]
    DuplicatePage(u32),

    #[error("page {0} is missing from the discovered pages")]
    MissingPage(u32),
}

/// Result type alias for Standings-Crawler operations
pub type Result<T> = std::result::Result<T, StandingsError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::Catalog;
pub use config::Config;
pub use standings::{Aggregator, ParticipantRecord, Standings, StandingsEntry};
