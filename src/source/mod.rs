//! URL templates for the contest site
//!
//! Pages are addressed relative to the configured base URL:
//!
//! - index pages: `/contests/page/{n}?locale={locale}`
//! - a contest's ratings pages: `/contest/{id}/ratings/page/{n}`
//!
//! Ratings roots (`/contest/{id}/ratings`) are joined through `absolute` from
//! the contest links found on an index page.

use crate::config::SourceConfig;
use url::Url;

/// Link prefix under which index pages list their contests
pub const CONTEST_LINK_PREFIX: &str = "/contest/";

/// Builds absolute URLs for one contest site
#[derive(Debug, Clone)]
pub struct SourceUrls {
    base: Url,
    locale: Option<String>,
}

impl SourceUrls {
    /// Creates URL templates from the source configuration
    pub fn new(config: &SourceConfig) -> Result<Self, url::ParseError> {
        let base = Url::parse(&config.base_url)?;
        let locale = config.locale.clone().filter(|l| !l.is_empty());
        Ok(Self { base, locale })
    }

    /// Joins a site-absolute path (as found in an anchor href) onto the base URL
    pub fn absolute(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base.join(path)
    }

    /// The n-th page of the contest index, newest contests first
    pub fn index_page(&self, page: u32) -> Result<Url, url::ParseError> {
        let mut url = self.absolute(&format!("/contests/page/{}", page))?;
        if let Some(locale) = &self.locale {
            url.query_pairs_mut().append_pair("locale", locale);
        }
        Ok(url)
    }

    /// Href prefix of the pagination links on a contest's ratings pages
    pub fn ratings_page_prefix(contest_id: u64) -> String {
        format!("/contest/{}/ratings/page/", contest_id)
    }

    /// A numbered standings page of a contest
    pub fn ratings_page(&self, contest_id: u64, page: u32) -> Result<Url, url::ParseError> {
        self.absolute(&format!(
            "{}{}",
            Self::ratings_page_prefix(contest_id),
            page
        ))
    }
}
