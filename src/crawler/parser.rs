//! HTML document queries
//!
//! `Document` is the only view the crawler has of a fetched page. It answers
//! three questions:
//!
//! - which links does the page contain (`a[href]`)
//! - which rows are ranked participants
//! - what is the contest title
//!
//! # Participant rows
//!
//! A ranked participant is a `<tr>` carrying an `id` attribute. Header, footer,
//! and spacer rows of the ratings table have no `id`. Within such a row the first
//! `<td>` holds the rank and the second `<td>` holds an `<a>` whose text is the
//! participant's handle.

use crate::standings::ParticipantRecord;
use crate::StructuralError;
use scraper::{ElementRef, Html, Selector};

/// A parsed HTML page together with the URL it was fetched from
pub struct Document {
    url: String,
    html: Html,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("url", &self.url).finish()
    }
}

impl Document {
    /// Parses a response body
    ///
    /// # Example
    ///
    /// ```
    /// use standings_crawler::crawler::Document;
    ///
    /// let doc = Document::parse(
    ///     "https://example.com/contest/1/ratings",
    ///     r#"<table><tr id="p1"><td>1</td><td><a href="/profile/tourist">tourist</a></td></tr></table>"#,
    /// );
    /// assert_eq!(doc.participant_row_count(), 1);
    /// ```
    pub fn parse(url: impl Into<String>, body: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(body),
        }
    }

    /// The URL this document was fetched from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw `href` values of all anchors, in document order
    pub fn anchor_hrefs(&self) -> Vec<&str> {
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .collect()
    }

    /// Rows that represent ranked participants
    fn participant_rows(&self) -> Vec<ElementRef<'_>> {
        let Ok(selector) = Selector::parse("tr[id]") else {
            return Vec::new();
        };

        self.html.select(&selector).collect()
    }

    /// Number of ranked participant rows on the page
    pub fn participant_row_count(&self) -> usize {
        self.participant_rows().len()
    }

    /// Extracts `(handle, rank)` from every participant row
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ParticipantRecord>)` - One record per row, in document order
    /// * `Err(StructuralError)` - A row lacks its rank or handle cell, or the
    ///   rank is not a number
    pub fn participants(&self) -> Result<Vec<ParticipantRecord>, StructuralError> {
        let (Ok(cell), Ok(link)) = (Selector::parse("td"), Selector::parse("a")) else {
            return Ok(Vec::new());
        };

        self.participant_rows()
            .into_iter()
            .enumerate()
            .map(|(row, element)| -> Result<ParticipantRecord, StructuralError> {
                let mut cells = element.select(&cell);
                let rank_cell = cells.next().ok_or_else(|| self.missing(row, "rank"))?;
                let handle_cell = cells.next().ok_or_else(|| self.missing(row, "handle"))?;

                let rank_text = text_of(rank_cell);
                let rank = rank_text
                    .parse::<usize>()
                    .map_err(|_| StructuralError::InvalidRank {
                        url: self.url.clone(),
                        row,
                        text: rank_text.clone(),
                    })?;

                let handle = handle_cell
                    .select(&link)
                    .next()
                    .map(text_of)
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| self.missing(row, "handle link"))?;

                Ok(ParticipantRecord { handle, rank })
            })
            .collect()
    }

    /// The contest title: text of the first link inside the first `.title` element
    pub fn title(&self) -> Result<String, StructuralError> {
        let missing = || StructuralError::MissingTitle {
            url: self.url.clone(),
        };
        let (Ok(title), Ok(link)) = (Selector::parse(".title"), Selector::parse("a")) else {
            return Err(missing());
        };

        self.html
            .select(&title)
            .next()
            .and_then(|element| element.select(&link).next())
            .map(text_of)
            .filter(|t| !t.is_empty())
            .ok_or_else(missing)
    }

    fn missing(&self, row: usize, cell: &'static str) -> StructuralError {
        StructuralError::MissingCell {
            url: self.url.clone(),
            row,
            cell,
        }
    }
}

/// Concatenated, trimmed text content of an element
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
