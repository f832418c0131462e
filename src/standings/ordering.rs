//! Ordering of discovered standings pages
//!
//! Concurrent discovery hands pages back in completion order. The aggregator
//! needs them in page order with no holes, so this step sorts them by page
//! number and refuses anything it cannot order unambiguously.

use crate::standings::PageBatch;
use crate::PaginationError;

/// Parses a discovered page key into its page number
///
/// Keys are the path suffixes found in pagination links. The link for the first
/// page sometimes carries a query string (`1?order=...`); any query is ignored.
pub fn parse_page_key(key: &str) -> Result<u32, PaginationError> {
    let number = key.split('?').next().unwrap_or_default();
    match number.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PaginationError::InvalidPageKey(key.to_string())),
    }
}

/// Sorts page batches by page number
///
/// # Returns
///
/// * `Ok(Vec<PageBatch>)` - Pages 1..=n in order
/// * `Err(PaginationError)` - A key is not a page number, a page appears twice,
///   or a page between 1 and the highest page is missing
pub fn order_pages(batches: Vec<PageBatch>) -> Result<Vec<PageBatch>, PaginationError> {
    let mut numbered = batches
        .into_iter()
        .map(|batch| -> Result<(u32, PageBatch), PaginationError> {
            Ok((parse_page_key(&batch.key)?, batch))
        })
        .collect::<Result<Vec<_>, _>>()?;

    numbered.sort_by_key(|(number, _)| *number);

    let mut expected = 1;
    for (number, _) in &numbered {
        if *number < expected {
            return Err(PaginationError::DuplicatePage(*number));
        }
        if *number > expected {
            return Err(PaginationError::MissingPage(expected));
        }
        expected += 1;
    }

    Ok(numbered.into_iter().map(|(_, batch)| batch).collect())
}
