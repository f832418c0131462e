//! Catalog file format
//!
//! ```text
//! <count>
//! <contest_id>
//! ...
//! ```

use crate::catalog::Catalog;
use crate::storage::{write_atomically, StorageError, StorageResult};
use std::fs;
use std::path::Path;

/// Renders a catalog in the persisted format
pub fn format_catalog(catalog: &Catalog) -> String {
    let mut out = format!("{}\n", catalog.len());
    for id in catalog.ids() {
        out.push_str(&format!("{}\n", id));
    }
    out
}

/// Writes the catalog to `path`, replacing any previous catalog
pub fn write_catalog(path: &Path, catalog: &Catalog) -> StorageResult<()> {
    write_atomically(path, &format_catalog(catalog))
}

/// Parses the persisted format
///
/// The first line is the declared count and must equal the number of ids that
/// follow. `path` is only used in error messages.
pub fn parse_catalog(path: &Path, content: &str) -> StorageResult<Catalog> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, count) = lines
        .next()
        .ok_or_else(|| StorageError::malformed(path, 1, "empty file"))?;
    let declared: usize = count
        .parse()
        .map_err(|_| StorageError::malformed(path, 1, format!("invalid count '{}'", count)))?;

    let ids = lines
        .map(|(line_no, line)| {
            line.parse::<u64>().map_err(|_| {
                StorageError::malformed(path, line_no, format!("invalid contest id '{}'", line))
            })
        })
        .collect::<StorageResult<Vec<_>>>()?;

    if ids.len() != declared {
        return Err(StorageError::CountMismatch {
            path: path.to_path_buf(),
            declared,
            actual: ids.len(),
        });
    }

    Ok(Catalog::from_ids(ids))
}

/// Reads the catalog at `path`
pub fn read_catalog(path: &Path) -> StorageResult<Catalog> {
    let content = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    parse_catalog(path, &content)
}
