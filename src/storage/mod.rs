//! Storage module for persisting crawl results
//!
//! Two line-oriented text formats are written here:
//! - one standings file per contest, named `<contest_id>.txt`
//! - one catalog file listing the contests worth crawling, oldest first
//!
//! Both are rewritten whole on every save. Writes go to a sibling temporary file
//! that is renamed over the target, so a reader never sees a half-written file
//! and an aborted contest leaves nothing behind.

mod catalog_file;
mod error;
mod standings_file;

pub use catalog_file::{format_catalog, parse_catalog, read_catalog, write_catalog};
pub use error::{StorageError, StorageResult};
pub use standings_file::{
    format_standings, parse_standings, read_standings, standings_path, write_standings,
};

use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replaces `path` with `contents`
///
/// Missing parent directories are created. The contents are synced to a
/// temporary file in the same directory before it is renamed over `path`; if
/// anything fails the temporary file is removed.
pub fn write_atomically(path: &Path, contents: &str) -> StorageResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
    let written = temp
        .write_all(contents.as_bytes())
        .and_then(|()| temp.as_file().sync_all());
    if let Err(e) = written {
        return Err(StorageError::io(temp.path(), e));
    }

    temp.into_temp_path()
        .persist(path)
        .map_err(|e| StorageError::io(path, e.error))?;

    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
