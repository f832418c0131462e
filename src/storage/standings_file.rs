//! Standings file format
//!
//! ```text
//! <count> <title>
//! <handle> <rank> <tie_upper>
//! ...
//! ```
//!
//! The title runs to the end of the first line and may contain spaces. Entry
//! lines appear in standings order.

use crate::standings::{Standings, StandingsEntry};
use crate::storage::{write_atomically, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Path of a contest's standings file inside `dir`
pub fn standings_path(dir: &Path, contest_id: u64) -> PathBuf {
    dir.join(format!("{}.txt", contest_id))
}

/// Renders standings in the persisted format
pub fn format_standings(standings: &Standings) -> String {
    let mut out = format!("{} {}\n", standings.len(), standings.title);
    for entry in &standings.entries {
        out.push_str(&format!(
            "{} {} {}\n",
            entry.handle, entry.rank, entry.tie_upper
        ));
    }
    out
}

/// Writes a contest's standings to `<dir>/<contest_id>.txt`
///
/// # Returns
///
/// * `Ok(PathBuf)` - The file that was written
/// * `Err(StorageError)` - The directory or file could not be written
pub fn write_standings(dir: &Path, standings: &Standings) -> StorageResult<PathBuf> {
    let path = standings_path(dir, standings.contest_id);
    write_atomically(&path, &format_standings(standings))?;
    Ok(path)
}

/// Parses the persisted format back into standings
///
/// `path` is only used in error messages. The declared count must match the
/// number of entry lines.
pub fn parse_standings(path: &Path, contest_id: u64, content: &str) -> StorageResult<Standings> {
    let mut lines = content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| StorageError::malformed(path, 1, "empty file"))?;
    let (count, title) = header
        .split_once(' ')
        .ok_or_else(|| StorageError::malformed(path, 1, "header must be '<count> <title>'"))?;
    let declared: usize = count
        .parse()
        .map_err(|_| StorageError::malformed(path, 1, format!("invalid count '{}'", count)))?;

    let entries = lines
        .map(|(index, line)| parse_entry(path, index + 1, line))
        .collect::<StorageResult<Vec<_>>>()?;

    if entries.len() != declared {
        return Err(StorageError::CountMismatch {
            path: path.to_path_buf(),
            declared,
            actual: entries.len(),
        });
    }

    Ok(Standings {
        contest_id,
        title: title.to_string(),
        entries,
    })
}

fn parse_entry(path: &Path, line_no: usize, line: &str) -> StorageResult<StandingsEntry> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [handle, rank, tie_upper] = fields[..] else {
        return Err(StorageError::malformed(
            path,
            line_no,
            "entry must be '<handle> <rank> <tie_upper>'",
        ));
    };

    let number = |text: &str| -> StorageResult<usize> {
        text.parse()
            .map_err(|_| StorageError::malformed(path, line_no, format!("invalid number '{}'", text)))
    };

    Ok(StandingsEntry {
        handle: handle.to_string(),
        rank: number(rank)?,
        tie_upper: number(tie_upper)?,
    })
}

/// Reads `<dir>/<contest_id>.txt`
pub fn read_standings(dir: &Path, contest_id: u64) -> StorageResult<Standings> {
    let path = standings_path(dir, contest_id);
    let content = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
    parse_standings(&path, contest_id, &content)
}
