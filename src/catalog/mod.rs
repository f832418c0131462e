//! Contest catalog
//!
//! The catalog is the ordered list of contests that have at least one ranked
//! participant, oldest first. `sweep` builds it from the site's index pages;
//! `storage` persists it.

mod sweep;

pub use sweep::{sweep_catalog, SweepOutcome};

use std::collections::HashSet;

/// One contest known to have ranked participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogEntry {
    pub contest_id: u64,
}

/// Ordered, duplicate-free list of contests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    seen: HashSet<u64>,
}

impl Catalog {
    /// Builds a catalog from ids in order; repeated ids keep their first position
    pub fn from_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        let mut catalog = Self::default();
        for id in ids {
            catalog.push(id);
        }
        catalog
    }

    /// Appends `contest_id` unless it is already present
    ///
    /// Returns true if the id was added.
    pub fn push(&mut self, contest_id: u64) -> bool {
        if !self.seen.insert(contest_id) {
            return false;
        }
        self.entries.push(CatalogEntry { contest_id });
        true
    }

    pub fn contains(&self, contest_id: u64) -> bool {
        self.seen.contains(&contest_id)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.contest_id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` most recent contests, still oldest first
    pub fn last(&self, k: usize) -> Catalog {
        let start = self.entries.len().saturating_sub(k);
        Self::from_ids(self.entries[start..].iter().map(|e| e.contest_id))
    }

    /// Reverses the order in place
    pub fn reverse(&mut self) {
        self.entries.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_keep_first_position() {
        let mut catalog = Catalog::from_ids([5, 3, 5, 1]);
        assert_eq!(catalog.ids(), vec![5, 3, 1]);
        assert!(!catalog.push(3));
        assert!(catalog.push(9));
        assert!(catalog.contains(9));
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_last() {
        let catalog = Catalog::from_ids([1, 2, 3, 4]);
        assert_eq!(catalog.last(2).ids(), vec![3, 4]);
        assert_eq!(catalog.last(10).ids(), vec![1, 2, 3, 4]);
        assert!(catalog.last(0).is_empty());
    }

    #[test]
    fn test_reverse() {
        let mut catalog = Catalog::from_ids([30, 20, 10]);
        catalog.reverse();
        assert_eq!(catalog.ids(), vec![10, 20, 30]);
        assert_eq!(catalog.entries()[0], CatalogEntry { contest_id: 10 });
    }
}
