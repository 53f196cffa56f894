//! Sparse, key-ordered store of computed placements.

use crate::{Placement, Rect};

/// Placements keyed by adapter position, kept sorted by position.
///
/// Lookups and inserts binary-search the backing vector. Suffix removal is a
/// single truncate at the cut point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementCache {
    entries: Vec<Placement>,
}

impl PlacementCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn search(&self, position: usize) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&position, |p| p.position)
    }

    /// Insert or overwrite the placement for `placement.position`.
    pub fn put(&mut self, placement: Placement) {
        match self.search(placement.position) {
            Ok(idx) => self.entries[idx] = placement,
            Err(idx) => self.entries.insert(idx, placement),
        }
    }

    /// The rectangle stored for `position`, if any.
    pub fn get(&self, position: usize) -> Option<Rect> {
        self.placement(position).map(|p| p.rect)
    }

    /// The full placement stored for `position`, if any.
    pub fn placement(&self, position: usize) -> Option<&Placement> {
        self.search(position).ok().map(|idx| &self.entries[idx])
    }

    /// Remove every entry with a position `>= position`.
    ///
    /// Returns how many entries were removed.
    pub fn remove_from(&mut self, position: usize) -> usize {
        let cut = match self.search(position) {
            Ok(idx) | Err(idx) => idx,
        };
        let removed = self.entries.len() - cut;
        self.entries.truncate(cut);
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in position order.
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.entries.iter()
    }

    /// Entries with a position `< position`, in position order.
    pub fn before(&self, position: usize) -> &[Placement] {
        let cut = match self.search(position) {
            Ok(idx) | Err(idx) => idx,
        };
        &self.entries[..cut]
    }
}
