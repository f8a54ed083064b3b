//! Page-selection engine
//!
//! Turns a human-readable selection such as `"2,5-8,11"` into a validated set
//! of 1-based page numbers, decides which pages must be physically removed for
//! `remove` or `keep` semantics, and re-encodes that removal set as compact
//! range tokens for the PDF engine.
//!
//! Everything in this module is pure: no I/O, no shared state.

mod mode;
mod ranges;
mod removal;
mod selection;

pub use mode::Mode;
pub use ranges::{compact_ranges, join_ranges, RangeToken};
pub use removal::{resolve_removal, validate_removal, RemovalPlan};
pub use selection::parse_selection;

use std::collections::BTreeSet;

/// A set of unique 1-based page numbers, iterated in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSet(BTreeSet<u32>);

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every page of a `total_pages` document.
    pub fn all(total_pages: u32) -> Self {
        (1..=total_pages).collect()
    }

    pub fn insert(&mut self, page: u32) -> bool {
        self.0.insert(page)
    }

    pub fn contains(&self, page: u32) -> bool {
        self.0.contains(&page)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pages in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn first(&self) -> Option<u32> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<u32> {
        self.0.last().copied()
    }

    /// Sorted ascending copy of the pages
    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl FromIterator<u32> for PageSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<u32> for PageSet {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl From<PageSet> for Vec<u32> {
    fn from(set: PageSet) -> Self {
        set.0.into_iter().collect()
    }
}
