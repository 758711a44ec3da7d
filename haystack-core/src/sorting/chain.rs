//! Lexicographic comparator chains
//!
//! The chain compares by its first member, falls through to the next one on
//! a tie, and so on. Direction is never folded into the members: a sorted
//! sequence is reversed as a whole afterwards, so multi-key ties reverse
//! together instead of per key.

use super::comparator::{ComparatorKind, NamedComparator};
use super::utils::is_sorted_by;
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Sort order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Ascending)
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Outcome of [`ComparatorChain::add`] and [`ComparatorChain::add_primary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEdit {
    /// The kind was new and was inserted at `position`
    Inserted { position: usize },
    /// A comparator of the same kind was swapped out at its existing slot
    Replaced { position: usize },
}

/// Ordered sequence of named comparators with at most one per kind
pub struct ComparatorChain<E> {
    comparators: Vec<NamedComparator<E>>,
    direction: SortDirection,
}

impl<E> ComparatorChain<E> {
    /// Create an empty chain; every pair compares equal
    pub fn new() -> Self {
        Self {
            comparators: Vec::new(),
            direction: SortDirection::Ascending,
        }
    }

    /// Create a chain holding a single comparator
    pub fn from_one(comparator: NamedComparator<E>) -> Self {
        let mut chain = Self::new();
        chain.add(comparator);
        chain
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Append a comparator, or replace the one of the same kind in place.
    ///
    /// Replacing keeps the existing slot so the priority the user established
    /// survives a re-parameterization (a new search term, a new reference).
    pub fn add(&mut self, comparator: NamedComparator<E>) -> ChainEdit {
        match self.position(comparator.kind()) {
            Some(position) => {
                self.comparators[position] = comparator;
                ChainEdit::Replaced { position }
            }
            None => {
                self.comparators.push(comparator);
                ChainEdit::Inserted {
                    position: self.comparators.len() - 1,
                }
            }
        }
    }

    /// Like [`add`](Self::add), but a new kind goes to the front of the chain
    /// and becomes the primary key.
    pub fn add_primary(&mut self, comparator: NamedComparator<E>) -> ChainEdit {
        match self.position(comparator.kind()) {
            Some(position) => {
                self.comparators[position] = comparator;
                ChainEdit::Replaced { position }
            }
            None => {
                self.comparators.insert(0, comparator);
                ChainEdit::Inserted { position: 0 }
            }
        }
    }

    /// Remove the comparator of `kind`; returns false if none was present
    pub fn remove(&mut self, kind: ComparatorKind) -> bool {
        match self.position(kind) {
            Some(position) => {
                self.comparators.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn position(&self, kind: ComparatorKind) -> Option<usize> {
        self.comparators.iter().position(|c| c.kind() == kind)
    }

    pub fn contains(&self, kind: ComparatorKind) -> bool {
        self.position(kind).is_some()
    }

    pub fn get(&self, kind: ComparatorKind) -> Option<&NamedComparator<E>> {
        self.comparators.iter().find(|c| c.kind() == kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ComparatorKind> + '_ {
        self.comparators.iter().map(NamedComparator::kind)
    }

    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    /// First non-equal result across the chain, ignoring direction
    pub fn combined_compare(&self, a: &E, b: &E) -> Ordering {
        self.comparators
            .iter()
            .map(|c| c.compare(a, b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Returns true when the direction actually changed
    pub fn set_direction(&mut self, direction: SortDirection) -> bool {
        let changed = self.direction != direction;
        self.direction = direction;
        changed
    }

    /// Stable sort by the combined order, then reverse when descending.
    pub fn sort<T: Borrow<E>>(&self, items: &mut [T]) {
        let compare =
            |a: &T, b: &T| self.combined_compare(a.borrow(), b.borrow());

        if !is_sorted_by(items, compare) {
            items.sort_by(compare);
        }

        if !self.direction.is_ascending() {
            items.reverse();
        }
    }

    /// Assert the one-comparator-per-kind invariant
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::with_capacity(self.comparators.len());
        for kind in self.kinds() {
            if !seen.insert(kind) {
                return Err(ConfigurationError::DuplicateComparatorKind(kind));
            }
        }
        Ok(())
    }
}

impl<E> Default for ComparatorChain<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ComparatorChain<E> {
    fn clone(&self) -> Self {
        Self {
            comparators: self.comparators.clone(),
            direction: self.direction,
        }
    }
}

impl<E> fmt::Debug for ComparatorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorChain")
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .field("direction", &self.direction)
            .finish()
    }
}
