//! Composable ordering over entities
//!
//! This module provides:
//! - Named comparators keyed by an explicit [`ComparatorKind`] tag
//! - A [`ComparatorChain`] that combines them lexicographically
//! - Built-in comparators for names, type rank, proximity and search relevance

pub mod builtin;
pub mod chain;
pub mod comparator;
pub mod utils;

pub use chain::{ChainEdit, ComparatorChain, SortDirection};
pub use comparator::{CompareFn, ComparatorKind, NamedComparator};
