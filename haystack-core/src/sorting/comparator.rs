//! Named comparator components
//!
//! A comparator is an ordering function tagged with the role it plays in a
//! chain. Add, replace and remove all key off the tag, never off the closure.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Total order over two entities
pub type CompareFn<E> = Arc<dyn Fn(&E, &E) -> Ordering + Send + Sync>;

/// Role of a comparator inside a [`ComparatorChain`](super::ComparatorChain).
///
/// A chain holds at most one comparator per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorKind {
    /// Case-insensitive display name
    Name,
    /// Presentation rank of the entity type
    TypeOrder,
    /// Distance to a reference entity
    Nearby,
    /// Closeness of the display name to the active search term
    SearchRelevance,
    /// Host-defined ordering
    Custom(&'static str),
}

impl fmt::Display for ComparatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparatorKind::Name => f.write_str("name"),
            ComparatorKind::TypeOrder => f.write_str("type-order"),
            ComparatorKind::Nearby => f.write_str("nearby"),
            ComparatorKind::SearchRelevance => f.write_str("search-relevance"),
            ComparatorKind::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

/// A `(kind, ordering function)` pair
pub struct NamedComparator<E> {
    kind: ComparatorKind,
    compare: CompareFn<E>,
}

impl<E> NamedComparator<E> {
    pub fn new(
        kind: ComparatorKind,
        compare: impl Fn(&E, &E) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            compare: Arc::new(compare),
        }
    }

    pub fn kind(&self) -> ComparatorKind {
        self.kind
    }

    #[inline]
    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        (self.compare)(a, b)
    }
}

impl<E> Clone for NamedComparator<E> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<E> fmt::Debug for NamedComparator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedComparator")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
