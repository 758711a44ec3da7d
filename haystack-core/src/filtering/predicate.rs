use std::fmt;
use std::sync::Arc;

/// Pure, side-effect-free test over a single entity
pub type PredicateFn<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Role of a predicate inside a [`FilterPipeline`](super::FilterPipeline)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKind {
    TypeVisibility,
    HiddenSet,
    NearbyOnly,
    SearchSubstring,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterKind::TypeVisibility => "type-visibility",
            FilterKind::HiddenSet => "hidden-set",
            FilterKind::NearbyOnly => "nearby-only",
            FilterKind::SearchSubstring => "search-substring",
        })
    }
}

/// A `(kind, predicate)` pair
pub struct NamedPredicate<E> {
    kind: FilterKind,
    predicate: PredicateFn<E>,
}

impl<E> NamedPredicate<E> {
    pub fn new(
        kind: FilterKind,
        predicate: impl Fn(&E) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            predicate: Arc::new(predicate),
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    #[inline]
    pub fn test(&self, entity: &E) -> bool {
        (self.predicate)(entity)
    }
}

impl<E> Clone for NamedPredicate<E> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<E> fmt::Debug for NamedPredicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedPredicate")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
