use super::predicate::{FilterKind, NamedPredicate};
use crate::error::ConfigurationError;
use haystack_model::Entity;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Ordered set of predicates combined by logical AND
pub struct FilterPipeline<E> {
    predicates: Vec<NamedPredicate<E>>,
}

impl<E> FilterPipeline<E> {
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Insert a predicate, replacing the existing one of the same kind in
    /// place. Returns true when a predicate was replaced.
    pub fn set_predicate(&mut self, predicate: NamedPredicate<E>) -> bool {
        match self.predicates.iter().position(|p| p.kind() == predicate.kind()) {
            Some(position) => {
                self.predicates[position] = predicate;
                true
            }
            None => {
                self.predicates.push(predicate);
                false
            }
        }
    }

    /// Returns true when a predicate of `kind` was removed
    pub fn clear_predicate(&mut self, kind: FilterKind) -> bool {
        let before = self.predicates.len();
        self.predicates.retain(|p| p.kind() != kind);
        before != self.predicates.len()
    }

    pub fn contains(&self, kind: FilterKind) -> bool {
        self.predicates.iter().any(|p| p.kind() == kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = FilterKind> + '_ {
        self.predicates.iter().map(NamedPredicate::kind)
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// AND of all active predicates, stopping at the first rejection
    pub fn evaluate(&self, entity: &E) -> bool {
        self.predicates.iter().all(|p| p.test(entity))
    }

    /// Assert the one-predicate-per-kind invariant
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::with_capacity(self.predicates.len());
        for kind in self.kinds() {
            if !seen.insert(kind) {
                return Err(ConfigurationError::DuplicatePredicateKind(kind));
            }
        }
        Ok(())
    }
}

impl<E: Entity> FilterPipeline<E> {
    /// Keep entities that are still available and pass every predicate,
    /// preserving input order.
    ///
    /// Unavailable entities are dropped before any predicate sees them.
    pub fn apply<I>(&self, entities: I) -> Vec<Arc<E>>
    where
        I: IntoIterator<Item = Arc<E>>,
    {
        entities
            .into_iter()
            .filter(|entity| entity.is_available())
            .filter(|entity| self.evaluate(entity))
            .collect()
    }
}

impl<E> Default for FilterPipeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for FilterPipeline<E> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
        }
    }
}

impl<E> fmt::Debug for FilterPipeline<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("kinds", &self.kinds().collect::<Vec<_>>())
            .finish()
    }
}
