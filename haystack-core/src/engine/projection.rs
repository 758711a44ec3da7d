use crate::grouping::GroupIndex;
use chrono::{DateTime, Utc};
use haystack_model::{Entity, EntityId, EntityKind};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Immutable result of one recompute pass.
///
/// The engine publishes a new `Arc<Projection>` per pass and never mutates a
/// published one, so a reader holding a projection never sees a half-built
/// state.
pub struct Projection<E> {
    pub(crate) generation: u64,
    pub(crate) computed_at: DateTime<Utc>,
    pub(crate) filtered: Vec<Arc<E>>,
    pub(crate) groups: Option<GroupIndex<E>>,
    pub(crate) counts_by_type: BTreeMap<EntityKind, usize>,
    pub(crate) bodies: Vec<Arc<E>>,
    pub(crate) dropped_stale: usize,
}

impl<E: Entity> Projection<E> {
    /// Monotonic pass counter, starting at 1
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    /// Filtered entities in display order
    pub fn filtered(&self) -> &[Arc<E>] {
        &self.filtered
    }

    /// Ids of [`Self::filtered`], in the same order
    pub fn filtered_ids(&self) -> Vec<EntityId> {
        self.filtered.iter().map(|entity| entity.id()).collect()
    }

    /// Per-group buckets; `None` while grouping is off
    pub fn groups(&self) -> Option<&GroupIndex<E>> {
        self.groups.as_ref()
    }

    /// Entities per type across the unfiltered master collection
    pub fn counts_by_type(&self) -> &BTreeMap<EntityKind, usize> {
        &self.counts_by_type
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.counts_by_type.get(&kind).copied().unwrap_or(0)
    }

    /// Celestial bodies matching the search term
    pub fn bodies(&self) -> &[Arc<E>] {
        &self.bodies
    }

    /// Unavailable entities skipped during this pass
    pub fn dropped_stale(&self) -> usize {
        self.dropped_stale
    }
}

impl<E> fmt::Debug for Projection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("generation", &self.generation)
            .field("computed_at", &self.computed_at)
            .field("filtered", &self.filtered.len())
            .field("groups", &self.groups)
            .field("counts_by_type", &self.counts_by_type)
            .field("bodies", &self.bodies.len())
            .field("dropped_stale", &self.dropped_stale)
            .finish()
    }
}
