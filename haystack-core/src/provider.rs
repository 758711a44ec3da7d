//! Host-facing seams: where entities come from and how they are grouped.

use crate::error::ProviderError;
use haystack_model::{Entity, EntityId, GroupKey};
use std::fmt;
use std::sync::{Arc, RwLock};

/// Pull-based source of the master collection.
///
/// Implemented by the host; the engine calls it at the start of a recompute
/// pass when the master collection is known to be stale.
pub trait EntityProvider<E>: Send + Sync {
    /// Snapshot of every entity the list may show
    fn fetch_master_collection(&self) -> Result<Vec<Arc<E>>, ProviderError>;

    /// Entity that anchors nearby filtering and distance ordering
    fn current_reference_entity(&self) -> Option<Arc<E>>;

    /// Secondary list of celestial bodies, filtered by search only
    fn fetch_celestial_bodies(&self) -> Vec<Arc<E>> {
        Vec::new()
    }
}

/// Optional capability deriving the grouping key of an entity.
///
/// Grouping and nearby-only filtering both depend on it; an engine built
/// without one rejects those features at configuration time.
pub trait GroupKeyAccessor<E>: Send + Sync {
    fn group_key(&self, entity: &E) -> Option<GroupKey>;
}

impl<E, F> GroupKeyAccessor<E> for F
where
    F: Fn(&E) -> Option<GroupKey> + Send + Sync,
{
    fn group_key(&self, entity: &E) -> Option<GroupKey> {
        self(entity)
    }
}

/// Provider backed by an in-memory list the host mutates directly.
pub struct InMemoryProvider<E> {
    entities: RwLock<Vec<Arc<E>>>,
    bodies: RwLock<Vec<Arc<E>>>,
    reference: RwLock<Option<EntityId>>,
}

impl<E: Entity> InMemoryProvider<E> {
    pub fn new(entities: Vec<Arc<E>>) -> Self {
        Self {
            entities: RwLock::new(entities),
            bodies: RwLock::new(Vec::new()),
            reference: RwLock::new(None),
        }
    }

    pub fn with_bodies(self, bodies: Vec<Arc<E>>) -> Self {
        self.set_bodies(bodies);
        self
    }

    pub fn set_entities(&self, entities: Vec<Arc<E>>) {
        match self.entities.write() {
            Ok(mut guard) => *guard = entities,
            Err(poisoned) => *poisoned.into_inner() = entities,
        }
    }

    pub fn push(&self, entity: Arc<E>) {
        match self.entities.write() {
            Ok(mut guard) => guard.push(entity),
            Err(poisoned) => poisoned.into_inner().push(entity),
        }
    }

    /// Drop the host's handle to `id`; returns whether it was present
    pub fn remove(&self, id: EntityId) -> bool {
        let mut guard = match self.entities.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = guard.len();
        guard.retain(|entity| entity.id() != id);
        before != guard.len()
    }

    pub fn set_bodies(&self, bodies: Vec<Arc<E>>) {
        match self.bodies.write() {
            Ok(mut guard) => *guard = bodies,
            Err(poisoned) => *poisoned.into_inner() = bodies,
        }
    }

    /// Select the reference entity by id; `None` clears it
    pub fn set_reference(&self, id: Option<EntityId>) {
        match self.reference.write() {
            Ok(mut guard) => *guard = id,
            Err(poisoned) => *poisoned.into_inner() = id,
        }
    }

    fn snapshot(&self) -> Vec<Arc<E>> {
        match self.entities.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl<E: Entity> EntityProvider<E> for InMemoryProvider<E> {
    fn fetch_master_collection(&self) -> Result<Vec<Arc<E>>, ProviderError> {
        Ok(self.snapshot())
    }

    fn current_reference_entity(&self) -> Option<Arc<E>> {
        let id = match self.reference.read() {
            Ok(guard) => (*guard)?,
            Err(poisoned) => (*poisoned.into_inner())?,
        };
        self.snapshot().into_iter().find(|entity| entity.id() == id)
    }

    fn fetch_celestial_bodies(&self) -> Vec<Arc<E>> {
        match self.bodies.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl<E> fmt::Debug for InMemoryProvider<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entity_count = self.entities.read().map(|e| e.len()).unwrap_or(0);
        let body_count = self.bodies.read().map(|b| b.len()).unwrap_or(0);

        f.debug_struct("InMemoryProvider")
            .field("entity_count", &entity_count)
            .field("body_count", &body_count)
            .finish()
    }
}
