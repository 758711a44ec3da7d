//! The read surface the list engine uses to inspect a tracked object.

use crate::{EntityId, EntityKind, GroupKey, Position};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// An externally owned object that can be filtered, sorted and grouped.
///
/// Implementors stay owned by the host; the engine keeps the last fetched
/// snapshot until the next fetch and skips entities that report
/// [`is_available`](Entity::is_available) as false. Attribute accessors may return `None` when the
/// host has no value (for instance an unnamed object), which the engine
/// treats as an absent attribute rather than an error.
pub trait Entity: Send + Sync {
    /// Stable, unique identity
    fn id(&self) -> EntityId;

    /// Current display name; may change between recompute passes
    fn display_name(&self) -> Option<Arc<str>>;

    /// Type tag
    fn kind(&self) -> EntityKind;

    /// Position for distance-based ordering
    fn position(&self) -> Option<Position>;

    /// False once the host considers this reference stale
    fn is_available(&self) -> bool {
        true
    }
}

/// Concrete, host-usable entity with interior-mutable attributes.
///
/// Hosts that do not already have an object model can register these with a
/// provider and mutate names, positions and orbits in place between passes.
#[derive(Debug)]
pub struct EntityRecord {
    id: EntityId,
    kind: EntityKind,
    name: RwLock<Option<Arc<str>>>,
    position: RwLock<Option<Position>>,
    body: RwLock<Option<GroupKey>>,
    available: AtomicBool,
}

impl EntityRecord {
    pub fn new(id: EntityId, kind: EntityKind, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            kind,
            name: RwLock::new(Some(name.into())),
            position: RwLock::new(None),
            body: RwLock::new(None),
            available: AtomicBool::new(true),
        }
    }

    pub fn unnamed(id: EntityId, kind: EntityKind) -> Self {
        let record = Self::new(id, kind, "");
        record.clear_name();
        record
    }

    pub fn with_position(self, position: Position) -> Self {
        self.set_position(Some(position));
        self
    }

    pub fn with_body(self, body: impl Into<GroupKey>) -> Self {
        self.set_body(Some(body.into()));
        self
    }

    pub fn rename(&self, name: impl Into<Arc<str>>) {
        write_slot(&self.name, Some(name.into()));
    }

    pub fn clear_name(&self) {
        write_slot(&self.name, None);
    }

    pub fn set_position(&self, position: Option<Position>) {
        write_slot(&self.position, position);
    }

    pub fn set_body(&self, body: Option<GroupKey>) {
        write_slot(&self.body, body);
    }

    /// The body this record currently orbits
    pub fn body(&self) -> Option<GroupKey> {
        read_slot(&self.body)
    }

    pub fn mark_unavailable(&self) {
        self.available.store(false, Ordering::Release);
    }
}

impl Entity for EntityRecord {
    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> Option<Arc<str>> {
        read_slot(&self.name)
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn position(&self) -> Option<Position> {
        read_slot(&self.position)
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }
}

// A poisoned slot still holds the last written value.
fn read_slot<T: Clone>(slot: &RwLock<T>) -> T {
    match slot.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn write_slot<T>(slot: &RwLock<T>, value: T) {
    match slot.write() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_is_visible_through_trait() {
        let record = EntityRecord::new(EntityId::new(), EntityKind::Ship, "Bob");
        assert_eq!(record.display_name().as_deref(), Some("Bob"));

        record.rename("Bobby");
        assert_eq!(record.display_name().as_deref(), Some("Bobby"));

        record.clear_name();
        assert!(record.display_name().is_none());
    }

    #[test]
    fn availability_flips_once_marked() {
        let record = EntityRecord::new(EntityId::new(), EntityKind::Probe, "P");
        assert!(record.is_available());
        record.mark_unavailable();
        assert!(!record.is_available());
    }

    #[test]
    fn builder_helpers_populate_optional_attributes() {
        let record = EntityRecord::unnamed(EntityId::new(), EntityKind::Debris)
            .with_position(Position::new(1.0, 2.0, 3.0))
            .with_body("Kerbin");

        assert!(record.display_name().is_none());
        assert_eq!(record.position(), Some(Position::new(1.0, 2.0, 3.0)));
        assert_eq!(record.body(), Some(GroupKey::from("Kerbin")));
    }
}
