//! The four predicate kinds the list engine installs.
//!
//! Each constructor snapshots its parameters, so a predicate never observes
//! a settings change made after it was built.

use super::predicate::{FilterKind, NamedPredicate};
use crate::provider::GroupKeyAccessor;
use haystack_model::{Entity, EntityId, EntityKind, GroupKey};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Passes when the entity's type is not toggled invisible.
pub fn type_visibility<E: Entity + 'static>(
    hidden_kinds: BTreeSet<EntityKind>,
) -> NamedPredicate<E> {
    NamedPredicate::new(FilterKind::TypeVisibility, move |entity: &E| {
        !hidden_kinds.contains(&entity.kind())
    })
}

/// Passes when hidden entities are shown, or the entity is not hidden.
pub fn hidden_set<E: Entity + 'static>(
    show_hidden: bool,
    hidden: BTreeSet<EntityId>,
) -> NamedPredicate<E> {
    NamedPredicate::new(FilterKind::HiddenSet, move |entity: &E| {
        show_hidden || !hidden.contains(&entity.id())
    })
}

/// Passes when the entity shares `reference_group`.
///
/// Without a reference group (no reference entity, or one the accessor
/// cannot place) the predicate accepts everything rather than emptying the
/// list.
pub fn nearby_only<E: Entity + 'static>(
    reference_group: Option<GroupKey>,
    group_key_of: Arc<dyn GroupKeyAccessor<E>>,
) -> NamedPredicate<E> {
    NamedPredicate::new(FilterKind::NearbyOnly, move |entity: &E| {
        match &reference_group {
            Some(group) => group_key_of.group_key(entity).as_ref() == Some(group),
            None => true,
        }
    })
}

/// Passes when the term is empty, or the display name contains it
/// (case-insensitive). Unnamed entities fail a non-empty term.
pub fn search_substring<E: Entity + 'static>(term: &str) -> NamedPredicate<E> {
    let needle = term.to_lowercase();

    NamedPredicate::new(FilterKind::SearchSubstring, move |entity: &E| {
        if needle.is_empty() {
            return true;
        }

        entity
            .display_name()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
    })
}
