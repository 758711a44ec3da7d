//! User-facing list state owned by the composition root.
//!
//! The host loads these (see `haystack-config`), hands them to the engine
//! builder, and reads them back from [`ListEngine::settings`] when it wants
//! to persist them. Nothing here is global.
//!
//! [`ListEngine::settings`]: crate::engine::ListEngine::settings

use crate::sorting::SortDirection;
use haystack_model::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ListSettings {
    /// Global direction applied after sorting
    pub direction: SortDirection,
    /// Only show entities sharing the reference entity's group
    pub nearby_only: bool,
    /// Partition the list into per-group buckets
    pub group_by_body: bool,
    /// Show entities in the hidden set anyway
    pub show_hidden: bool,
    /// Entities the user chose to hide
    pub hidden: BTreeSet<EntityId>,
    /// Entity types toggled invisible
    pub hidden_kinds: BTreeSet<EntityKind>,
    /// Case-insensitive name filter; empty disables it
    pub search_term: String,
}

impl ListSettings {
    pub fn is_kind_visible(&self, kind: EntityKind) -> bool {
        !self.hidden_kinds.contains(&kind)
    }

    pub fn is_hidden(&self, id: EntityId) -> bool {
        self.hidden.contains(&id)
    }
}
