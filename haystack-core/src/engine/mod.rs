//! List engine orchestration
//!
//! The engine owns the filter pipeline and comparator chain, keeps the last
//! fetched snapshot of the host's master collection, and turns it into an
//! immutable [`Projection`] in one synchronous pass:
//!
//! 1. re-fetch the master collection if it is stale
//! 2. filter
//! 3. partition into groups (when enabled), each bucket sorted on its own
//! 4. sort the filtered list and apply the direction
//! 5. publish the projection and clear the dirty flag
//!
//! A pass either publishes a complete projection or leaves the previous one
//! in place.

mod listener;
mod projection;

pub use listener::{InvalidationReason, ListListener, SubscriptionId};
pub use projection::Projection;

use crate::error::{ConfigurationError, ListError, Result};
use crate::filtering::{FilterKind, FilterPipeline, builtin as filters};
use crate::grouping::GroupIndex;
use crate::provider::{EntityProvider, GroupKeyAccessor};
use crate::settings::ListSettings;
use crate::sorting::{
    ChainEdit, ComparatorChain, ComparatorKind, NamedComparator, SortDirection,
    builtin as comparators,
};
use chrono::Utc;
use haystack_model::{Entity, EntityId, EntityKind};
use listener::ListenerRegistry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace, warn};

const GROUPING_FEATURE: &str = "grouping";
const NEARBY_FEATURE: &str = "nearby-only filtering";

/// Builder for [`ListEngine`]
pub struct ListEngineBuilder<E: Entity + 'static> {
    provider: Arc<dyn EntityProvider<E>>,
    group_key_of: Option<Arc<dyn GroupKeyAccessor<E>>>,
    settings: ListSettings,
    chain: Option<ComparatorChain<E>>,
}

impl<E: Entity + 'static> ListEngineBuilder<E> {
    /// Initial settings, usually loaded by the host at startup
    pub fn settings(mut self, settings: ListSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Install the grouping capability
    pub fn group_key_accessor(
        mut self,
        accessor: impl GroupKeyAccessor<E> + 'static,
    ) -> Self {
        self.group_key_of = Some(Arc::new(accessor));
        self
    }

    /// Replace the default `[name]` chain
    pub fn comparator_chain(mut self, chain: ComparatorChain<E>) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn build(self) -> Result<ListEngine<E>> {
        if self.group_key_of.is_none() {
            if self.settings.group_by_body {
                return Err(ConfigurationError::MissingGroupKeyAccessor {
                    feature: GROUPING_FEATURE,
                }
                .into());
            }
            if self.settings.nearby_only {
                return Err(ConfigurationError::MissingGroupKeyAccessor {
                    feature: NEARBY_FEATURE,
                }
                .into());
            }
        }

        let mut chain = self
            .chain
            .unwrap_or_else(|| ComparatorChain::from_one(comparators::by_name()));
        chain.validate()?;
        chain.set_direction(self.settings.direction);

        if !self.settings.search_term.is_empty() {
            chain.add_primary(comparators::search_relevance(
                &self.settings.search_term,
            ));
        }

        let mut engine = ListEngine {
            provider: self.provider,
            group_key_of: self.group_key_of,
            settings: self.settings,
            chain,
            pipeline: FilterPipeline::new(),
            master: Vec::new(),
            bodies: Vec::new(),
            reference: Weak::new(),
            reference_id: None,
            dirty: true,
            master_stale: true,
            generation: 0,
            projection: None,
            listeners: ListenerRegistry::default(),
        };

        if engine.settings.nearby_only {
            engine.refresh_reference();
            engine
                .chain
                .add_primary(comparators::nearby(engine.reference.clone()));
        }

        Ok(engine)
    }
}

impl<E: Entity + 'static> fmt::Debug for ListEngineBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListEngineBuilder")
            .field("has_group_key_accessor", &self.group_key_of.is_some())
            .field("settings", &self.settings)
            .field("chain", &self.chain)
            .finish()
    }
}

/// Filtered, ordered, optionally grouped view over a host-owned collection.
///
/// All mutation and recompute calls on one engine must be serialized by the
/// caller; the engine itself never locks.
pub struct ListEngine<E: Entity + 'static> {
    provider: Arc<dyn EntityProvider<E>>,
    group_key_of: Option<Arc<dyn GroupKeyAccessor<E>>>,
    settings: ListSettings,
    chain: ComparatorChain<E>,
    pipeline: FilterPipeline<E>,
    master: Vec<Arc<E>>,
    bodies: Vec<Arc<E>>,
    reference: Weak<E>,
    reference_id: Option<EntityId>,
    dirty: bool,
    master_stale: bool,
    generation: u64,
    projection: Option<Arc<Projection<E>>>,
    listeners: ListenerRegistry,
}

impl<E: Entity + 'static> ListEngine<E> {
    pub fn builder(provider: Arc<dyn EntityProvider<E>>) -> ListEngineBuilder<E> {
        ListEngineBuilder {
            provider,
            group_key_of: None,
            settings: ListSettings::default(),
            chain: None,
        }
    }

    // ---- mutation entry points ------------------------------------------

    pub fn set_type_visible(&mut self, kind: EntityKind, visible: bool) {
        let changed = if visible {
            self.settings.hidden_kinds.remove(&kind)
        } else {
            self.settings.hidden_kinds.insert(kind)
        };

        if changed {
            self.mark_dirty(InvalidationReason::Filters);
        }
    }

    /// Toggle whether members of the hidden set are shown
    pub fn set_hidden_toggle(&mut self, show_hidden: bool) {
        if self.settings.show_hidden != show_hidden {
            self.settings.show_hidden = show_hidden;
            self.mark_dirty(InvalidationReason::Filters);
        }
    }

    /// Restrict the list to the reference entity's group and make distance
    /// to the reference the primary sort key.
    pub fn set_nearby_only(&mut self, enabled: bool) -> Result<()> {
        if enabled && self.group_key_of.is_none() {
            return Err(ConfigurationError::MissingGroupKeyAccessor {
                feature: NEARBY_FEATURE,
            }
            .into());
        }

        if self.settings.nearby_only == enabled {
            return Ok(());
        }

        self.settings.nearby_only = enabled;
        if enabled {
            self.refresh_reference();
            self.chain
                .add_primary(comparators::nearby(self.reference.clone()));
        } else {
            self.chain.remove(ComparatorKind::Nearby);
        }

        self.mark_dirty(InvalidationReason::Filters);
        Ok(())
    }

    /// Set the case-insensitive name filter. A non-empty term also installs
    /// a search-relevance comparator as the primary sort key; an empty one
    /// removes it.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.settings.search_term {
            return;
        }

        if term.is_empty() {
            self.chain.remove(ComparatorKind::SearchRelevance);
        } else {
            self.chain.add_primary(comparators::search_relevance(&term));
        }

        self.settings.search_term = term;
        self.mark_dirty(InvalidationReason::Filters);
    }

    pub fn set_grouping_enabled(&mut self, enabled: bool) -> Result<()> {
        if enabled && self.group_key_of.is_none() {
            return Err(ConfigurationError::MissingGroupKeyAccessor {
                feature: GROUPING_FEATURE,
            }
            .into());
        }

        if self.settings.group_by_body != enabled {
            self.settings.group_by_body = enabled;
            self.mark_dirty(InvalidationReason::Grouping);
        }
        Ok(())
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        if self.chain.set_direction(direction) {
            self.settings.direction = direction;
            self.mark_dirty(InvalidationReason::Direction);
        }
    }

    pub fn set_ascending(&mut self, ascending: bool) {
        self.set_sort_direction(SortDirection::from_ascending(ascending));
    }

    pub fn add_or_replace_comparator(
        &mut self,
        comparator: NamedComparator<E>,
    ) -> ChainEdit {
        let edit = self.chain.add(comparator);
        self.mark_dirty(InvalidationReason::Comparators);
        edit
    }

    /// Returns false (and stays clean) when no comparator of `kind` exists
    pub fn remove_comparator(&mut self, kind: ComparatorKind) -> bool {
        let removed = self.chain.remove(kind);
        if removed {
            self.mark_dirty(InvalidationReason::Comparators);
        }
        removed
    }

    pub fn hide_entity(&mut self, id: EntityId) -> bool {
        let inserted = self.settings.hidden.insert(id);
        if inserted {
            self.mark_dirty(InvalidationReason::HiddenSet);
        }
        inserted
    }

    pub fn unhide_entity(&mut self, id: EntityId) -> bool {
        let removed = self.settings.hidden.remove(&id);
        if removed {
            self.mark_dirty(InvalidationReason::HiddenSet);
        }
        removed
    }

    pub fn is_hidden(&self, id: EntityId) -> bool {
        self.settings.is_hidden(id)
    }

    /// External invalidation signal. `MasterChanged` also forces the next
    /// pass to re-fetch the master collection.
    pub fn invalidate(&mut self, reason: InvalidationReason) {
        self.mark_dirty(reason);
    }

    // ---- recompute ------------------------------------------------------

    /// Run a full pass and publish its projection.
    ///
    /// On failure the previous projection stays published, the engine stays
    /// dirty, and listeners are told through `on_recompute_failed`.
    pub fn recompute(&mut self) -> Result<Arc<Projection<E>>> {
        match self.run_pass() {
            Ok(projection) => {
                self.generation = projection.generation;
                self.projection = Some(Arc::clone(&projection));
                self.dirty = false;
                self.listeners.notify_recomputed(projection.generation);
                Ok(projection)
            }
            Err(error) => {
                warn!(%error, "recompute failed, keeping previous projection");
                self.listeners.notify_failed(&error);
                Err(error)
            }
        }
    }

    /// Recompute only when dirty (or never computed)
    pub fn ensure_fresh(&mut self) -> Result<Arc<Projection<E>>> {
        match &self.projection {
            Some(projection) if !self.dirty => Ok(Arc::clone(projection)),
            _ => self.recompute(),
        }
    }

    fn run_pass(&mut self) -> Result<Arc<Projection<E>>> {
        if self.master_stale {
            self.refresh_master()?;
        }

        self.refresh_reference();
        self.sync_pipeline();
        self.pipeline.validate()?;
        self.chain.validate()?;

        let available: Vec<Arc<E>> = self
            .master
            .iter()
            .filter(|entity| entity.is_available())
            .cloned()
            .collect();
        let dropped_stale = self.master.len() - available.len();
        let counts_by_type = count_by_kind(&available);

        let filtered = self.pipeline.apply(available);

        let groups = if self.settings.group_by_body {
            let accessor = self.group_key_of.as_deref().ok_or(
                ConfigurationError::MissingGroupKeyAccessor {
                    feature: GROUPING_FEATURE,
                },
            )?;
            Some(GroupIndex::build(&filtered, accessor, &self.chain))
        } else {
            None
        };

        let mut ordered = filtered;
        self.chain.sort(&mut ordered);

        let bodies = self.visible_bodies();
        let generation = self.generation + 1;

        if dropped_stale > 0 {
            debug!(dropped_stale, "skipped unavailable entities");
        }
        debug!(
            generation,
            master = self.master.len(),
            filtered = ordered.len(),
            groups = groups.as_ref().map(GroupIndex::len).unwrap_or(0),
            bodies = bodies.len(),
            "recomputed list projection"
        );

        Ok(Arc::new(Projection {
            generation,
            computed_at: Utc::now(),
            filtered: ordered,
            groups,
            counts_by_type,
            bodies,
            dropped_stale,
        }))
    }

    /// Re-fetch the master collection; the only point where entity identity
    /// is revalidated. The snapshot is kept until the next fetch replaces it.
    fn refresh_master(&mut self) -> Result<()> {
        let entities = self.provider.fetch_master_collection()?;

        self.master = entities;
        self.bodies = self.provider.fetch_celestial_bodies();
        self.master_stale = false;

        info!(
            entities = self.master.len(),
            bodies = self.bodies.len(),
            "fetched master collection"
        );
        Ok(())
    }

    /// Pick up the provider's current reference entity. An installed nearby
    /// comparator is rebuilt for the new reference at its existing position.
    fn refresh_reference(&mut self) -> bool {
        let current = self.provider.current_reference_entity();
        let current_id = current.as_ref().map(|entity| entity.id());
        let current_weak = current.as_ref().map(Arc::downgrade).unwrap_or_default();

        let changed = current_id != self.reference_id
            || !Weak::ptr_eq(&current_weak, &self.reference);
        if !changed {
            return false;
        }

        if current_id != self.reference_id {
            debug!(
                previous = ?self.reference_id,
                current = ?current_id,
                "reference entity changed"
            );
        }

        self.reference = current_weak;
        self.reference_id = current_id;

        if self.chain.contains(ComparatorKind::Nearby) {
            self.chain.add(comparators::nearby(self.reference.clone()));
        }
        true
    }

    /// Bring the predicate set in line with the current settings.
    fn sync_pipeline(&mut self) {
        if self.settings.hidden_kinds.is_empty() {
            self.pipeline.clear_predicate(FilterKind::TypeVisibility);
        } else {
            self.pipeline.set_predicate(filters::type_visibility(
                self.settings.hidden_kinds.clone(),
            ));
        }

        if self.settings.show_hidden || self.settings.hidden.is_empty() {
            self.pipeline.clear_predicate(FilterKind::HiddenSet);
        } else {
            self.pipeline.set_predicate(filters::hidden_set(
                self.settings.show_hidden,
                self.settings.hidden.clone(),
            ));
        }

        match (&self.group_key_of, self.settings.nearby_only) {
            (Some(accessor), true) => {
                let reference_group = self
                    .reference
                    .upgrade()
                    .filter(|reference| reference.is_available())
                    .and_then(|reference| accessor.group_key(&reference));
                self.pipeline.set_predicate(filters::nearby_only(
                    reference_group,
                    Arc::clone(accessor),
                ));
            }
            _ => {
                self.pipeline.clear_predicate(FilterKind::NearbyOnly);
            }
        }

        if self.settings.search_term.is_empty() {
            self.pipeline.clear_predicate(FilterKind::SearchSubstring);
        } else {
            self.pipeline
                .set_predicate(filters::search_substring(&self.settings.search_term));
        }
    }

    fn visible_bodies(&self) -> Vec<Arc<E>> {
        if !self.settings.is_kind_visible(EntityKind::CelestialBody) {
            return Vec::new();
        }

        let matches = filters::search_substring::<E>(&self.settings.search_term);
        self.bodies
            .iter()
            .filter(|body| body.is_available() && matches.test(body))
            .cloned()
            .collect()
    }

    fn mark_dirty(&mut self, reason: InvalidationReason) {
        self.dirty = true;
        if reason == InvalidationReason::MasterChanged {
            self.master_stale = true;
        }
        trace!(?reason, "list invalidated");
        self.listeners.notify_invalidated(reason);
    }

    // ---- read-only projections -----------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Latest published projection
    pub fn projection(&self) -> Result<Arc<Projection<E>>> {
        self.projection.clone().ok_or(ListError::NotComputed)
    }

    pub fn filtered_ordered_list(&self) -> Result<&[Arc<E>]> {
        self.published().map(|p| p.filtered())
    }

    /// Buckets of the latest projection; `Ok(None)` when grouping was off
    pub fn grouped_view(&self) -> Result<Option<&GroupIndex<E>>> {
        self.published().map(|p| p.groups())
    }

    pub fn counts_by_type(&self) -> Result<&BTreeMap<EntityKind, usize>> {
        self.published().map(|p| p.counts_by_type())
    }

    pub fn celestial_bodies(&self) -> Result<&[Arc<E>]> {
        self.published().map(|p| p.bodies())
    }

    fn published(&self) -> Result<&Projection<E>> {
        self.projection.as_deref().ok_or(ListError::NotComputed)
    }

    pub fn settings(&self) -> &ListSettings {
        &self.settings
    }

    pub fn comparator_chain(&self) -> &ComparatorChain<E> {
        &self.chain
    }

    pub fn filter_pipeline(&self) -> &FilterPipeline<E> {
        &self.pipeline
    }

    pub fn reference_entity(&self) -> Option<Arc<E>> {
        self.reference.upgrade()
    }

    // ---- observers --------------------------------------------------------

    pub fn subscribe(&mut self, listener: Arc<dyn ListListener>) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl<E: Entity + 'static> Drop for ListEngine<E> {
    fn drop(&mut self) {
        let remaining = self.listeners.len();
        if remaining > 0 {
            warn!(remaining, "list engine dropped with listeners still subscribed");
        }
    }
}

impl<E: Entity + 'static> fmt::Debug for ListEngine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListEngine")
            .field("settings", &self.settings)
            .field("chain", &self.chain)
            .field("pipeline", &self.pipeline)
            .field("master", &self.master.len())
            .field("dirty", &self.dirty)
            .field("master_stale", &self.master_stale)
            .field("generation", &self.generation)
            .field("listeners", &self.listeners)
            .finish()
    }
}

fn count_by_kind<E: Entity>(entities: &[Arc<E>]) -> BTreeMap<EntityKind, usize> {
    let mut counts = BTreeMap::new();
    for entity in entities {
        *counts.entry(entity.kind()).or_insert(0usize) += 1;
    }
    counts
}
