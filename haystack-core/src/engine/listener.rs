//! Explicit observer registration for list changes.
//!
//! Presentation code registers a listener, keeps the returned
//! [`SubscriptionId`], and unsubscribes before it tears down.

use crate::error::ListError;
use std::fmt;
use std::sync::Arc;

/// Why the engine became dirty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidationReason {
    /// A filter toggle, visibility flag or the search term changed
    Filters,
    /// The comparator chain was edited
    Comparators,
    /// Sort direction flipped
    Direction,
    /// Grouping was switched on or off
    Grouping,
    /// An entity joined or left the hidden set
    HiddenSet,
    /// The master collection must be re-fetched
    MasterChanged,
    /// The host asked for a recompute without saying why
    External,
}

/// Callbacks invoked synchronously by the engine
pub trait ListListener: Send + Sync {
    fn on_invalidated(&self, _reason: InvalidationReason) {}

    fn on_recomputed(&self, _generation: u64) {}

    fn on_recompute_failed(&self, _error: &ListError) {}
}

/// Handle returned by [`ListEngine::subscribe`](super::ListEngine::subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Arc<dyn ListListener>)>,
}

impl ListenerRegistry {
    pub(crate) fn subscribe(&mut self, listener: Arc<dyn ListListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        before != self.listeners.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn notify_invalidated(&self, reason: InvalidationReason) {
        for (_, listener) in &self.listeners {
            listener.on_invalidated(reason);
        }
    }

    pub(crate) fn notify_recomputed(&self, generation: u64) {
        for (_, listener) in &self.listeners {
            listener.on_recomputed(generation);
        }
    }

    pub(crate) fn notify_failed(&self, error: &ListError) {
        for (_, listener) in &self.listeners {
            listener.on_recompute_failed(error);
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listener_count", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
