//! # Haystack Core
//!
//! Filter, sort and group pipeline behind the Haystack vessel list.
//!
//! ## Overview
//!
//! The host owns a collection of tracked objects (vessels, stations, debris,
//! celestial bodies). `haystack-core` turns that collection into a
//! presentable list:
//!
//! - **Filtering**: type visibility, a hidden set, nearby-only and name search,
//!   combined with logical AND
//! - **Sorting**: a lexicographic chain of named comparators, at most one per
//!   kind, with direction applied to the whole result
//! - **Grouping**: optional partition of the filtered list into per-body
//!   buckets, each ordered by the same chain
//! - **Invalidation**: every mutation marks the engine dirty; a recompute
//!   publishes a new immutable [`Projection`] or leaves the old one in place
//!
//! ## Feature Flags
//!
//! - `runtime` (default): [`runtime::RefreshDriver`], a tokio task that
//!   re-fetches the master collection on a fixed cadence
//!
//! ## Examples
//!
//! ```
//! use haystack_core::{InMemoryProvider, ListEngine, ListSettings};
//! use haystack_model::{EntityId, EntityKind, EntityRecord, GroupKey};
//! use std::sync::Arc;
//!
//! # fn main() -> haystack_core::Result<()> {
//! let provider = Arc::new(InMemoryProvider::new(vec![
//!     Arc::new(EntityRecord::new(EntityId::new(), EntityKind::Ship, "Bob").with_body("Kerbin")),
//!     Arc::new(EntityRecord::new(EntityId::new(), EntityKind::Debris, "Ann").with_body("Kerbin")),
//! ]));
//!
//! let mut engine = ListEngine::<EntityRecord>::builder(provider)
//!     .settings(ListSettings::default())
//!     .group_key_accessor(|e: &EntityRecord| e.body())
//!     .build()?;
//!
//! engine.set_type_visible(EntityKind::Debris, false);
//! engine.set_grouping_enabled(true)?;
//! let projection = engine.recompute()?;
//!
//! assert_eq!(projection.filtered().len(), 1);
//! let kerbin = GroupKey::from("Kerbin");
//! assert_eq!(projection.groups().and_then(|g| g.get(Some(&kerbin))).map(|b| b.len()), Some(1));
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]

pub mod engine;
pub mod error;
pub mod filtering;
pub mod grouping;
pub mod provider;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod settings;
pub mod sorting;

pub use engine::{
    InvalidationReason, ListEngine, ListEngineBuilder, ListListener, Projection,
    SubscriptionId,
};
pub use error::{ConfigurationError, ListError, ProviderError, Result};
pub use filtering::{FilterKind, FilterPipeline, NamedPredicate};
pub use grouping::GroupIndex;
pub use provider::{EntityProvider, GroupKeyAccessor, InMemoryProvider};
#[cfg(feature = "runtime")]
pub use runtime::{RefreshDriver, RefreshHandle};
pub use settings::ListSettings;
pub use sorting::{
    ChainEdit, ComparatorChain, ComparatorKind, NamedComparator, SortDirection,
};
