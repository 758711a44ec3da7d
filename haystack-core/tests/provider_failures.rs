//! Recompute behaviour when the host provider misbehaves.

use haystack_core::{
    EntityProvider, InvalidationReason, ListEngine, ListError, ListListener,
    ListSettings, ProviderError,
};
use haystack_model::{Entity, EntityId, EntityKind, EntityRecord};
use mockall::{Sequence, mock};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mock! {
    pub Provider {}

    impl EntityProvider<EntityRecord> for Provider {
        fn fetch_master_collection(&self) -> Result<Vec<Arc<EntityRecord>>, ProviderError>;
        fn current_reference_entity(&self) -> Option<Arc<EntityRecord>>;
        fn fetch_celestial_bodies(&self) -> Vec<Arc<EntityRecord>>;
    }
}

fn ship(name: &str) -> Arc<EntityRecord> {
    Arc::new(EntityRecord::new(EntityId::new(), EntityKind::Ship, name))
}

#[derive(Default)]
struct FailureCounter {
    failures: AtomicUsize,
    recomputes: AtomicUsize,
}

impl ListListener for FailureCounter {
    fn on_recomputed(&self, _generation: u64) {
        self.recomputes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_recompute_failed(&self, _error: &ListError) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn failed_first_fetch_leaves_nothing_published() {
    let mut provider = MockProvider::new();
    provider
        .expect_fetch_master_collection()
        .times(1)
        .returning(|| Err(ProviderError::Unavailable("scene loading".into())));
    provider.expect_current_reference_entity().never();
    provider.expect_fetch_celestial_bodies().never();

    let mut engine = ListEngine::<EntityRecord>::builder(Arc::new(provider))
        .build()
        .unwrap();

    let err = engine.recompute().unwrap_err();
    assert!(matches!(
        err,
        ListError::Provider(ProviderError::Unavailable(_))
    ));
    assert!(engine.is_dirty());
    assert!(matches!(engine.projection(), Err(ListError::NotComputed)));
}

#[test]
fn failed_refetch_keeps_previous_projection() {
    let bob = ship("Bob");
    let kept = Arc::clone(&bob);

    let mut seq = Sequence::new();
    let mut provider = MockProvider::new();
    provider
        .expect_fetch_master_collection()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move || Ok(vec![Arc::clone(&kept)]));
    provider
        .expect_fetch_master_collection()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Err(ProviderError::Other(anyhow::anyhow!("socket closed"))));
    provider.expect_current_reference_entity().returning(|| None);
    provider.expect_fetch_celestial_bodies().returning(Vec::new);

    let mut engine = ListEngine::<EntityRecord>::builder(Arc::new(provider))
        .build()
        .unwrap();
    let counter = Arc::new(FailureCounter::default());
    let subscription = engine.subscribe(counter.clone());

    let published = engine.recompute().unwrap();
    engine.invalidate(InvalidationReason::MasterChanged);
    assert!(engine.recompute().is_err());

    let current = engine.projection().unwrap();
    assert!(Arc::ptr_eq(&published, &current));
    assert_eq!(current.filtered()[0].id(), bob.id());
    assert!(engine.is_dirty());
    assert_eq!(counter.recomputes.load(Ordering::SeqCst), 1);
    assert_eq!(counter.failures.load(Ordering::SeqCst), 1);

    engine.unsubscribe(subscription);
}

#[test]
fn master_is_fetched_once_until_invalidated() {
    let bob = ship("Bob");
    let mut provider = MockProvider::new();
    provider
        .expect_fetch_master_collection()
        .times(1)
        .returning(move || Ok(vec![Arc::clone(&bob)]));
    provider.expect_current_reference_entity().returning(|| None);
    provider.expect_fetch_celestial_bodies().returning(Vec::new);

    let mut settings = ListSettings::default();
    settings.search_term = "b".into();
    let mut engine = ListEngine::<EntityRecord>::builder(Arc::new(provider))
        .settings(settings)
        .build()
        .unwrap();

    engine.recompute().unwrap();
    engine.set_search_term("bo");
    let projection = engine.recompute().unwrap();

    assert_eq!(projection.filtered().len(), 1);
}
