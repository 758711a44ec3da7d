//! Partitioning of a filtered list into per-group buckets
//!
//! Buckets are created in first-seen order and each bucket is sorted on its
//! own with the full comparator chain, direction included.

use crate::provider::GroupKeyAccessor;
use crate::sorting::ComparatorChain;
use haystack_model::{Entity, GroupKey};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Mapping from group key to the ordered entities in that group.
///
/// Entities the accessor cannot place land in the `None` bucket, so the
/// buckets always form an exact partition of the list they were built from.
pub struct GroupIndex<E> {
    buckets: IndexMap<Option<GroupKey>, Vec<Arc<E>>>,
}

impl<E: Entity> GroupIndex<E> {
    pub fn new() -> Self {
        Self {
            buckets: IndexMap::new(),
        }
    }

    /// Build a fresh index from `filtered`
    pub fn build(
        filtered: &[Arc<E>],
        group_key_of: &dyn GroupKeyAccessor<E>,
        chain: &ComparatorChain<E>,
    ) -> Self {
        let mut index = Self::new();
        index.rebuild(filtered, group_key_of, chain);
        index
    }

    /// Clear every bucket, repartition `filtered` in order, then sort each
    /// bucket independently.
    pub fn rebuild(
        &mut self,
        filtered: &[Arc<E>],
        group_key_of: &dyn GroupKeyAccessor<E>,
        chain: &ComparatorChain<E>,
    ) {
        self.buckets.clear();

        for entity in filtered {
            self.buckets
                .entry(group_key_of.group_key(entity))
                .or_default()
                .push(Arc::clone(entity));
        }

        for bucket in self.buckets.values_mut() {
            chain.sort(bucket);
        }
    }

    pub fn get(&self, key: Option<&GroupKey>) -> Option<&[Arc<E>]> {
        self.buckets
            .get(&key.cloned())
            .map(|bucket| bucket.as_slice())
    }

    /// Buckets in creation order
    pub fn iter(&self) -> impl Iterator<Item = (Option<&GroupKey>, &[Arc<E>])> {
        self.buckets
            .iter()
            .map(|(key, bucket)| (key.as_ref(), bucket.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = Option<&GroupKey>> {
        self.buckets.keys().map(Option::as_ref)
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of entities across all buckets
    pub fn entity_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// True when the buckets hold exactly the entities of `list`: nothing
    /// added, dropped or duplicated, and no entity in two buckets.
    pub fn is_partition_of(&self, list: &[Arc<E>]) -> bool {
        if self.entity_count() != list.len() {
            return false;
        }

        let mut expected: HashMap<*const E, usize> = HashMap::new();
        for entity in list {
            *expected.entry(Arc::as_ptr(entity)).or_default() += 1;
        }

        for entity in self.buckets.values().flatten() {
            match expected.get_mut(&Arc::as_ptr(entity)) {
                Some(remaining) if *remaining > 0 => *remaining -= 1,
                _ => return false,
            }
        }

        expected.values().all(|remaining| *remaining == 0)
    }
}

impl<E: Entity> Default for GroupIndex<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for GroupIndex<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes: Vec<(Option<&GroupKey>, usize)> = self
            .buckets
            .iter()
            .map(|(key, bucket)| (key.as_ref(), bucket.len()))
            .collect();

        f.debug_struct("GroupIndex").field("buckets", &sizes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorting::{SortDirection, builtin};
    use haystack_model::{EntityId, EntityKind, EntityRecord};

    fn orbiting(name: &str, body: Option<&str>) -> Arc<EntityRecord> {
        let record = EntityRecord::new(EntityId::new(), EntityKind::Ship, name);
        Arc::new(match body {
            Some(body) => record.with_body(body),
            None => record,
        })
    }

    fn body_of(entity: &EntityRecord) -> Option<GroupKey> {
        entity.body()
    }

    fn names(bucket: &[Arc<EntityRecord>]) -> Vec<String> {
        bucket
            .iter()
            .filter_map(|e| e.display_name().map(|n| n.to_string()))
            .collect()
    }

    #[test]
    fn buckets_follow_first_seen_order() {
        let list = vec![
            orbiting("z", Some("Mun")),
            orbiting("y", Some("Kerbin")),
            orbiting("x", Some("Mun")),
        ];
        let chain = ComparatorChain::from_one(builtin::by_name());

        let index = GroupIndex::build(&list, &body_of, &chain);

        let keys: Vec<_> = index.keys().map(|k| k.map(GroupKey::as_str)).collect();
        assert_eq!(keys, vec![Some("Mun"), Some("Kerbin")]);
        assert_eq!(names(index.get(Some(&"Mun".into())).unwrap()), vec!["x", "z"]);
        assert!(index.is_partition_of(&list));
    }

    #[test]
    fn unplaced_entities_share_the_none_bucket() {
        let list = vec![orbiting("a", None), orbiting("b", Some("Eve")), orbiting("c", None)];
        let chain = ComparatorChain::from_one(builtin::by_name());

        let index = GroupIndex::build(&list, &body_of, &chain);

        assert_eq!(index.len(), 2);
        assert_eq!(names(index.get(None).unwrap()), vec!["a", "c"]);
        assert_eq!(index.entity_count(), 3);
        assert!(index.is_partition_of(&list));
    }

    #[test]
    fn buckets_respect_direction() {
        let list = vec![orbiting("a", Some("Mun")), orbiting("b", Some("Mun"))];
        let chain = ComparatorChain::from_one(builtin::by_name())
            .with_direction(SortDirection::Descending);

        let index = GroupIndex::build(&list, &body_of, &chain);

        assert_eq!(names(index.get(Some(&"Mun".into())).unwrap()), vec!["b", "a"]);
    }

    #[test]
    fn rebuild_discards_previous_buckets() {
        let first = vec![orbiting("a", Some("Mun"))];
        let second = vec![orbiting("b", Some("Duna"))];
        let chain = ComparatorChain::new();

        let mut index = GroupIndex::build(&first, &body_of, &chain);
        index.rebuild(&second, &body_of, &chain);

        assert!(index.get(Some(&"Mun".into())).is_none());
        assert!(index.is_partition_of(&second));
        assert!(!index.is_partition_of(&first));
    }

    #[test]
    fn empty_input_yields_empty_index() {
        let index = GroupIndex::<EntityRecord>::build(&[], &body_of, &ComparatorChain::new());
        assert!(index.is_empty());
        assert!(index.is_partition_of(&[]));
    }
}
