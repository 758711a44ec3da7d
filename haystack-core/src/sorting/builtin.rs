//! Built-in comparators
//!
//! Parameterized comparators capture their parameter at construction time.
//! When the parameter stops being usable (the reference entity went away, or
//! has no position) they report `Equal`, which lets the chain fall through to
//! its next member instead of failing the pass.

use super::comparator::{ComparatorKind, NamedComparator};
use super::utils::{compare_case_insensitive, compare_missing_last};
use haystack_model::{Entity, Position};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::sync::Weak;

/// Case-insensitive display name order; unnamed entities sort last.
pub fn by_name<E: Entity + 'static>() -> NamedComparator<E> {
    NamedComparator::new(ComparatorKind::Name, |a: &E, b: &E| {
        compare_missing_last(a.display_name(), b.display_name(), |a, b| {
            compare_case_insensitive(a, b)
        })
    })
}

/// Entity type presentation rank, lowest first.
pub fn by_type_order<E: Entity + 'static>() -> NamedComparator<E> {
    NamedComparator::new(ComparatorKind::TypeOrder, |a: &E, b: &E| {
        a.kind().sort_rank().cmp(&b.kind().sort_rank())
    })
}

/// Distance to `reference`, closest first; entities without a usable
/// position sort after those with one.
pub fn nearby<E: Entity + 'static>(reference: Weak<E>) -> NamedComparator<E> {
    NamedComparator::new(ComparatorKind::Nearby, move |a: &E, b: &E| {
        let Some(origin) = reference_point(&reference) else {
            return Ordering::Equal;
        };

        compare_missing_last(
            distance_key(a, &origin),
            distance_key(b, &origin),
            |a, b| a.cmp(b),
        )
    })
}

/// Names equal to the term first, then prefix matches, then earlier
/// substring matches. Names that do not match at all sort last.
pub fn search_relevance<E: Entity + 'static>(term: &str) -> NamedComparator<E> {
    let needle = term.to_lowercase();

    NamedComparator::new(ComparatorKind::SearchRelevance, move |a: &E, b: &E| {
        if needle.is_empty() {
            return Ordering::Equal;
        }

        compare_missing_last(
            match_rank(a, &needle),
            match_rank(b, &needle),
            |a, b| a.cmp(b),
        )
    })
}

fn reference_point<E: Entity>(reference: &Weak<E>) -> Option<Position> {
    reference
        .upgrade()
        .filter(|entity| entity.is_available())
        .and_then(|entity| entity.position())
        .filter(Position::is_finite)
}

fn distance_key<E: Entity>(
    entity: &E,
    origin: &Position,
) -> Option<OrderedFloat<f64>> {
    entity
        .position()
        .filter(Position::is_finite)
        .map(|p| OrderedFloat(p.distance_squared(origin)))
}

fn match_rank<E: Entity>(entity: &E, needle: &str) -> Option<(u8, usize)> {
    let name = entity.display_name()?.to_lowercase();

    if name == needle {
        Some((0, 0))
    } else if name.starts_with(needle) {
        Some((1, 0))
    } else {
        name.find(needle).map(|idx| (2, idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorting::ComparatorChain;
    use haystack_model::{EntityId, EntityKind, EntityRecord};
    use std::sync::Arc;

    fn record(name: &str, kind: EntityKind) -> Arc<EntityRecord> {
        Arc::new(EntityRecord::new(EntityId::new(), kind, name))
    }

    fn placed(name: &str, x: f64) -> Arc<EntityRecord> {
        Arc::new(
            EntityRecord::new(EntityId::new(), EntityKind::Ship, name)
                .with_position(Position::new(x, 0.0, 0.0)),
        )
    }

    fn names(items: &[Arc<EntityRecord>]) -> Vec<String> {
        items
            .iter()
            .map(|e| e.display_name().map(|n| n.to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn name_order_ignores_case_and_puts_unnamed_last() {
        let unnamed =
            Arc::new(EntityRecord::unnamed(EntityId::new(), EntityKind::Debris));
        let mut items = vec![
            unnamed,
            record("carl", EntityKind::Ship),
            record("Bob", EntityKind::Ship),
            record("ann", EntityKind::Ship),
        ];

        ComparatorChain::from_one(by_name::<EntityRecord>()).sort(&mut items);

        assert_eq!(names(&items), vec!["ann", "Bob", "carl", ""]);
    }

    #[test]
    fn type_order_follows_rank() {
        let mut items = vec![
            record("d", EntityKind::Debris),
            record("s", EntityKind::Ship),
            record("b", EntityKind::Base),
        ];

        ComparatorChain::from_one(by_type_order::<EntityRecord>()).sort(&mut items);

        assert_eq!(names(&items), vec!["b", "s", "d"]);
    }

    #[test]
    fn nearby_orders_by_distance_to_reference() {
        let origin = placed("origin", 0.0);
        let far = placed("far", 100.0);
        let near = placed("near", 5.0);
        let lost = record("lost", EntityKind::Ship);

        let mut items = vec![lost, far, near, origin.clone()];
        ComparatorChain::from_one(nearby(Arc::downgrade(&origin))).sort(&mut items);

        assert_eq!(names(&items), vec!["origin", "near", "far", "lost"]);
    }

    #[test]
    fn nearby_falls_through_when_reference_is_gone() {
        let origin = placed("origin", 0.0);
        let reference = Arc::downgrade(&origin);
        drop(origin);

        let mut chain = ComparatorChain::new();
        chain.add(nearby(reference));
        chain.add(by_name());

        let mut items = vec![placed("b", 1.0), placed("a", 50.0)];
        chain.sort(&mut items);

        assert_eq!(names(&items), vec!["a", "b"]);
    }

    #[test]
    fn nearby_falls_through_when_reference_is_unavailable() {
        let origin = placed("origin", 0.0);
        origin.mark_unavailable();

        let comparator = nearby(Arc::downgrade(&origin));
        assert_eq!(
            comparator.compare(&placed("a", 1.0), &placed("b", 2.0)),
            Ordering::Equal
        );
    }

    #[test]
    fn search_relevance_ranks_exact_then_prefix_then_substring() {
        let mut items = vec![
            record("Minmus Carrier", EntityKind::Ship),
            record("cargo", EntityKind::Ship),
            record("Car", EntityKind::Ship),
            record("Boat", EntityKind::Ship),
            record("Scar", EntityKind::Ship),
        ];

        ComparatorChain::from_one(search_relevance::<EntityRecord>("car")).sort(&mut items);

        assert_eq!(
            names(&items),
            vec!["Car", "cargo", "Scar", "Minmus Carrier", "Boat"]
        );
    }

    #[test]
    fn empty_search_term_never_decides() {
        let comparator = search_relevance::<EntityRecord>("");
        assert_eq!(
            comparator.compare(
                &record("a", EntityKind::Ship),
                &record("b", EntityKind::Ship)
            ),
            Ordering::Equal
        );
    }
}
