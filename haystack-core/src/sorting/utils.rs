//! Utility functions for sorting operations

use std::cmp::Ordering;

/// Check if a slice is already sorted according to a comparison function
///
/// Returns true if the slice is already sorted, false otherwise.
/// This can be used to skip sorting when data is already in the desired order.
pub fn is_sorted_by<T, F>(items: &[T], mut compare: F) -> bool
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.windows(2).all(|w| {
        matches!(compare(&w[0], &w[1]), Ordering::Less | Ordering::Equal)
    })
}

/// Case-insensitive ordering of two strings without allocating.
///
/// Falls back to ordinal order when the folded forms tie so that the result
/// stays a total order ("bob" and "Bob" never compare equal).
pub fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded.then_with(|| a.cmp(b))
}

/// Order two optional values with missing values always sorted last.
pub fn compare_missing_last<T, F>(
    a: Option<T>,
    b: Option<T>,
    compare: F,
) -> Ordering
where
    F: FnOnce(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => compare(&a, &b),
        (Some(_), None) => Ordering::Less, // Items with values come first
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sorted_by() {
        let sorted = vec![1, 2, 3, 4, 5];
        let unsorted = vec![1, 3, 2, 4, 5];

        assert!(is_sorted_by(&sorted, |a, b| a.cmp(b)));
        assert!(!is_sorted_by(&unsorted, |a, b| a.cmp(b)));

        // Test reverse sorting
        let reverse_sorted = vec![5, 4, 3, 2, 1];
        assert!(is_sorted_by(&reverse_sorted, |a, b| b.cmp(a)));
    }

    #[test]
    fn test_case_insensitive_folds_before_ordinal() {
        assert_eq!(compare_case_insensitive("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_case_insensitive("Beta", "alpha"), Ordering::Greater);
        // Ties on folded form break on ordinal value
        assert_eq!(compare_case_insensitive("Bob", "bob"), Ordering::Less);
        assert_eq!(compare_case_insensitive("bob", "bob"), Ordering::Equal);
    }

    #[test]
    fn test_missing_values_sort_last() {
        let cmp = |a: &i32, b: &i32| a.cmp(b);
        assert_eq!(compare_missing_last(Some(1), None, cmp), Ordering::Less);
        assert_eq!(compare_missing_last(None, Some(1), cmp), Ordering::Greater);
        assert_eq!(compare_missing_last::<i32, _>(None, None, cmp), Ordering::Equal);
        assert_eq!(compare_missing_last(Some(2), Some(1), cmp), Ordering::Greater);
    }
}
