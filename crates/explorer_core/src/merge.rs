use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Identity used to deduplicate list items. Two items with the same key are
/// the same item, whatever their payload.
pub trait Keyed {
    type Key: Eq + Hash + Clone + Debug;

    fn key(&self) -> Self::Key;
}

/// Append the items of `incoming` whose key is not yet present, keeping the
/// order of both sequences. Returns the merged sequence and the number of
/// items appended.
///
/// Keys repeated inside `incoming` are only taken once (first occurrence wins).
pub fn merge_unique<T, K, F>(existing: Vec<T>, incoming: Vec<T>, key_of: F) -> (Vec<T>, usize)
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen: HashSet<K> = existing.iter().map(&key_of).collect();
    let before = existing.len();
    let mut merged = existing;
    merged.reserve(incoming.len());
    for item in incoming {
        if seen.insert(key_of(&item)) {
            merged.push(item);
        }
    }
    let added = merged.len() - before;
    (merged, added)
}

#[cfg(test)]
mod tests {
    use super::merge_unique;

    #[test]
    fn overlapping_pages_append_only_new_keys() {
        let existing: Vec<u32> = (1..=10).collect();
        let incoming: Vec<u32> = (6..=15).collect();

        let (merged, added) = merge_unique(existing, incoming, |n| *n);

        assert_eq!(merged, (1..=15).collect::<Vec<_>>());
        assert_eq!(added, 5);
    }

    #[test]
    fn duplicates_within_incoming_are_collapsed() {
        let (merged, added) = merge_unique(vec![1, 2], vec![3, 3, 2, 4, 3], |n: &i32| *n);

        assert_eq!(merged, vec![1, 2, 3, 4]);
        assert_eq!(added, 2);
    }

    #[test]
    fn key_function_decides_equality() {
        let existing = vec![("a", 1)];
        let incoming = vec![("a", 2), ("b", 3)];

        let (merged, added) = merge_unique(existing, incoming, |(name, _)| *name);

        assert_eq!(merged, vec![("a", 1), ("b", 3)]);
        assert_eq!(added, 1);
    }
}
