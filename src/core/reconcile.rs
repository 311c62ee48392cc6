//! In-place reconciliation of a visible list against a freshly filtered one.

use std::collections::HashSet;
use std::hash::Hash;

/// Structural edits performed by [`reconcile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edits {
    /// Elements inserted into the destination.
    pub inserted: usize,
    /// Elements removed from the destination.
    pub removed: usize,
}

impl Edits {
    /// True if the destination was left untouched.
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.removed == 0
    }
}

/// Mutate `dest` in place until it equals `source`.
///
/// Elements already in `dest` stay where they are (same value, same
/// identity); only missing ones are inserted and stale ones removed.
///
/// `source` must be sorted and unique. The common transitions are handled
/// by two fast paths: when `source` is at least as long as `dest` and
/// `dest` is an order-preserving subsequence of it, missing elements are
/// inserted into the gaps; when it is shorter and all its elements are in
/// `dest`, stale ones are dropped. Any other `dest` (reordered, holding
/// duplicates, or unrelated) is resynchronized from `source` after the
/// fast path leaves it out of sync.
pub fn reconcile<T>(source: &[T], dest: &mut Vec<T>) -> Edits
where
    T: Clone + Eq + Hash,
{
    let mut edits = if source.len() >= dest.len() {
        grow(source, dest)
    } else {
        shrink(source, dest)
    };

    if dest.as_slice() != source {
        let resynced = resync(source, dest);
        edits.inserted += resynced.inserted;
        edits.removed += resynced.removed;
    }

    debug_assert!(
        dest.as_slice() == source,
        "reconcile left destination out of sync ({} vs {} elements)",
        dest.len(),
        source.len()
    );

    edits
}

fn grow<T: Clone + Eq>(source: &[T], dest: &mut Vec<T>) -> Edits {
    let mut edits = Edits::default();
    dest.reserve(source.len() - dest.len());

    let mut pos = dest.len();
    for item in source.iter().rev() {
        if pos > 0 && dest[pos - 1] == *item {
            pos -= 1;
        } else {
            dest.insert(pos, item.clone());
            edits.inserted += 1;
        }
    }

    edits
}

fn shrink<T: Eq + Hash>(source: &[T], dest: &mut Vec<T>) -> Edits {
    let keep: HashSet<&T> = source.iter().collect();
    let before = dest.len();
    // retain walks once and keeps survivors in their relative order
    dest.retain(|item| keep.contains(item));

    Edits {
        inserted: 0,
        removed: before - dest.len(),
    }
}

/// General path: drop stale and duplicate elements, then lay `dest` out in
/// `source` order.
fn resync<T: Clone + Eq + Hash>(source: &[T], dest: &mut Vec<T>) -> Edits {
    let keep: HashSet<&T> = source.iter().collect();
    let before = dest.len();
    let mut seen = HashSet::with_capacity(dest.len());
    dest.retain(|item| keep.contains(item) && seen.insert(item.clone()));
    let survivors = dest.len();

    // survivors equal their source counterparts, so cloning from source
    // keeps the same handles
    dest.clear();
    dest.extend_from_slice(source);

    Edits {
        inserted: source.len() - survivors,
        removed: before - survivors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    #[test]
    fn grows_into_gaps() {
        let source: Vec<i32> = (0..6).collect();
        let mut dest = vec![1, 3, 4];
        let edits = reconcile(&source, &mut dest);
        assert_eq!(dest, source);
        assert_eq!(
            edits,
            Edits {
                inserted: 3,
                removed: 0
            }
        );
    }

    #[test]
    fn grows_from_empty() {
        let source: Vec<i32> = (0..6).collect();
        let mut dest = Vec::new();
        let edits = reconcile(&source, &mut dest);
        assert_eq!(dest, source);
        assert_eq!(edits.inserted, 6);
    }

    #[test]
    fn shrinks_to_empty() {
        let mut dest = vec![1, 2, 3];
        let edits = reconcile(&[], &mut dest);
        assert!(dest.is_empty());
        assert_eq!(edits.removed, 3);
    }

    #[test]
    fn shrinks_keeping_order() {
        let mut dest = vec![0, 1, 2, 3, 4, 5];
        let edits = reconcile(&[1, 4, 5], &mut dest);
        assert_eq!(dest, vec![1, 4, 5]);
        assert_eq!(
            edits,
            Edits {
                inserted: 0,
                removed: 3
            }
        );
    }

    #[test]
    fn equal_lists_are_untouched() {
        let source = vec!["a", "b", "c"];
        let mut dest = source.clone();
        assert!(reconcile(&source, &mut dest).is_empty());
        assert_eq!(dest, source);
    }

    #[test]
    fn unrelated_destination_is_resynced() {
        let mut dest = vec![1, 2];
        let edits = reconcile(&[1, 3], &mut dest);
        assert_eq!(dest, vec![1, 3]);
        assert!(!edits.is_empty());
    }

    #[test]
    fn reordered_destination_with_duplicates_is_resynced() {
        let mut dest = vec![5, 3, 3, 9, 1];
        reconcile(&[1, 3, 5], &mut dest);
        assert_eq!(dest, vec![1, 3, 5]);

        let mut dest = vec![4, 2];
        reconcile(&[1, 2, 3, 4], &mut dest);
        assert_eq!(dest, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_to_empty() {
        let mut dest: Vec<u8> = Vec::new();
        assert!(reconcile(&[], &mut dest).is_empty());
    }

    /// Pointer-identity wrapper so tests can observe that survivors are not recreated.
    #[derive(Debug, Clone)]
    struct Handle(Rc<u32>);

    impl PartialEq for Handle {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }
    impl Eq for Handle {}
    impl std::hash::Hash for Handle {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            Rc::as_ptr(&self.0).hash(state);
        }
    }

    fn subsequence(universe: &[u32], mask: &[bool]) -> Vec<u32> {
        universe
            .iter()
            .zip(mask.iter().chain(std::iter::repeat(&false)))
            .filter(|(_, keep)| **keep)
            .map(|(v, _)| *v)
            .collect()
    }

    fn sorted_universe(values: BTreeSet<u32>) -> Vec<u32> {
        values.into_iter().collect()
    }

    proptest! {
        #[test]
        fn prop_idempotent(values in prop::collection::btree_set(any::<u32>(), 0..40)) {
            let source = sorted_universe(values);
            let mut dest = source.clone();
            let edits = reconcile(&source, &mut dest);
            prop_assert!(edits.is_empty());
            prop_assert_eq!(dest, source);
        }

        #[test]
        fn prop_grow_is_correct(
            values in prop::collection::btree_set(any::<u32>(), 0..40),
            mask in prop::collection::vec(any::<bool>(), 0..40),
        ) {
            let source = sorted_universe(values);
            let mut dest = subsequence(&source, &mask);
            let missing = source.len() - dest.len();
            let edits = reconcile(&source, &mut dest);
            prop_assert_eq!(&dest, &source);
            prop_assert_eq!(edits, Edits { inserted: missing, removed: 0 });
        }

        #[test]
        fn prop_shrink_removes_exactly_the_difference(
            values in prop::collection::btree_set(any::<u32>(), 0..40),
            mask in prop::collection::vec(any::<bool>(), 0..40),
        ) {
            let before = sorted_universe(values);
            let source = subsequence(&before, &mask);
            let mut dest = before.clone();
            let edits = reconcile(&source, &mut dest);
            prop_assert_eq!(&dest, &source);
            prop_assert_eq!(edits.removed + edits.inserted, before.len() - source.len());
        }

        #[test]
        fn prop_any_destination_ends_equal(
            values in prop::collection::btree_set(0u32..50, 0..30),
            dest in prop::collection::vec(0u32..50, 0..30),
        ) {
            let source = sorted_universe(values);
            let mut dest = dest;
            reconcile(&source, &mut dest);
            prop_assert_eq!(&dest, &source);
        }

        #[test]
        fn prop_resync_keeps_identity(
            values in prop::collection::btree_set(any::<u32>(), 1..20),
            picks in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
        ) {
            let universe: Vec<Handle> = values.into_iter().map(|v| Handle(Rc::new(v))).collect();
            // arbitrary order, repeats allowed
            let mut dest: Vec<Handle> = picks.iter().map(|i| i.get(&universe).clone()).collect();
            reconcile(&universe, &mut dest);
            prop_assert_eq!(dest.len(), universe.len());
            for (d, u) in dest.iter().zip(&universe) {
                prop_assert!(Rc::ptr_eq(&d.0, &u.0));
            }
        }

        #[test]
        fn prop_survivors_keep_identity(
            values in prop::collection::btree_set(any::<u32>(), 1..30),
            old_mask in prop::collection::vec(any::<bool>(), 0..30),
            new_mask in prop::collection::vec(any::<bool>(), 0..30),
        ) {
            let universe: Vec<Handle> = values.into_iter().map(|v| Handle(Rc::new(v))).collect();
            let pick = |mask: &[bool]| -> Vec<Handle> {
                universe
                    .iter()
                    .zip(mask.iter().chain(std::iter::repeat(&false)))
                    .filter(|(_, keep)| **keep)
                    .map(|(h, _)| h.clone())
                    .collect()
            };

            // Refinement in one direction or the other, as the list produces.
            let old = pick(&old_mask);
            let combined: Vec<bool> = old_mask
                .iter()
                .chain(std::iter::repeat(&false))
                .zip(new_mask.iter().chain(std::iter::repeat(&false)))
                .take(universe.len())
                .map(|(a, b)| *a && *b)
                .collect();
            let narrowed = pick(&combined);

            let mut dest = old.clone();
            reconcile(&narrowed, &mut dest);
            for h in &dest {
                prop_assert!(old.iter().any(|o| Rc::ptr_eq(&o.0, &h.0)));
            }

            reconcile(&old, &mut dest);
            prop_assert_eq!(&dest, &old);
        }
    }
}
