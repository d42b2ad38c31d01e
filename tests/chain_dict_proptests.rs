// ChainDict property tests over the public API (consolidated).
//
// Property 1: round trip. For any batch of distinct keys, every inserted
//  pair is observable through get, survives an update, and disappears on
//  removal, with len() tracking throughout.
//
// Property 2: band discipline. Whatever interleaving of inserts and
//  removals runs, capacity stays at or above the floor and the load
//  factor stays inside the grow/shrink band (below 0.3 only at the
//  floor).
//
// Property 3: clear always lands in the initial state.
use chain_dict::{ChainDict, FLOOR_CAPACITY};
use proptest::prelude::*;
use std::collections::BTreeMap;

proptest! {
    #[test]
    fn prop_round_trip(entries in proptest::collection::btree_map("[a-z]{1,6}", any::<i32>(), 1..40)) {
        let mut d: ChainDict<String, i32> = ChainDict::new();

        for (k, v) in &entries {
            d.insert(k.clone(), *v).expect("distinct keys insert cleanly");
        }
        prop_assert_eq!(d.len(), entries.len());
        for (k, v) in &entries {
            prop_assert_eq!(d.get(k.as_str()), Ok(v));
        }

        // Update every value; count must not move.
        for (k, v) in &entries {
            let old = d.update(k.as_str(), v.wrapping_add(1)).expect("present");
            prop_assert_eq!(old, *v);
        }
        prop_assert_eq!(d.len(), entries.len());

        // Materialized views agree with iteration.
        let iterated: BTreeMap<String, i32> = d.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let expected: BTreeMap<String, i32> =
            entries.iter().map(|(k, v)| (k.clone(), v.wrapping_add(1))).collect();
        prop_assert_eq!(&iterated, &expected);
        prop_assert_eq!(d.keys_to_vec().len(), entries.len());

        // Remove everything; each removal is observed exactly once.
        for (k, v) in &entries {
            prop_assert_eq!(d.remove(k.as_str()), Ok(Some(v.wrapping_add(1))));
            prop_assert!(!d.contains_key(k.as_str()));
        }
        prop_assert!(d.is_empty());
    }
}

proptest! {
    #[test]
    fn prop_band_discipline(ops in proptest::collection::vec((any::<bool>(), 0u16..200), 1..300)) {
        let mut d: ChainDict<u16, u16> = ChainDict::new();

        for (is_insert, k) in ops {
            if is_insert {
                let _ = d.set(k, k);
            } else {
                let _ = d.remove(&k).expect("concrete key");
            }

            let (len, cap) = (d.len(), d.capacity());
            prop_assert!(cap >= FLOOR_CAPACITY);
            prop_assert!(len * 10 <= cap * 7, "load {}/{} above 0.7", len, cap);
            prop_assert!(
                cap == FLOOR_CAPACITY || len * 10 >= cap * 3,
                "load {}/{} below 0.3 away from the floor", len, cap
            );
        }
    }
}

proptest! {
    #[test]
    fn prop_clear_resets(keys in proptest::collection::btree_set(any::<u32>(), 0..120)) {
        let mut d: ChainDict<u32, u32> = ChainDict::new();
        for k in keys {
            d.insert(k, k).unwrap();
        }

        d.clear();
        prop_assert_eq!(d.len(), 0);
        prop_assert_eq!(d.capacity(), FLOOR_CAPACITY);
        prop_assert_eq!(d.iter().count(), 0);
    }
}
