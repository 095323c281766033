#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can observe
// tombstone bookkeeping alongside the public surface.

use crate::hash_table::HashTable;
use crate::prime::is_prime;
use crate::test_support::init_logger;
use hashbrown::HashMap;
use proptest::prelude::*;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, String),
    Delete(usize),
    Search(usize),
    Contains(String),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=120).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), "[a-z0-9]{0,4}").prop_map(|(i, v)| OpI::Insert(i, v)),
            3 => idx.clone().prop_map(OpI::Delete),
            2 => idx.clone().prop_map(OpI::Search),
            1 => "[a-z]{0,5}".prop_map(OpI::Contains),
        ];
        proptest::collection::vec(op, 1..400).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: State-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences:
// - `insert` returns the replaced value exactly when the model had the key.
// - `delete` returns the removed value and absent keys do not change `len`.
// - `search`/`contains_key` parity with the model, across tombstones and resizes.
// - The bucket count is prime, never below 53, and live plus deleted slots
//   stay within the 70% load bound after every step.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        init_logger();
        let mut sut = HashTable::new();
        let mut model: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].clone();
                    let prev = sut.insert(k.clone(), v.clone());
                    prop_assert_eq!(prev, model.insert(k, v));
                }
                OpI::Delete(i) => {
                    let removed = sut.delete(&pool[i]);
                    prop_assert_eq!(removed, model.remove(&pool[i]));
                }
                OpI::Search(i) => {
                    let got = sut.search(&pool[i]);
                    prop_assert_eq!(got, model.get(&pool[i]).map(String::as_str));
                }
                OpI::Contains(k) => {
                    prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert!(is_prime(sut.capacity()));
            prop_assert!(sut.capacity() >= 53);
            prop_assert!(sut.load_percent() <= 70);
            prop_assert!((sut.len() + sut.tombstones()) * 100 / sut.capacity() <= 70);
        }

        for (k, v) in model.iter() {
            prop_assert_eq!(sut.search(k), Some(v.as_str()));
        }
    }
}

// Property: inserting many distinct keys forces several grow steps and every
// key remains retrievable with its own value.
proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]
    #[test]
    fn prop_resize_preserves_contents(keys in proptest::collection::hash_set("[a-zA-Z0-9]{1,8}", 200..600)) {
        let mut sut = HashTable::new();
        let mut generations = 0;
        let mut last_capacity = sut.capacity();
        for k in keys.iter() {
            sut.insert(k.as_str(), k.to_uppercase());
            if sut.capacity() != last_capacity {
                prop_assert!(is_prime(sut.capacity()));
                prop_assert!(sut.capacity() > last_capacity);
                last_capacity = sut.capacity();
                generations += 1;
            }
        }
        prop_assert!(generations >= 2);
        prop_assert_eq!(sut.len(), keys.len());
        for k in keys.iter() {
            let expected = k.to_uppercase();
            prop_assert_eq!(sut.search(k), Some(expected.as_str()));
        }
    }
}
