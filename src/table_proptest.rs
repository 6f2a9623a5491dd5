#![cfg(test)]

// Property tests for ListTable kept inside the crate so they can evolve
// with the internals without feature gates.

use crate::table::ListTable;
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Lookup(usize),
    LookupMut(usize, i32),
    Remove(usize),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            3 => idx.clone().prop_map(OpI::Lookup),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::LookupMut(i, d)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// The model is a Vec kept in table order: inserts go to the front, so the
// first equal key found from the front is the latest-wins answer and
// `retain` mirrors remove-all-duplicates while preserving survivor order.
type Model = Vec<(String, i32)>;

fn model_lookup<'a>(model: &'a Model, k: &str) -> Option<&'a i32> {
    model.iter().find(|(mk, _)| mk == k).map(|(_, v)| v)
}

// Property: State-machine equivalence against the Vec model. Invariants
// exercised across random operation sequences:
// - Latest-wins lookup for duplicate keys; misses agree with the model.
// - `lookup_mut` mutates exactly the entry `lookup` would return.
// - `remove` deletes all equal-keyed entries, reports the removed count,
//   and preserves survivor order.
// - Iteration yields exactly the model's sequence (head = newest insert).
// - `len`/`is_empty` parity with the model after every op.
// - Over the whole run including the final drop, each removal hook fires
//   exactly once per inserted entry.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let key_hook_calls = Rc::new(Cell::new(0usize));
        let value_hook_calls = Rc::new(Cell::new(0usize));

        let kc = key_hook_calls.clone();
        let vc = value_hook_calls.clone();
        let mut sut: ListTable<String, i32> = ListTable::new()
            .on_key_removed(move |_k| kc.set(kc.get() + 1))
            .on_value_removed(move |_v| vc.set(vc.get() + 1));
        let mut model: Model = Vec::new();
        let mut inserted = 0usize;

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].clone();
                    sut.insert(k.clone(), v);
                    model.insert(0, (k, v));
                    inserted += 1;
                }
                OpI::Lookup(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.lookup(k), model_lookup(&model, k));
                }
                OpI::LookupMut(i, d) => {
                    let k = &pool[i];
                    let got = sut.lookup_mut(k).map(|v| {
                        *v = v.saturating_add(d);
                        *v
                    });
                    let want = model
                        .iter_mut()
                        .find(|(mk, _)| mk == k)
                        .map(|(_, v)| {
                            *v = v.saturating_add(d);
                            *v
                        });
                    prop_assert_eq!(got, want);
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    let before = model.len();
                    model.retain(|(mk, _)| mk != k);
                    let expected = before - model.len();
                    prop_assert_eq!(sut.remove(k), expected);
                }
                OpI::Iterate => {
                    let got: Vec<(String, i32)> =
                        sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    prop_assert_eq!(&got, &model, "iteration must match model order");
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            // Post-conditions after each op
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            // Hooks fire only on removal, and always in key/value pairs.
            prop_assert_eq!(key_hook_calls.get(), value_hook_calls.get());
            prop_assert_eq!(key_hook_calls.get(), inserted - model.len());
        }

        // Drop is the teardown: surviving entries release exactly once.
        drop(sut);
        prop_assert_eq!(key_hook_calls.get(), inserted);
        prop_assert_eq!(value_hook_calls.get(), inserted);
    }
}

// Property: Same state machine under a comparator that is coarser than
// `==` (first byte only). This stresses the comparator-defined equality
// contract: lookup/remove group keys by comparison, not by `Eq`.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_coarse_comparator((pool, ops) in arb_scenario()) {
        fn first_byte(s: &str) -> Option<u8> {
            s.as_bytes().first().copied()
        }
        fn same_group(a: &str, b: &str) -> bool {
            first_byte(a) == first_byte(b)
        }

        let mut sut: ListTable<String, i32> =
            ListTable::with_cmp(|a: &String, b: &String| first_byte(a).cmp(&first_byte(b)));
        let mut model: Model = Vec::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].clone();
                    sut.insert(k.clone(), v);
                    model.insert(0, (k, v));
                }
                OpI::Lookup(i) => {
                    let k = &pool[i];
                    let want = model
                        .iter()
                        .find(|(mk, _)| same_group(mk, k))
                        .map(|(_, v)| v);
                    prop_assert_eq!(sut.lookup(k), want);
                }
                OpI::LookupMut(i, d) => {
                    let k = &pool[i];
                    let got = sut.lookup_mut(k).map(|v| {
                        *v = v.saturating_add(d);
                        *v
                    });
                    let want = model
                        .iter_mut()
                        .find(|(mk, _)| same_group(mk, k))
                        .map(|(_, v)| {
                            *v = v.saturating_add(d);
                            *v
                        });
                    prop_assert_eq!(got, want);
                }
                OpI::Remove(i) => {
                    let k = pool[i].clone();
                    let before = model.len();
                    model.retain(|(mk, _)| !same_group(mk, &k));
                    let expected = before - model.len();
                    prop_assert_eq!(sut.remove(&k), expected);
                }
                OpI::Iterate => {
                    let got: Vec<(String, i32)> =
                        sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    prop_assert_eq!(&got, &model);
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }
    }
}

// Property: DList structural equivalence against VecDeque under random
// front/back pushes and positional removals driven by scans.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_dlist_matches_deque(ops in proptest::collection::vec(
        prop_oneof![
            (any::<bool>(), any::<i32>()).prop_map(|(front, v)| (0u8, front, v)),
            any::<prop::sample::Index>().prop_map(|i| (1u8, false, i.index(64) as i32)),
        ],
        1..80,
    )) {
        use crate::dlist::DList;
        use std::collections::VecDeque;

        let mut sut: DList<i32> = DList::new();
        let mut model: VecDeque<i32> = VecDeque::new();

        for (tag, front, v) in ops {
            match tag {
                0 => {
                    if front {
                        sut.push_front(v);
                        model.push_front(v);
                    } else {
                        sut.push_back(v);
                        model.push_back(v);
                    }
                }
                _ => {
                    // Remove at index (v % len), found by scanning.
                    if !model.is_empty() {
                        let i = (v as usize) % model.len();
                        let mut pos = sut.first();
                        for _ in 0..i {
                            pos = sut.next(pos.unwrap());
                        }
                        let (item, _) = sut.remove(pos.unwrap()).unwrap();
                        let want = model.remove(i).unwrap();
                        prop_assert_eq!(item, want);
                    }
                }
            }

            let got: Vec<i32> = sut.iter().map(|(_, x)| *x).collect();
            let want: Vec<i32> = model.iter().copied().collect();
            prop_assert_eq!(got, want);
            prop_assert_eq!(sut.len(), model.len());
        }
    }
}
