use proptest::prelude::*;
use seq_hashmap::SeqHashMap;
use std::collections::HashMap;

// Model random insert/remove/index-or-default sequences against std's
// HashMap plus an order list, through the public API only.
proptest! {
    #[test]
    fn prop_matches_std_and_order(ops in proptest::collection::vec((0u8..=2u8, 0u8..32u8, any::<i16>()), 1..200)) {
        let mut m: SeqHashMap<u8, i16> = SeqHashMap::new();
        let mut model: HashMap<u8, i16> = HashMap::new();
        let mut order: Vec<u8> = Vec::new();

        for (op, k, v) in ops {
            match op {
                0 => {
                    let inserted = m.insert(k, v).is_inserted();
                    prop_assert_eq!(inserted, !model.contains_key(&k));
                    if inserted {
                        model.insert(k, v);
                        order.insert(0, k);
                    }
                }
                1 => {
                    prop_assert_eq!(m.remove(&k), model.remove(&k));
                    order.retain(|&o| o != k);
                }
                2 => {
                    let got = *m.get_or_insert_default(k);
                    if !model.contains_key(&k) {
                        order.insert(0, k);
                    }
                    prop_assert_eq!(got, *model.entry(k).or_default());
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(m.len(), model.len());
            prop_assert!(m.load_factor() <= m.max_load_factor());
            let keys: Vec<u8> = m.keys().copied().collect();
            prop_assert_eq!(&keys, &order);
        }

        for (k, v) in &model {
            prop_assert_eq!(m.at(k), Ok(v));
        }
    }
}
