//! Property-based tests for merge additivity.
//!
//! Saved history only grows: merging the same capture any number of times
//! produces distinct, never-colliding keys, and no prior entry is ever
//! overwritten in place.

use std::sync::Arc;

use proptest::prelude::*;

use tabstash::database::Database;
use tabstash::managers::group_store::{GroupStore, GroupStoreTrait};
use tabstash::types::group::{Group, GroupMap};
use tabstash::types::tab::Tab;

fn arb_capture() -> impl Strategy<Value = GroupMap> {
    proptest::collection::vec(
        (
            "[A-Za-z][A-Za-z0-9 ]{0,20}",
            "https?://[a-z]{3,10}\\.[a-z]{2,4}",
        ),
        1..=4,
    )
    .prop_map(|entries| {
        let mut map = GroupMap::new();
        for (i, (title, url)) in entries.into_iter().enumerate() {
            map.insert(
                i.to_string(),
                Group::live(&title, vec![Tab::new(&url, None, None)]),
            );
        }
        map
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn repeated_merges_are_additive(capture in arb_capture(), repeats in 2usize..=4) {
        let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
        let store = GroupStore::new(db);

        let mut all_inserted = Vec::new();
        for _ in 0..repeats {
            let outcome = store.merge(&capture).expect("merge should succeed");
            prop_assert_eq!(outcome.inserted.len(), capture.len());
            all_inserted.extend(outcome.inserted);
        }

        // Every merge minted fresh keys; nothing collided or was replaced.
        let mut unique = all_inserted.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), all_inserted.len());
        prop_assert_eq!(store.get_all().unwrap().len(), capture.len() * repeats);
    }

    #[test]
    fn merge_stamps_saved_at_on_every_entry(capture in arb_capture()) {
        let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
        let store = GroupStore::new(db);

        let outcome = store.merge(&capture).expect("merge should succeed");
        for key in &outcome.inserted {
            prop_assert!(outcome.groups[key].saved_at.is_some());
        }
    }
}
