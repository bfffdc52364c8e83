//! Property-based tests for archive pack/unpack round-trips.
//!
//! For any non-empty mapping of valid saved groups, `unpack(pack(g))`
//! yields a mapping equal to `g`, with every `savedAt` preserved.

use proptest::prelude::*;

use tabstash::services::archive_codec::{pack, parse_groups, unpack};
use tabstash::types::group::{Group, GroupMap};
use tabstash::types::tab::Tab;

fn arb_tab() -> impl Strategy<Value = Tab> {
    (
        "https?://[a-z]{3,12}\\.[a-z]{2,4}/[a-z0-9/_-]{0,20}",
        "[A-Za-z0-9 ]{1,30}",
    )
        .prop_map(|(url, title)| Tab::new(&url, Some(&title), None))
}

fn arb_group() -> impl Strategy<Value = Group> {
    (
        "[a-z][a-z0-9_]{0,20}",
        proptest::collection::vec(arb_tab(), 1..=4),
        1_000_000_000_000i64..2_000_000_000_000i64,
    )
        .prop_map(|(title, tabs, saved_at)| Group::saved(&title, tabs, saved_at))
}

fn arb_group_map() -> impl Strategy<Value = GroupMap> {
    proptest::collection::btree_map("[a-z0-9_]{1,24}", arb_group(), 1..=5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn pack_unpack_roundtrip(groups in arb_group_map()) {
        let bytes = pack(&groups).expect("pack should succeed for valid groups");
        // The stamp time must never touch groups that already carry savedAt.
        let unpacked = unpack(&bytes, i64::MAX).expect("unpack should succeed");
        prop_assert_eq!(unpacked, groups);
    }

    #[test]
    fn bare_json_roundtrip(groups in arb_group_map()) {
        let json = serde_json::to_vec(&groups).expect("serialize");
        let parsed = parse_groups(&json, i64::MAX).expect("parse");
        prop_assert_eq!(parsed, groups);
    }

    #[test]
    fn unpack_stamps_only_missing_saved_at(groups in arb_group_map(), stamp in 0i64..i64::MAX) {
        // Strip savedAt from every entry before packing.
        let mut live = groups.clone();
        for group in live.values_mut() {
            group.saved_at = None;
        }
        let bytes = pack(&live).expect("pack");
        let unpacked = unpack(&bytes, stamp).expect("unpack");
        for (key, group) in &unpacked {
            prop_assert_eq!(group.saved_at, Some(stamp), "entry {} not stamped", key);
        }
    }
}
