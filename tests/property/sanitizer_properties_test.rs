//! Property-based tests for title sanitization.
//!
//! For any input: sanitizing twice equals sanitizing once, the output stays
//! within the safe character set and length bound, and the fallback form is
//! never empty.

use proptest::prelude::*;

use tabstash::services::name_sanitizer::{sanitize, sanitize_or_fallback, MAX_SANITIZED_LEN};

// "tab_" may be prefixed onto an already-bounded name.
const MAX_WITH_RESERVED_PREFIX: usize = MAX_SANITIZED_LEN + 4;

proptest! {
    #[test]
    fn sanitize_is_idempotent(raw in any::<String>()) {
        let once = sanitize(&raw);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitize_output_charset_is_safe(raw in any::<String>()) {
        let sanitized = sanitize(&raw);
        prop_assert!(
            sanitized.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            "unsafe character in {:?}",
            sanitized
        );
    }

    #[test]
    fn sanitize_output_is_bounded(raw in any::<String>()) {
        prop_assert!(sanitize(&raw).len() <= MAX_WITH_RESERVED_PREFIX);
    }

    #[test]
    fn sanitize_never_leaves_dangling_separators(raw in any::<String>()) {
        let sanitized = sanitize(&raw);
        prop_assert!(!sanitized.starts_with('_'));
        prop_assert!(!sanitized.ends_with('_'));
        prop_assert!(!sanitized.contains("__"));
    }

    #[test]
    fn fallback_is_never_empty(raw in any::<String>(), now in 0i64..=i64::MAX) {
        prop_assert!(!sanitize_or_fallback(&raw, now).is_empty());
    }

    #[test]
    fn purely_symbolic_titles_still_get_a_name(raw in "[!@#$%^&*()+=\\[\\]{};:'\",.<>/?|`~ ]{1,40}") {
        // Only disallowed characters: sanitize comes back empty, the
        // fallback still names the group.
        prop_assert_eq!(sanitize(&raw), "");
        prop_assert!(!sanitize_or_fallback(&raw, 1_700_000_000_000).is_empty());
    }

    #[test]
    fn reserved_device_names_are_never_returned_bare(
        stem in prop::sample::select(vec!["con", "prn", "aux", "nul", "com1", "com9", "lpt0", "lpt5"]),
    ) {
        let sanitized = sanitize(stem);
        prop_assert_ne!(sanitized.as_str(), stem);
        prop_assert!(sanitized.starts_with("tab_"));
    }
}
