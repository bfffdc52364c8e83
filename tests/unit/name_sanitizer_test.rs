use rstest::rstest;
use tabstash::services::name_sanitizer::{sanitize, sanitize_or_fallback, MAX_SANITIZED_LEN};

#[rstest]
#[case("My Group!!", "my_group")]
#[case("Work", "work")]
#[case("  spaced  out  ", "spaced_out")]
#[case("already_clean", "already_clean")]
#[case("hyphen-ated", "hyphen_ated")]
#[case("Mixed CASE Title", "mixed_case_title")]
#[case("tabs & bookmarks (2024)", "tabs_bookmarks_2024")]
fn test_sanitize_cases(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(sanitize(raw), expected);
}

#[rstest]
#[case("Café Crème", "cafe_creme")]
#[case("Déjà Vu", "deja_vu")]
#[case("naïve résumé", "naive_resume")]
fn test_diacritics_normalize_to_ascii(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(sanitize(raw), expected);
}

#[rstest]
#[case("con")]
#[case("CON")]
#[case("prn")]
#[case("aux")]
#[case("NUL")]
#[case("com1")]
#[case("lpt9")]
fn test_reserved_names_get_prefixed(#[case] raw: &str) {
    let sanitized = sanitize(raw);
    assert!(
        sanitized.starts_with("tab_"),
        "{:?} should be prefixed, got {:?}",
        raw,
        sanitized
    );
    assert_ne!(sanitized, raw.to_ascii_lowercase());
}

#[test]
fn test_near_reserved_names_pass_through() {
    assert_eq!(sanitize("console"), "console");
    assert_eq!(sanitize("com10"), "com10");
    assert_eq!(sanitize("auxiliary"), "auxiliary");
}

#[test]
fn test_disallowed_only_input_is_empty() {
    assert_eq!(sanitize("!!!"), "");
    assert_eq!(sanitize("___"), "");
    assert_eq!(sanitize("   "), "");
}

#[test]
fn test_fallback_never_empty() {
    let name = sanitize_or_fallback("!!!", 1_700_000_000_000);
    assert_eq!(name, "unnamed_group_1700000000000");

    // Representable titles don't get the fallback
    assert_eq!(sanitize_or_fallback("Work", 1_700_000_000_000), "work");
}

#[test]
fn test_length_is_bounded() {
    let long = "word ".repeat(40);
    let sanitized = sanitize(&long);
    assert!(sanitized.len() <= MAX_SANITIZED_LEN);
    // Truncation must not leave a dangling separator
    assert!(!sanitized.ends_with('_'));
}

#[test]
fn test_sanitize_is_idempotent_on_examples() {
    let long = "x".repeat(120);
    for raw in [
        "My Group!!",
        "Café Crème",
        "con",
        "a-b-c",
        "  lots   of   spaces  ",
        long.as_str(),
    ] {
        let once = sanitize(raw);
        assert_eq!(sanitize(&once), once, "not idempotent for {:?}", raw);
    }
}
