//! Title sanitization for storage keys and filenames.
//!
//! Turns an arbitrary user-supplied group title into a safe, bounded,
//! deterministic identifier fragment. Pure: callers supply the current
//! time where a fallback name is needed.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Maximum length of a sanitized title, in bytes (the output is ASCII).
pub const MAX_SANITIZED_LEN: usize = 50;

/// Prefix applied when a sanitized title collides with a platform-reserved
/// device name.
const RESERVED_PREFIX: &str = "tab_";

/// Sanitizes a raw title into `[a-z0-9_]` form.
///
/// Steps: trim, NFD-decompose and drop combining marks, substitute `_` for
/// everything outside `[a-zA-Z0-9_-]`, collapse separator runs into a single
/// `_`, strip leading/trailing separators, lowercase, truncate to
/// [`MAX_SANITIZED_LEN`], and prefix reserved device names with `tab_`.
///
/// Returns an empty string when nothing representable remains; use
/// [`sanitize_or_fallback`] where the operation must not fail on such input.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_SANITIZED_LEN));
    let mut pending_separator = false;

    for c in raw.trim().nfd().filter(|c| !is_combining_mark(*c)) {
        let mapped = if c.is_ascii_alphanumeric() { Some(c.to_ascii_lowercase()) } else { None };
        match mapped {
            Some(c) => {
                // A run of any mix of separators and disallowed characters
                // collapses into one underscore.
                if pending_separator && !out.is_empty() {
                    out.push('_');
                }
                pending_separator = false;
                out.push(c);
            }
            None => pending_separator = true,
        }
    }

    out.truncate(MAX_SANITIZED_LEN);
    let trimmed = out.trim_matches(|c| c == '_' || c == '-');
    if is_reserved(trimmed) {
        format!("{}{}", RESERVED_PREFIX, trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Like [`sanitize`], but substitutes a generated `unnamed_group_<millis>`
/// name when the title is unrepresentable, so the caller never fails solely
/// because of the title.
pub fn sanitize_or_fallback(raw: &str, now_millis: i64) -> String {
    let sanitized = sanitize(raw);
    if sanitized.is_empty() {
        format!("unnamed_group_{}", now_millis)
    } else {
        sanitized
    }
}

/// Case-insensitive match against the Windows reserved device names
/// (`con`, `prn`, `aux`, `nul`, `com0`–`com9`, `lpt0`–`lpt9`), with or
/// without an extension suffix.
fn is_reserved(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name);
    let stem = stem.to_ascii_lowercase();
    matches!(stem.as_str(), "con" | "prn" | "aux" | "nul")
        || (stem.len() == 4
            && (stem.starts_with("com") || stem.starts_with("lpt"))
            && stem.as_bytes()[3].is_ascii_digit())
}
