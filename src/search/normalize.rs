//! Text normalization for accent- and case-insensitive comparison
//!
//! `normalize` lowercases, applies canonical decomposition (NFD) and drops
//! every nonspacing mark (general category `Mn`). All Unicode table lookups
//! live in this module.

use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

/// Whether `c` is a nonspacing mark (`Mn`), e.g. U+0301 COMBINING ACUTE ACCENT
pub fn is_nonspacing_mark(c: char) -> bool {
    get_general_category(c) == GeneralCategory::NonspacingMark
}

/// Convert `text` to its comparison form.
///
/// ```text
/// normalize("LOGÍSTICA") == "logistica"
/// normalize("Ñandú")     == "nandu"
/// ```
///
/// Apply it to both haystack and needle; matching a normalized haystack
/// against a raw needle silently loses accent-insensitivity.
pub fn normalize(text: &str) -> String {
    // Fast path: lowercase ASCII never decomposes
    if text.is_ascii() {
        return text.to_ascii_lowercase();
    }

    text.to_lowercase()
        .nfd()
        .filter(|c| !is_nonspacing_mark(*c))
        .collect()
}
