//! Key normalization and description word splitting.

use ahash::AHashSet;

/// Normalizes an index key: trimmed and lowercased.
///
/// Category, tag, alias and word lookups all go through this so matching is
/// case-insensitive on both the indexing and the query side.
pub(crate) fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Splits text into lowercased whitespace-separated words, dropping empty fragments.
///
/// Punctuation is kept: "flag: Japan" yields `["flag:", "japan"]`.
pub(crate) fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// The distinct words of a text.
pub(crate) fn word_set(text: &str) -> AHashSet<String> {
    words(text).into_iter().collect()
}
