//! Query evaluation over the inverted indexes.
//!
//! Every active constraint produces a position set; the result is their
//! intersection in ascending position order. Free text is either looked up in
//! the description-word index (union over words) or matched by substring scan.

use crate::dataset::Dataset;
use ahash::AHashSet;
use rapidfuzz::distance::jaro_winkler;
use serde::{Deserialize, Serialize};

use super::index::{EmojiIndex, FilterKind};
use super::tokenize::{normalize_key, words};

/// Minimum Jaro-Winkler similarity for a key to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// How free text is matched against records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Whole-word lookup in the description index.
    #[default]
    Indexed,
    /// Case-insensitive substring scan over description, category, tags and aliases.
    Substring,
}

/// A search request: free text plus optional attribute filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub alias: Option<String>,
    pub mode: SearchMode,
}

impl Query {
    /// A free-text query with no filters.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub const fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Active attribute filters, in evaluation order (category, tag, alias).
    pub fn filters(&self) -> impl Iterator<Item = (FilterKind, &str)> {
        [
            (FilterKind::Category, self.category.as_deref()),
            (FilterKind::Tag, self.tag.as_deref()),
            (FilterKind::Alias, self.alias.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (kind, v))
        })
    }

    /// Trimmed free text, if any.
    pub fn active_text(&self) -> Option<&str> {
        Some(self.text.trim()).filter(|t| !t.is_empty())
    }

    /// True when neither text nor any filter is set.
    pub fn is_empty(&self) -> bool {
        self.active_text().is_none() && self.filters().next().is_none()
    }
}

/// Evaluates a query, returning matching positions in ascending order.
pub fn execute(index: &EmojiIndex, dataset: &Dataset, query: &Query) -> Vec<usize> {
    if query.is_empty() {
        return (0..dataset.len()).collect();
    }

    let mut result: Option<Vec<usize>> = None;

    for (kind, value) in query.filters() {
        let matches = index.lookup(kind, value);
        result = Some(match result {
            None => matches.to_vec(),
            Some(current) => intersect_sorted(&current, matches),
        });
        if result.as_ref().is_some_and(Vec::is_empty) {
            tracing::debug!("Filter {}={:?} emptied the result", kind.label(), value);
            return vec![];
        }
    }

    if let Some(text) = query.active_text() {
        let matches = match query.mode {
            SearchMode::Indexed => word_union(index, text),
            SearchMode::Substring => substring_matches(dataset, text),
        };
        result = Some(match result {
            None => matches,
            Some(current) => intersect_sorted(&current, &matches),
        });
    }

    result.unwrap_or_default()
}

/// Union of the description-word postings for every word of `text`.
fn word_union(index: &EmojiIndex, text: &str) -> Vec<usize> {
    let mut seen = AHashSet::new();
    let mut positions: Vec<usize> = words(text)
        .iter()
        .flat_map(|word| index.lookup_word(word).iter().copied())
        .filter(|pos| seen.insert(*pos))
        .collect();
    positions.sort_unstable();
    positions
}

/// Linear scan matching `text` as a substring of any searchable field.
pub fn substring_matches(dataset: &Dataset, text: &str) -> Vec<usize> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return (0..dataset.len()).collect();
    }

    let contains = |field: &str| field.to_lowercase().contains(&needle);

    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, emoji)| {
            contains(&emoji.description)
                || contains(&emoji.category)
                || emoji.tags().iter().any(|t| contains(t))
                || emoji.aliases().iter().any(|a| contains(a))
        })
        .map(|(pos, _)| pos)
        .collect()
}

/// Intersection of two ascending position lists.
pub(crate) fn intersect_sorted(left: &[usize], right: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(left[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// A known key that resembles an unknown filter value.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub key: String,
    pub score: f64,
}

/// Known keys of `kind` similar to `value`, best first.
pub fn suggest(index: &EmojiIndex, kind: FilterKind, value: &str, limit: usize) -> Vec<Suggestion> {
    let value = normalize_key(value);
    if value.is_empty() {
        return vec![];
    }

    let mut suggestions: Vec<Suggestion> = index
        .keys(kind)
        .into_iter()
        .filter(|key| *key != value)
        .map(|key| Suggestion {
            key: key.to_string(),
            score: jaro_winkler::similarity(value.chars(), key.chars()),
        })
        .filter(|s| s.score > SUGGESTION_THRESHOLD)
        .collect();

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.key.cmp(&b.key)));
    suggestions.truncate(limit);
    suggestions
}
