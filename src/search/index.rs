//! Inverted indexes over an emoji dataset.

use crate::dataset::Dataset;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::tokenize::{normalize_key, words};

/// Ascending, duplicate-free list of record positions.
pub(crate) type Postings = Vec<usize>;

/// Which attribute index a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    Category,
    Tag,
    Alias,
}

impl FilterKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Alias => "alias",
        }
    }
}

/// The four lookup tables built from one pass over the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiIndex {
    by_category: AHashMap<String, Postings>,
    by_tag: AHashMap<String, Postings>,
    by_alias: AHashMap<String, Postings>,
    by_word: AHashMap<String, Postings>,
    document_count: usize,
}

impl EmojiIndex {
    /// Scans the dataset once and builds every index.
    pub fn build(dataset: &Dataset) -> Self {
        let start = Instant::now();
        let mut index = Self {
            document_count: dataset.len(),
            ..Self::default()
        };

        for (position, emoji) in dataset.records().iter().enumerate() {
            add(&mut index.by_category, normalize_key(&emoji.category), position);
            for tag in emoji.tags() {
                add(&mut index.by_tag, normalize_key(tag), position);
            }
            for alias in emoji.aliases() {
                add(&mut index.by_alias, normalize_key(alias), position);
            }
            for word in words(&emoji.description) {
                add(&mut index.by_word, word, position);
            }
        }

        tracing::info!(
            "Built emoji index: {} terms, {} documents in {:?}",
            index.term_count(),
            index.document_count(),
            start.elapsed()
        );

        index
    }

    /// Positions filed under `key` in the given attribute index.
    pub fn lookup(&self, kind: FilterKind, key: &str) -> &[usize] {
        self.map(kind)
            .get(&normalize_key(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Positions whose description contains `word` (case-insensitive).
    pub fn lookup_word(&self, word: &str) -> &[usize] {
        self.by_word
            .get(&word.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, kind: FilterKind, key: &str) -> bool {
        self.map(kind).contains_key(&normalize_key(key))
    }

    /// All normalized keys of one attribute index, sorted.
    pub fn keys(&self, kind: FilterKind) -> Vec<&str> {
        let mut keys: Vec<&str> = self.map(kind).keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Number of distinct keys across all four indexes.
    pub fn term_count(&self) -> usize {
        self.by_category.len() + self.by_tag.len() + self.by_alias.len() + self.by_word.len()
    }

    /// Number of records indexed.
    pub const fn document_count(&self) -> usize {
        self.document_count
    }

    const fn map(&self, kind: FilterKind) -> &AHashMap<String, Postings> {
        match kind {
            FilterKind::Category => &self.by_category,
            FilterKind::Tag => &self.by_tag,
            FilterKind::Alias => &self.by_alias,
        }
    }
}

/// Positions are visited in ascending order, so checking the tail keeps postings sorted and unique.
fn add(map: &mut AHashMap<String, Postings>, key: String, position: usize) {
    if key.is_empty() {
        return;
    }
    let postings = map.entry(key).or_default();
    if postings.last() != Some(&position) {
        postings.push(position);
    }
}
