//! Emoji records and dataset loading.

use crate::error::LoadError;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Dataset compiled into the binary, used when no dataset path is configured.
const BUILTIN_DATASET: &str = include_str!("../data/emojis.json");

/// A single emoji with the metadata used for lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    /// The glyph itself, e.g. "🚀"
    pub emoji: String,
    /// Human-readable name, e.g. "rocket"
    pub description: String,
    /// Group label, e.g. "Travel & Places"
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
}

impl Emoji {
    /// Tags, or an empty slice when the record has none.
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Aliases, or an empty slice when the record has none.
    pub fn aliases(&self) -> &[String] {
        self.aliases.as_deref().unwrap_or_default()
    }
}

/// Ordered list of emoji records. A record's position is its identity in every index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Emoji>,
}

impl Dataset {
    pub fn new(records: Vec<Emoji>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of emoji records.
    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        serde_json::from_slice(bytes)
            .map(Self::new)
            .map_err(|source| LoadError::Parse { path: None, source })
    }

    /// Read and parse a dataset file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let bytes = read_source(path)?;
        serde_json::from_slice(&bytes)
            .map(Self::new)
            .map_err(|source| LoadError::Parse {
                path: Some(path.to_path_buf()),
                source,
            })
    }

    /// The dataset embedded at build time.
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_DATASET.as_bytes()) {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::error!("Embedded emoji dataset is invalid: {}", e);
                Self::default()
            }
        }
    }

    pub fn records(&self) -> &[Emoji] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&Emoji> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of the first record whose glyph equals `glyph`.
    pub fn position_of(&self, glyph: &str) -> Option<usize> {
        let glyph = glyph.trim();
        self.records.iter().position(|e| e.emoji == glyph)
    }

    /// First record whose glyph equals `glyph`.
    pub fn find_by_glyph(&self, glyph: &str) -> Option<&Emoji> {
        self.position_of(glyph).and_then(|pos| self.get(pos))
    }

    /// Unique categories in first-occurrence order.
    pub fn categories(&self) -> Vec<&str> {
        unique_in_order(self.records.iter().map(|e| e.category.as_str()))
    }

    /// Unique tags in first-occurrence order.
    pub fn tags(&self) -> Vec<&str> {
        unique_in_order(
            self.records
                .iter()
                .flat_map(|e| e.tags().iter().map(String::as_str)),
        )
    }

    /// Unique aliases in first-occurrence order.
    pub fn aliases(&self) -> Vec<&str> {
        unique_in_order(
            self.records
                .iter()
                .flat_map(|e| e.aliases().iter().map(String::as_str)),
        )
    }
}

/// Read the raw bytes of a dataset file, mapping a missing file to [`LoadError::NotFound`].
pub(crate) fn read_source(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = AHashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    const SAMPLE: &str = r#"[
        {"emoji": "🐶", "description": "dog face", "category": "Animals", "tags": ["pet"], "aliases": ["dog"]},
        {"emoji": "🐱", "description": "cat face", "category": "Animals", "tags": ["pet", "cute"]},
        {"emoji": "🍕", "description": "pizza", "category": "Food", "tags": null}
    ]"#;

    #[test]
    fn test_optional_lists_default_to_empty() {
        let dataset = Dataset::from_json(SAMPLE.as_bytes()).unwrap();
        check!(dataset.len() == 3);
        check!(dataset.get(1).unwrap().aliases().is_empty());
        check!(dataset.get(2).unwrap().tags().is_empty());
    }

    #[test]
    fn test_unique_values_keep_first_occurrence_order() {
        let dataset = Dataset::from_json(SAMPLE.as_bytes()).unwrap();
        check!(dataset.categories() == vec!["Animals", "Food"]);
        check!(dataset.tags() == vec!["pet", "cute"]);
        check!(dataset.aliases() == vec!["dog"]);
    }

    #[test]
    fn test_find_by_glyph() {
        let dataset = Dataset::from_json(SAMPLE.as_bytes()).unwrap();
        check!(dataset.position_of("🍕") == Some(2));
        check!(dataset.find_by_glyph(" 🐱 ").map(|e| e.description.as_str()) == Some("cat face"));
        check!(dataset.find_by_glyph("🚀").is_none());
    }

    #[test]
    fn test_empty_array_is_valid() {
        let dataset = Dataset::from_json(b"[]").unwrap();
        check!(dataset.is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let_assert!(Err(LoadError::Parse { path: None, .. }) = Dataset::from_json(b"{not json"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let_assert!(Err(LoadError::NotFound { path }) = Dataset::load(&missing));
        check!(path == missing);
    }

    #[test]
    fn test_builtin_dataset_parses() {
        let dataset = Dataset::builtin();
        check!(!dataset.is_empty());
        check!(dataset.find_by_glyph("🚀").is_some());
    }
}
