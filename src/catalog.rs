//! A dataset bundled with its indexes.

use crate::dataset::{Dataset, Emoji};
use crate::search::{
    self, EmojiIndex, FilterKind, Query, ScoredMatch, Suggestion, popular, related,
};
use serde::{Deserialize, Serialize};

/// Maximum number of "did you mean" suggestions per unknown filter value.
const MAX_SUGGESTIONS: usize = 5;

/// Immutable, queryable emoji collection. Reloading builds a new catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    dataset: Dataset,
    index: EmojiIndex,
}

/// Everything a detail panel shows for one emoji.
#[derive(Debug, Clone, Serialize)]
pub struct Description<'a> {
    pub emoji: &'a Emoji,
    #[serde(serialize_with = "serialize_scored")]
    pub related: Vec<(&'a Emoji, f32)>,
    pub popular: Vec<&'a Emoji>,
}

/// An emoji paired with its relevance score, flattened for JSON output.
#[derive(Debug, Serialize)]
pub struct ScoredEmoji<'a> {
    #[serde(flatten)]
    pub emoji: &'a Emoji,
    pub score: f32,
}

impl<'a> From<&(&'a Emoji, f32)> for ScoredEmoji<'a> {
    fn from(&(emoji, score): &(&'a Emoji, f32)) -> Self {
        Self { emoji, score }
    }
}

fn serialize_scored<S: serde::Serializer>(
    related: &[(&Emoji, f32)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(related.iter().map(ScoredEmoji::from))
}

/// Values to populate the category, tag and alias pickers with.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOptions<'a> {
    pub categories: Vec<&'a str>,
    pub tags: Vec<&'a str>,
    pub aliases: Vec<&'a str>,
}

impl Catalog {
    /// Indexes `dataset`.
    pub fn new(dataset: Dataset) -> Self {
        let index = EmojiIndex::build(&dataset);
        Self { dataset, index }
    }

    pub fn builtin() -> Self {
        Self::new(Dataset::builtin())
    }

    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub const fn index(&self) -> &EmojiIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Matching positions in ascending order.
    pub fn search_positions(&self, query: &Query) -> Vec<usize> {
        search::execute(&self.index, &self.dataset, query)
    }

    /// Matching records in dataset order, at most `limit`.
    pub fn search(&self, query: &Query, limit: usize) -> Vec<&Emoji> {
        self.search_positions(query)
            .into_iter()
            .take(limit)
            .filter_map(|pos| self.dataset.get(pos))
            .collect()
    }

    pub fn find(&self, glyph: &str) -> Option<&Emoji> {
        self.dataset.find_by_glyph(glyph)
    }

    pub fn position_of(&self, glyph: &str) -> Option<usize> {
        self.dataset.position_of(glyph)
    }

    /// Scored related positions for the record at `position`.
    pub fn related_positions(&self, position: usize, limit: usize) -> Vec<ScoredMatch> {
        related(&self.index, &self.dataset, position, limit)
    }

    /// Related records for `glyph`, best first. `None` when the glyph is unknown.
    pub fn related(&self, glyph: &str, limit: usize) -> Option<Vec<(&Emoji, f32)>> {
        let position = self.position_of(glyph)?;
        Some(self.resolve_scored(&self.related_positions(position, limit)))
    }

    /// Maps scored positions back to records.
    pub fn resolve_scored(&self, matches: &[ScoredMatch]) -> Vec<(&Emoji, f32)> {
        matches
            .iter()
            .filter_map(|m| self.dataset.get(m.position).map(|e| (e, m.score)))
            .collect()
    }

    /// The first `limit` records, skipping `selected`.
    pub fn popular(&self, selected: Option<&str>, limit: usize) -> Vec<&Emoji> {
        popular(&self.dataset, selected, limit)
            .into_iter()
            .filter_map(|pos| self.dataset.get(pos))
            .collect()
    }

    /// Detail card data for `glyph`.
    pub fn describe(
        &self,
        glyph: &str,
        related_limit: usize,
        popular_limit: usize,
    ) -> Option<Description<'_>> {
        let position = self.position_of(glyph)?;
        let emoji = self.dataset.get(position)?;
        Some(Description {
            emoji,
            related: self.resolve_scored(&self.related_positions(position, related_limit)),
            popular: self.popular(Some(&emoji.emoji), popular_limit),
        })
    }

    pub fn filter_options(&self) -> FilterOptions<'_> {
        FilterOptions {
            categories: self.dataset.categories(),
            tags: self.dataset.tags(),
            aliases: self.dataset.aliases(),
        }
    }

    /// Whether `value` names a known key of `kind`.
    pub fn knows(&self, kind: FilterKind, value: &str) -> bool {
        self.index.contains(kind, value)
    }

    /// Known keys resembling an unknown `value`.
    pub fn suggest(&self, kind: FilterKind, value: &str) -> Vec<Suggestion> {
        search::suggest(&self.index, kind, value, MAX_SUGGESTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_builtin_catalog_search() {
        let catalog = Catalog::builtin();
        let results = catalog.search(&Query::text("face").with_category("Animals & Nature"), 10);
        let glyphs: Vec<&str> = results.iter().map(|e| e.emoji.as_str()).collect();
        check!(glyphs == vec!["🐶", "🐱"]);
    }

    #[test]
    fn test_search_limit() {
        let catalog = Catalog::builtin();
        check!(catalog.search(&Query::default(), 5).len() == 5);
    }

    #[test]
    fn test_describe() {
        let catalog = Catalog::builtin();
        let_assert!(Some(card) = catalog.describe("🐶", 12, 8));
        check!(card.emoji.description == "dog face");
        check!(card.related.first().map(|(e, _)| e.emoji.as_str()) == Some("🐱"));
        check!(card.popular.len() == 8);
        check!(card.popular.iter().all(|e| e.emoji != "🐶"));
    }

    #[test]
    fn test_unknown_glyph() {
        let catalog = Catalog::builtin();
        check!(catalog.describe("🦀", 12, 8).is_none());
        check!(catalog.related("🦀", 12).is_none());
    }

    #[test]
    fn test_knows_and_suggest() {
        let catalog = Catalog::builtin();
        check!(catalog.knows(FilterKind::Tag, "Food"));
        check!(!catalog.knows(FilterKind::Tag, "fod"));
        check!(catalog.suggest(FilterKind::Tag, "fod").iter().any(|s| s.key == "food"));
    }
}
