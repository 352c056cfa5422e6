//! Relevance scoring for "related emoji" suggestions.
//!
//! A candidate earns:
//! - 2.0 per tag it shares with the selected emoji
//! - 1.0 when it is in the same category
//! - 0.5 per distinct description word both share

use crate::dataset::{Dataset, Emoji};
use ahash::AHashSet;

use super::index::{EmojiIndex, FilterKind};
use super::tokenize::{normalize_key, word_set};

const SHARED_TAG_WEIGHT: f32 = 2.0;
const SAME_CATEGORY_WEIGHT: f32 = 1.0;
const SHARED_WORD_WEIGHT: f32 = 0.5;

/// A related record and its score against the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch {
    pub position: usize,
    pub score: f32,
}

/// Similarity of `candidate` to `selected`.
///
/// Tags are counted from the candidate's side, so a tag the candidate lists twice
/// counts twice. Tags and categories are compared the way the index keys them
/// (trimmed, case-insensitive).
pub fn relevance(candidate: &Emoji, selected: &Emoji) -> f32 {
    let selected_tags: AHashSet<String> =
        selected.tags().iter().map(|t| normalize_key(t)).collect();
    let shared_tags = candidate
        .tags()
        .iter()
        .filter(|t| selected_tags.contains(&normalize_key(t)))
        .count();

    let same_category = normalize_key(&candidate.category) == normalize_key(&selected.category);

    let candidate_words = word_set(&candidate.description);
    let selected_words = word_set(&selected.description);
    let shared_words = candidate_words.intersection(&selected_words).count();

    let mut score = shared_tags as f32 * SHARED_TAG_WEIGHT;
    if same_category {
        score += SAME_CATEGORY_WEIGHT;
    }
    score + shared_words as f32 * SHARED_WORD_WEIGHT
}

/// Records related to the one at `selected`, best first, at most `limit`.
///
/// Candidates are records sharing a tag (visited tag by tag) or the category of
/// the selection. Records with the same glyph as the selection are excluded.
/// Equal scores keep their visiting order.
pub fn related(
    index: &EmojiIndex,
    dataset: &Dataset,
    selected: usize,
    limit: usize,
) -> Vec<ScoredMatch> {
    let Some(selected_emoji) = dataset.get(selected) else {
        return vec![];
    };

    let mut seen = AHashSet::new();
    let mut candidates = Vec::new();
    let tag_hits = selected_emoji
        .tags()
        .iter()
        .flat_map(|tag| index.lookup(FilterKind::Tag, tag).iter().copied());
    let category_hits = index
        .lookup(FilterKind::Category, &selected_emoji.category)
        .iter()
        .copied();

    for position in tag_hits.chain(category_hits) {
        if !seen.insert(position) {
            continue;
        }
        let Some(candidate) = dataset.get(position) else {
            continue;
        };
        if candidate.emoji == selected_emoji.emoji {
            continue;
        }
        candidates.push(ScoredMatch {
            position,
            score: relevance(candidate, selected_emoji),
        });
    }

    // sort_by is stable
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(limit);
    candidates
}

/// The first `limit` records of the dataset, skipping the selected glyph.
pub fn popular(dataset: &Dataset, selected: Option<&str>, limit: usize) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, e)| selected != Some(e.emoji.as_str()))
        .map(|(pos, _)| pos)
        .take(limit)
        .collect()
}
