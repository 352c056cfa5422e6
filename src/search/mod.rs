//! In-memory emoji search.
//!
//! This module provides the inverted indexes (category, tag, alias, description
//! word), query evaluation by set intersection, and relevance scoring for
//! related-emoji suggestions.

// Module declarations
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod scoring;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{EmojiIndex, FilterKind};
pub use query::{Query, SearchMode, Suggestion, execute, substring_matches, suggest};
pub use scoring::{ScoredMatch, popular, related, relevance};
