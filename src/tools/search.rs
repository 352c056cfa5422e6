//! Indexed emoji search handler.

use crate::format::{format_no_results, format_search_results};
use crate::search::{FilterKind, Query, SearchMode};
use crate::worker::CatalogState;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Free text matched against description words, e.g. "smiling face"
    #[serde(default)]
    pub query: Option<String>,
    /// Only emojis in this category, e.g. "Food & Drink"
    #[serde(default)]
    pub category: Option<String>,
    /// Only emojis carrying this tag
    #[serde(default)]
    pub tag: Option<String>,
    /// Only emojis with this alias
    #[serde(default)]
    pub alias: Option<String>,
    /// Match partial words in descriptions, categories, tags and aliases instead of whole words
    #[serde(default)]
    pub substring: bool,
    /// Maximum number of results to return (default: configured grid limit)
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn to_query(&self) -> Query {
        Query {
            text: self.query.clone().unwrap_or_default(),
            category: self.category.clone(),
            tag: self.tag.clone(),
            alias: self.alias.clone(),
            mode: if self.substring {
                SearchMode::Substring
            } else {
                SearchMode::Indexed
            },
        }
    }
}

/// Execute a search against the current catalog.
pub async fn handle_search(
    state: &Arc<CatalogState>,
    request: SearchRequest,
) -> Result<String, String> {
    let catalog = state.catalog().await;
    let query = request.to_query();
    let limit = request
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(state.config().grid_limit);

    let positions = catalog.search_positions(&query);
    tracing::debug!(
        "Search {:?} matched {} of {} emojis",
        query,
        positions.len(),
        catalog.len()
    );

    if positions.is_empty() {
        let hints: Vec<(FilterKind, String, _)> = query
            .filters()
            .filter(|(kind, value)| !catalog.knows(*kind, value))
            .map(|(kind, value)| (kind, value.to_string(), catalog.suggest(kind, value)))
            .collect();
        return Ok(format_no_results(&query, &hints));
    }

    let results: Vec<_> = positions
        .iter()
        .take(limit)
        .filter_map(|pos| catalog.dataset().get(*pos))
        .collect();

    Ok(format_search_results(&query, &results, positions.len()))
}
