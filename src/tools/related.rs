use crate::format::format_related;
use crate::worker::CatalogState;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RelatedRequest {
    /// The emoji glyph to find relatives of, e.g. "🐶"
    pub emoji: String,
    /// Maximum number of related emojis (default: configured related limit)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Rank emojis sharing tags, category or description words with the given one.
pub async fn handle_related(
    state: &Arc<CatalogState>,
    request: RelatedRequest,
) -> Result<String, String> {
    let catalog = state.catalog().await;
    let position = catalog
        .position_of(&request.emoji)
        .ok_or_else(|| format!("Emoji '{}' is not in the dataset", request.emoji.trim()))?;
    let selected = catalog
        .dataset()
        .get(position)
        .ok_or_else(|| format!("Emoji '{}' is not in the dataset", request.emoji.trim()))?;

    let limit = request
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(state.config().related_limit);
    let matches = state.related(&catalog, position, limit).await;

    Ok(format_related(selected, &catalog.resolve_scored(&matches)))
}
