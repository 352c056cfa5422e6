use crate::catalog::Description;
use crate::format::format_description;
use crate::worker::CatalogState;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DescribeRequest {
    /// The emoji glyph to describe, e.g. "🚀"
    pub emoji: String,
}

/// Handles describe requests by rendering the detail card.
///
/// The card shows:
/// - Glyph, description, category, tags and aliases
/// - Related emojis with their relevance scores
/// - Popular emojis (the head of the dataset, minus the selection)
pub async fn handle_describe(
    state: &Arc<CatalogState>,
    request: DescribeRequest,
) -> Result<String, String> {
    let catalog = state.catalog().await;
    let config = state.config();

    let position = catalog
        .position_of(&request.emoji)
        .ok_or_else(|| format!("Emoji '{}' is not in the dataset", request.emoji.trim()))?;
    let emoji = catalog
        .dataset()
        .get(position)
        .ok_or_else(|| format!("Emoji '{}' is not in the dataset", request.emoji.trim()))?;

    let related = state.related(&catalog, position, config.related_limit).await;
    let card = Description {
        emoji,
        related: catalog.resolve_scored(&related),
        popular: catalog.popular(Some(&emoji.emoji), config.popular_limit),
    };

    Ok(format_description(&card))
}
