use crate::format::format_filter_options;
use crate::search::FilterKind;
use crate::worker::CatalogState;
use rmcp::schemars;
use serde::Deserialize;
use std::sync::Arc;

/// Which picker values to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterListKind {
    Categories,
    Tags,
    Aliases,
}

impl From<FilterListKind> for FilterKind {
    fn from(kind: FilterListKind) -> Self {
        match kind {
            FilterListKind::Categories => Self::Category,
            FilterListKind::Tags => Self::Tag,
            FilterListKind::Aliases => Self::Alias,
        }
    }
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListFiltersRequest {
    /// Only list this kind of value. If omitted, lists categories, tags and aliases.
    #[serde(default)]
    pub kind: Option<FilterListKind>,
}

/// List the distinct categories, tags and aliases in dataset order.
pub async fn handle_list_filters(
    state: &Arc<CatalogState>,
    request: ListFiltersRequest,
) -> Result<String, String> {
    let catalog = state.catalog().await;
    let options = catalog.filter_options();
    Ok(format_filter_options(&options, request.kind.map(FilterKind::from)))
}
