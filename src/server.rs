//! MCP server implementation exposing emoji lookup tools.

use crate::tools::describe::{DescribeRequest, handle_describe};
use crate::tools::filters::{ListFiltersRequest, handle_list_filters};
use crate::tools::related::{RelatedRequest, handle_related};
use crate::tools::search::{SearchRequest, handle_search};
use crate::worker::CatalogState;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for emoji lookups
#[derive(Clone)]
pub struct EmojiServer {
    /// Shared catalog state (current catalog, related-result cache)
    state: Arc<CatalogState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for EmojiServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmojiServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl EmojiServer {
    pub fn new(state: Arc<CatalogState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared CatalogState.
    pub const fn state(&self) -> &Arc<CatalogState> {
        &self.state
    }

    #[tool(
        description = "Search emojis by description words, optionally narrowed by category, tag and alias. All given filters must match. Set substring=true to match partial words in descriptions, categories, tags and aliases.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search_emojis(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(
        description = "List emojis related to the given emoji, ranked by shared tags, same category and shared description words."
    )]
    async fn related_emojis(
        &self,
        Parameters(request): Parameters<RelatedRequest>,
    ) -> std::result::Result<String, String> {
        handle_related(&self.state, request).await
    }

    #[tool(
        description = "Show the detail card of an emoji: description, category, tags, aliases, related emojis and popular emojis."
    )]
    async fn describe_emoji(
        &self,
        Parameters(request): Parameters<DescribeRequest>,
    ) -> std::result::Result<String, String> {
        handle_describe(&self.state, request).await
    }

    #[tool(
        description = "List the categories, tags and aliases that can be used as search filters.",
        input_schema = inline_schema_for_type::<ListFiltersRequest>()
    )]
    async fn list_filters(
        &self,
        Parameters(request): Parameters<ListFiltersRequest>,
    ) -> std::result::Result<String, String> {
        handle_list_filters(&self.state, request).await
    }
}

#[tool_handler]
impl ServerHandler for EmojiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "nmoji: emoji lookup. Use search_emojis to find emojis by words or filters, \
                 list_filters to discover valid categories, tags and aliases, and \
                 describe_emoji or related_emojis once you have a glyph.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this sets `inline_subschemas = true`
/// so enums such as the filter kind render as dropdowns instead of `$ref`s.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let schema = settings.into_generator().into_root_schema_for::<T>();
    match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => Arc::new(object),
        Ok(_) | Err(_) => {
            tracing::error!(
                "Schema for {} did not serialize to an object",
                std::any::type_name::<T>()
            );
            Arc::new(JsonObject::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use assert2::check;

    #[test]
    fn test_search_schema_lists_fields() {
        let schema = inline_schema_for_type::<SearchRequest>();
        let properties = schema.get("properties").and_then(|p| p.as_object());
        check!(properties.is_some_and(|p| p.contains_key("query") && p.contains_key("substring")));
    }

    #[tokio::test]
    async fn test_server_info() {
        let state = Arc::new(CatalogState::new(Catalog::builtin(), Config::default()));
        let server = EmojiServer::new(state);
        let info = server.get_info();
        check!(info.instructions.is_some_and(|i| i.contains("search_emojis")));
    }
}
