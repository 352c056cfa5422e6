use anyhow::Context;
use clap::Parser;
use nmoji::catalog::ScoredEmoji;
use nmoji::cli::{Cli, Commands, FilterArg};
use nmoji::config::Config;
use nmoji::server::EmojiServer;
use nmoji::tools::{
    DescribeRequest, ListFiltersRequest, RelatedRequest, SearchRequest, handle_describe,
    handle_list_filters, handle_related, handle_search,
};
use nmoji::worker::{CatalogState, spawn_reload_worker};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> nmoji::Result<()> {
    // Logs go to stderr so they never interleave with MCP frames or CLI output on stdout
    nmoji::tracing::init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(cli.dataset.clone());

    let state = Arc::new(
        CatalogState::load(config)
            .await
            .context("Failed to load emoji catalog")?,
    );

    match cli.command {
        Commands::Serve => serve(state).await,
        command if cli.json => print_json(&state, command).await,
        command => print_text(&state, command).await,
    }
}

async fn serve(state: Arc<CatalogState>) -> nmoji::Result<()> {
    tracing::info!("Starting nmoji MCP server");

    let cancel = CancellationToken::new();
    let reload = spawn_reload_worker(state.clone(), cancel.clone());

    let server = EmojiServer::new(state);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    let result = service.waiting().await;

    cancel.cancel();
    if let Some(handle) = reload
        && let Err(e) = handle.await
    {
        tracing::warn!("Reload worker ended abnormally: {}", e);
    }

    result?;
    Ok(())
}

async fn print_text(state: &Arc<CatalogState>, command: Commands) -> nmoji::Result<()> {
    let output = match command {
        Commands::Serve => return Ok(()),
        Commands::Search {
            query,
            category,
            tag,
            alias,
            substring,
            limit,
        } => {
            let request = SearchRequest {
                query: Some(query),
                category,
                tag,
                alias,
                substring,
                limit,
            };
            handle_search(state, request).await
        }
        Commands::Related { emoji, limit } => {
            handle_related(state, RelatedRequest { emoji, limit }).await
        }
        Commands::Describe { emoji } => handle_describe(state, DescribeRequest { emoji }).await,
        Commands::Filters { kind } => {
            let request = ListFiltersRequest {
                kind: kind.map(Into::into),
            };
            handle_list_filters(state, request).await
        }
    };

    let text = output.map_err(anyhow::Error::msg)?;
    println!("{}", text);
    Ok(())
}

async fn print_json(state: &Arc<CatalogState>, command: Commands) -> nmoji::Result<()> {
    let catalog = state.catalog().await;
    let config = state.config();

    let value = match command {
        Commands::Serve => return Ok(()),
        Commands::Search {
            query,
            category,
            tag,
            alias,
            substring,
            limit,
        } => {
            let request = SearchRequest {
                query: Some(query),
                category,
                tag,
                alias,
                substring,
                limit,
            };
            let limit = request.limit.filter(|l| *l > 0).unwrap_or(config.grid_limit);
            serde_json::to_value(catalog.search(&request.to_query(), limit))?
        }
        Commands::Related { emoji, limit } => {
            let limit = limit.filter(|l| *l > 0).unwrap_or(config.related_limit);
            let related = catalog
                .related(&emoji, limit)
                .with_context(|| format!("Emoji '{}' is not in the dataset", emoji.trim()))?;
            let scored: Vec<ScoredEmoji<'_>> = related.iter().map(ScoredEmoji::from).collect();
            serde_json::to_value(scored)?
        }
        Commands::Describe { emoji } => {
            let card = catalog
                .describe(&emoji, config.related_limit, config.popular_limit)
                .with_context(|| format!("Emoji '{}' is not in the dataset", emoji.trim()))?;
            serde_json::to_value(card)?
        }
        Commands::Filters { kind } => {
            let options = catalog.filter_options();
            match kind {
                Some(FilterArg::Categories) => serde_json::to_value(options.categories)?,
                Some(FilterArg::Tags) => serde_json::to_value(options.tags)?,
                Some(FilterArg::Aliases) => serde_json::to_value(options.aliases)?,
                None => serde_json::to_value(options)?,
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
