pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod search;
pub mod server;
pub mod tools;
pub mod tracing;
pub mod worker;

pub use catalog::Catalog;
pub use config::Config;
pub use dataset::{Dataset, Emoji};
pub use error::{ConfigError, LoadError, Result};
pub use search::{FilterKind, Query, SearchMode};
pub use server::EmojiServer;
pub use worker::CatalogState;
