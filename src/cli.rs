use crate::config::DATASET_ENV;
use crate::tools::filters::FilterListKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nmoji")]
#[command(about = "Search emojis by words, categories, tags and aliases", long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/nmoji/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset JSON file; the bundled dataset is used when omitted
    #[arg(long, global = true, env = DATASET_ENV)]
    pub dataset: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server over stdio
    Serve,
    Search {
        /// Free text matched against description words
        #[arg(default_value = "")]
        query: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        tag: Option<String>,
        #[arg(short, long)]
        alias: Option<String>,
        /// Match partial words instead of whole description words
        #[arg(long)]
        substring: bool,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    Related {
        emoji: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    Describe {
        emoji: String,
    },
    Filters {
        #[arg(value_enum)]
        kind: Option<FilterArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FilterArg {
    Categories,
    Tags,
    Aliases,
}

impl From<FilterArg> for FilterListKind {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Categories => Self::Categories,
            FilterArg::Tags => Self::Tags,
            FilterArg::Aliases => Self::Aliases,
        }
    }
}
