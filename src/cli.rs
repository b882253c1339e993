//! Command-line interface definitions.
//!
//! API keys and the config path can be given as flags or through the
//! environment (including a `.env` file loaded before parsing).

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Command-line arguments for the healthcare IT news dashboard.
///
/// # Examples
///
/// ```sh
/// # One-off summary of two categories
/// health_it_news fetch -c "EHR News" -c "AI in Healthcare"
///
/// # Free-text search, saving JSON and Markdown copies
/// health_it_news fetch -s "Epic EHR" -j ./json -m ./markdown
///
/// # Run the JSON API for the browser dashboard
/// health_it_news serve --bind 0.0.0.0:8051
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(long, env = "HEALTH_IT_NEWS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// News search API key
    #[arg(long, env = "NEWS_API_KEY", default_value = "", hide_env_values = true, global = true)]
    pub news_api_key: String,

    /// Chat-completion API key
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true, global = true)]
    pub openai_api_key: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and summarize news once, printing a Markdown report
    Fetch(FetchArgs),
    /// Serve the dashboard JSON API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8051")]
        bind: SocketAddr,
    },
    /// List the configured categories and their query fragments
    Categories,
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Category label to include (repeatable)
    #[arg(short = 'c', long = "category")]
    pub categories: Vec<String>,

    /// Free-text search term
    #[arg(short, long)]
    pub search: Option<String>,

    /// Select every configured category
    #[arg(long)]
    pub all: bool,

    /// Output directory for a JSON snapshot
    #[arg(short, long)]
    pub json_output_dir: Option<PathBuf>,

    /// Output directory for the Markdown report
    #[arg(short, long)]
    pub markdown_output_dir: Option<PathBuf>,
}
