//! # Health IT News
//!
//! A small dashboard backend that searches a news API for healthcare IT
//! stories, groups them by topic, and asks an LLM for a bullet summary.
//!
//! ## Usage
//!
//! ```sh
//! health_it_news fetch -c "EHR News" -s "Epic"
//! health_it_news serve --bind 127.0.0.1:8051
//! ```
//!
//! ## Architecture
//!
//! Each request flows one way through the pipeline:
//! 1. **Query building**: selected categories and/or a search term become
//!    one search query per category ([`query`])
//! 2. **Fetching**: one search call per category, run sequentially; a
//!    failing category is skipped ([`search`])
//! 3. **Ranking**: newest first by `publishedAt` ([`ranking`])
//! 4. **Summarizing**: one chat completion over the grouped articles
//!    ([`summarizer`], [`api`])
//! 5. **Presentation**: summary segmentation plus Markdown/JSON output
//!    ([`outputs`]), served over HTTP by [`server`]

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod dashboard;
mod error;
mod models;
mod outputs;
mod query;
mod ranking;
mod search;
mod server;
mod summarizer;
mod utils;

use cli::{Cli, Command, FetchArgs};
use config::{Credentials, DashboardConfig, load_dotenv};
use dashboard::LiveDashboard;
use models::DashboardRequest;
use outputs::{json, markdown};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    load_dotenv();
    let args = Cli::parse();
    debug!(config = ?args.config, command = ?args.command, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    let credentials = Credentials {
        news_api_key: args.news_api_key,
        openai_api_key: args.openai_api_key,
    };

    match args.command {
        Command::Categories => {
            for category in &config.categories {
                println!("{}\n    {}", category.label, category.query);
            }
            Ok(())
        }
        Command::Serve { bind } => {
            let dashboard = LiveDashboard::from_credentials(config, credentials)?;
            server::serve(dashboard, bind).await?;
            Ok(())
        }
        Command::Fetch(fetch) => run_fetch(config, credentials, fetch).await,
    }
}

async fn run_fetch(
    config: DashboardConfig,
    credentials: Credentials,
    args: FetchArgs,
) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();

    // Fail before any network call if an output directory is unusable.
    for dir in [&args.json_output_dir, &args.markdown_output_dir].into_iter().flatten() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir.display(), error = %e, "Output directory is not writable");
            return Err(e);
        }
    }

    let categories = if args.all {
        config.labels()
    } else {
        args.categories
    };
    for label in &categories {
        if config.category(label).is_none() {
            warn!(%label, "Unknown category will be ignored");
        }
    }
    let request = DashboardRequest::new(categories, args.search);

    let dashboard = LiveDashboard::from_credentials(config, credentials)?;
    let response = dashboard.handle(&request).await;

    let now = Local::now();
    let report = markdown::response_to_markdown(&response, &now.format("%Y-%m-%d %H:%M").to_string());
    println!("{}", report);

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_response(&response, dir, &now).await {
            error!(error = %e, "Failed to write JSON snapshot");
        }
    }

    if let Some(dir) = &args.markdown_output_dir {
        let path = dir.join(format!("{}.md", now.format("%Y-%m-%d_%H-%M-%S")));
        match tokio::fs::write(&path, &report).await {
            Ok(()) => info!(path = %path.display(), "Wrote Markdown report"),
            Err(e) => error!(path = %path.display(), error = %e, "Failed writing Markdown"),
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        articles = response.articles.len(),
        rejected = response.error.is_some(),
        "Execution complete"
    );
    Ok(())
}
