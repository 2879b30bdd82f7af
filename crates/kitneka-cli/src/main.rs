mod compare;
mod history;
mod search;
mod similar;
mod tips;

use clap::{Args, Parser, Subcommand};
use kitneka_client::{DiscoveryClient, ProductCache};
use kitneka_core::HistoryRange;
use tracing_subscriber::EnvFilter;

use crate::search::{SearchTarget, SortArg};

#[derive(Debug, Parser)]
#[command(name = "kitneka-cli")]
#[command(about = "Kitneka price comparison command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search online, Instagram and local sellers for a product
    Search {
        /// Free-text product query
        query: String,
        #[command(flatten)]
        view: SearchArgs,
    },
    /// Search for the product behind a store page URL
    SearchUrl {
        /// Product page URL from any store
        url: String,
        #[command(flatten)]
        view: SearchArgs,
    },
    /// Compare prices for a product across stores and print a recommendation
    Compare {
        /// Product identifier from a search result
        product_id: String,
    },
    /// Show products similar to one from a search result
    Similar {
        /// Product identifier from a search result
        product_id: String,
    },
    /// Show price history for a product
    History {
        /// Product identifier from a search result
        product_id: String,
        /// Lookback window in days: 7, 30 or 365
        #[arg(long, default_value = "30", value_parser = parse_history_range)]
        days: HistoryRange,
    },
    /// Show buying tips for the current shopping season
    Tips,
}

/// Filtering and display flags shared by both search commands.
#[derive(Debug, Args)]
struct SearchArgs {
    /// Show every store, not only popular marketplaces and official stores
    #[arg(long)]
    all: bool,
    /// Only clean-beauty products from trusted stores
    #[arg(long)]
    clean_beauty: bool,
    /// Lowest price to include (inclusive)
    #[arg(long)]
    min_price: Option<f64>,
    /// Highest price to include (inclusive)
    #[arg(long)]
    max_price: Option<f64>,
    /// Result ordering
    #[arg(long, value_enum, default_value_t = SortArg::Relevance)]
    sort: SortArg,
    /// Rank by shopper engagement (rating and review count) instead
    #[arg(long)]
    top_rated: bool,
    /// Maximum number of results to print
    #[arg(long, default_value = "15")]
    limit: usize,
}

fn parse_history_range(raw: &str) -> Result<HistoryRange, String> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(HistoryRange::from_days)
        .ok_or_else(|| format!("unsupported range '{raw}', expected 7, 30 or 365"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = kitneka_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.log_level))?,
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?config, "configuration loaded");

    let Some(command) = cli.command else {
        println!("kitneka-cli ready; run with --help for commands");
        return Ok(());
    };

    let retailers = config.retailers()?;
    let client = DiscoveryClient::new(&config)
        .map_err(|e| anyhow::anyhow!("failed to build discovery client: {e}"))?;
    let cache = ProductCache::new(config.cache_dir.clone());

    match command {
        Commands::Search { query, view } => {
            let target = SearchTarget::Query(&query);
            run_search_command(&client, &cache, target, &view).await?;
        }
        Commands::SearchUrl { url, view } => {
            let target = SearchTarget::ProductUrl {
                url: &url,
                location: &config.location,
            };
            run_search_command(&client, &cache, target, &view).await?;
        }
        Commands::Compare { product_id } => {
            compare::run_compare(&client, &cache, &retailers, &product_id).await?;
        }
        Commands::Similar { product_id } => {
            similar::run_similar(&client, &cache, &product_id).await?;
        }
        Commands::History { product_id, days } => {
            history::run_history(&client, &product_id, days).await?;
        }
        Commands::Tips => {
            tips::run_tips(&client).await?;
        }
    }

    Ok(())
}

async fn run_search_command(
    client: &DiscoveryClient,
    cache: &ProductCache,
    target: SearchTarget<'_>,
    view: &SearchArgs,
) -> anyhow::Result<()> {
    let filter = search::build_filter(
        view.all,
        view.clean_beauty,
        view.min_price,
        view.max_price,
        view.sort,
    )?;
    search::run_search(client, cache, target, &filter, view.top_rated, view.limit).await
}

#[cfg(test)]
mod tests;
