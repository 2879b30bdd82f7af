//! `search` and `search-url` commands: query the backend, filter, print and
//! cache results.

use clap::ValueEnum;
use kitneka_client::{ClientError, DiscoveryClient, ProductCache};
use kitneka_core::{
    filter_results, rank_by_engagement, FilterScope, Product, ResultFilter, SearchResults,
    SortOrder,
};

/// What a search is run against.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SearchTarget<'a> {
    Query(&'a str),
    ProductUrl { url: &'a str, location: &'a str },
}

impl SearchTarget<'_> {
    async fn fetch(self, client: &DiscoveryClient) -> Result<SearchResults, ClientError> {
        match self {
            SearchTarget::Query(query) => client.search(query).await,
            SearchTarget::ProductUrl { url, location } => {
                client.search_by_url(url, location).await
            }
        }
    }
}

impl std::fmt::Display for SearchTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchTarget::Query(query) => write!(f, "\"{query}\""),
            SearchTarget::ProductUrl { url, .. } => write!(f, "{url}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Relevance,
    PriceAsc,
    PriceDesc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => SortOrder::Relevance,
            SortArg::PriceAsc => SortOrder::PriceAsc,
            SortArg::PriceDesc => SortOrder::PriceDesc,
        }
    }
}

/// Builds the result filter from command-line flags.
///
/// A single bound leaves the other side open.
///
/// # Errors
///
/// Returns an error if a bound is negative or `min_price > max_price`.
pub(crate) fn build_filter(
    all: bool,
    clean_beauty: bool,
    min_price: Option<f64>,
    max_price: Option<f64>,
    sort: SortArg,
) -> anyhow::Result<ResultFilter> {
    let price_range = match (min_price, max_price) {
        (None, None) => None,
        (min, max) => {
            let min = min.unwrap_or(0.0);
            let max = max.unwrap_or(f64::INFINITY);
            if min < 0.0 || max < 0.0 || min.is_nan() || max.is_nan() {
                anyhow::bail!("price bounds must be non-negative numbers");
            }
            if min > max {
                anyhow::bail!("--min-price ({min}) is greater than --max-price ({max})");
            }
            Some((min, max))
        }
    };

    Ok(ResultFilter {
        scope: if all {
            FilterScope::All
        } else {
            FilterScope::Popular
        },
        clean_beauty_only: clean_beauty,
        price_range,
        sort: sort.into(),
    })
}

/// One-line summary of a search result.
pub(crate) fn format_product_line(product: &Product) -> String {
    let mut line = format!("{}  ₹{:.0}", product.title, product.price);
    if let Some(original) = product.original_price.filter(|o| *o > product.price) {
        line.push_str(&format!(" (was ₹{original:.0})"));
    }
    if !product.source.is_empty() {
        line.push_str(&format!("  @ {}", product.source));
    }
    if let Some(rating) = product.rating {
        line.push_str(&format!("  {rating:.1}★ ({} reviews)", product.reviews));
    }
    if let Some(class) = product.match_classification {
        line.push_str(&format!("  [{class}]"));
    }
    if !product.id.is_empty() {
        line.push_str(&format!("  id={}", product.id));
    }
    line
}

/// Runs a search and prints the filtered online results.
///
/// Every online result with an id is written to the product cache so that
/// `compare` and `history` can resolve it without another lookup. Cache write
/// failures are logged and skipped.
///
/// # Errors
///
/// Returns an error if the search request fails.
pub(crate) async fn run_search(
    client: &DiscoveryClient,
    cache: &ProductCache,
    target: SearchTarget<'_>,
    filter: &ResultFilter,
    top_rated: bool,
    limit: usize,
) -> anyhow::Result<()> {
    let results = target.fetch(client).await?;

    let mut cached = 0usize;
    for product in results.online.iter().filter(|p| !p.id.trim().is_empty()) {
        match cache.put(product) {
            Ok(()) => cached += 1,
            Err(e) => tracing::warn!(id = %product.id, error = %e, "skipping cache write"),
        }
    }
    tracing::info!(search = %target, cached, "search complete");

    if results.is_empty() {
        println!("No results for {target}.");
        return Ok(());
    }

    let filtered = filter_results(&results.online, filter);
    let shown = if top_rated {
        rank_by_engagement(filtered.iter().copied(), limit)
    } else {
        filtered.iter().copied().take(limit).collect()
    };

    println!(
        "Online results for {target} ({} of {}):",
        shown.len(),
        results.online.len()
    );
    if shown.is_empty() {
        println!("  none match the current filters; try --all or widen the price range");
    }
    for product in &shown {
        println!("  {}", format_product_line(product));
    }

    if !results.local.is_empty() {
        println!("Local sellers ({}):", results.local.len());
        for product in results.local.iter().take(limit) {
            println!("  {}", format_product_line(product));
        }
    }
    if !results.instagram.is_empty() {
        println!("Instagram sellers: {}", results.instagram.len());
    }

    Ok(())
}
