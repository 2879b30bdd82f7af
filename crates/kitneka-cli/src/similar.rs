//! `similar` command: other products from the same brand and category.

use kitneka_client::{load_product, DiscoveryClient, ProductCache};

use crate::search::format_product_line;

/// Prints up to five products similar to `product_id`.
///
/// Listed products are cached so they can be compared next.
///
/// # Errors
///
/// Returns an error if the product cannot be resolved or the search fails.
pub(crate) async fn run_similar(
    client: &DiscoveryClient,
    cache: &ProductCache,
    product_id: &str,
) -> anyhow::Result<()> {
    let product = load_product(client, cache, product_id).await?;
    let similar = client.similar(&product).await?;
    tracing::info!(id = %product.id, count = similar.len(), "similar products loaded");

    println!("Similar to {}:", product.title);
    if similar.is_empty() {
        println!("  nothing similar found");
        return Ok(());
    }
    for item in &similar {
        if !item.id.trim().is_empty() {
            if let Err(e) = cache.put(item) {
                tracing::warn!(id = %item.id, error = %e, "skipping cache write");
            }
        }
        println!("  {}", format_product_line(item));
    }

    Ok(())
}
