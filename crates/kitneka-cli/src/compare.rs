//! `compare` command: normalize, rank and score every offer for one product.

use kitneka_client::{load_product, DiscoveryClient, ProductCache};
use kitneka_core::{
    normalize_offers, rank_offers, recommend, Offer, RankedOffers, Recommendation, RetailerLists,
};

/// One-line summary of an offer.
pub(crate) fn format_offer_line(offer: &Offer) -> String {
    let mut line = format!("{}  ₹{:.0}", offer.seller, offer.price);
    if offer.shipping > 0.0 {
        line.push_str(&format!(" + ₹{:.0} shipping", offer.shipping));
    }
    line.push_str(&format!("  ({})", offer.eta));
    if let Some(class) = offer.match_classification {
        line.push_str(&format!("  [{class}]"));
    }
    if offer.is_best {
        line.push_str("  *this listing*");
    }
    if !offer.url.is_empty() {
        line.push_str(&format!("  {}", offer.url));
    }
    line
}

pub(crate) fn format_recommendation(rec: &Recommendation) -> String {
    format!(
        "{} ({}/10): {}. {}",
        rec.verdict, rec.score, rec.title, rec.reason
    )
}

fn print_bucket(label: &str, offers: &[Offer]) {
    if offers.is_empty() {
        return;
    }
    println!("{label} ({}):", offers.len());
    for offer in offers {
        println!("  {}", format_offer_line(offer));
    }
}

/// Loads a product, gathers offers and prints the ranked view.
///
/// A failed comparison request is logged and the product's own competitor
/// list is used instead.
///
/// # Errors
///
/// Returns an error if the product cannot be resolved.
pub(crate) async fn run_compare(
    client: &DiscoveryClient,
    cache: &ProductCache,
    retailers: &RetailerLists,
    product_id: &str,
) -> anyhow::Result<()> {
    let product = load_product(client, cache, product_id).await?;

    let comparisons = if product.title.trim().is_empty() {
        None
    } else {
        match client.compare(&product.title).await {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!(
                    id = %product.id,
                    error = %e,
                    "comparison lookup failed, falling back to listed competitors"
                );
                None
            }
        }
    };

    let offers = normalize_offers(&product, comparisons.as_deref());
    let recommendation = recommend(&offers, product.rating, retailers);
    let ranked: RankedOffers = rank_offers(offers, &product.brand, retailers);

    println!("{}", product.title);
    let Some(best) = ranked.best() else {
        println!("No offers found for this product.");
        return Ok(());
    };

    println!("Best price: {}", format_offer_line(best));
    print_bucket("Popular stores", &ranked.popular);
    print_bucket("Other stores", &ranked.other);
    if let Some(rec) = &recommendation {
        println!("Verdict: {}", format_recommendation(rec));
    }

    Ok(())
}
