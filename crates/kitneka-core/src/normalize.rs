//! Normalization from backend records to the uniform [`Offer`] shape.
//!
//! Every defaulting rule lives in the `From<OfferSource>` conversion so the
//! ranker and scorer only ever see fully populated offers.

use crate::offers::{Offer, OfferOrigin, DEFAULT_ETA};
use crate::records::{CompetitorRecord, ComparisonRecord, Product};

/// Seller label for a product record that names no store of its own.
pub const FALLBACK_SELLER: &str = "Store";

/// A backend record that can become an [`Offer`].
#[derive(Debug, Clone, Copy)]
pub enum OfferSource<'a> {
    Comparison(&'a ComparisonRecord),
    /// Legacy competitor row; `fallback_price` is used when the row has none.
    Competitor {
        record: &'a CompetitorRecord,
        fallback_price: f64,
    },
    Primary(&'a Product),
}

impl From<OfferSource<'_>> for Offer {
    fn from(source: OfferSource<'_>) -> Self {
        match source {
            OfferSource::Comparison(row) => Offer {
                seller: row.source.trim().to_owned(),
                price: row.price,
                shipping: 0.0,
                eta: DEFAULT_ETA.to_owned(),
                url: row.url.trim().to_owned(),
                image: row.image.clone(),
                match_classification: row.match_classification,
                match_score: row.match_score,
                origin: OfferOrigin::Comparison,
                is_best: false,
            },
            OfferSource::Competitor {
                record,
                fallback_price,
            } => Offer {
                seller: record.seller().to_owned(),
                price: record.price.unwrap_or(fallback_price),
                shipping: 0.0,
                eta: DEFAULT_ETA.to_owned(),
                url: record.url.trim().to_owned(),
                image: String::new(),
                match_classification: None,
                match_score: None,
                origin: OfferOrigin::LegacyCompetitor,
                is_best: false,
            },
            OfferSource::Primary(product) => {
                let seller = match product.source.trim() {
                    "" => FALLBACK_SELLER,
                    source => source,
                };
                Offer {
                    seller: seller.to_owned(),
                    price: product.price,
                    shipping: 0.0,
                    eta: DEFAULT_ETA.to_owned(),
                    url: product.url.trim().to_owned(),
                    image: product.image.clone(),
                    match_classification: product.match_classification,
                    match_score: product.match_score,
                    origin: OfferOrigin::Primary,
                    is_best: true,
                }
            }
        }
    }
}

/// Builds the offer list for a product page.
///
/// Comparison rows win when present and non-empty; otherwise the product's
/// legacy competitors are used. The product itself is then placed at the
/// front unless a store with the same name (case-insensitive) is already
/// listed, so a product with a store and a url never yields zero offers.
#[must_use]
pub fn normalize_offers(product: &Product, comparisons: Option<&[ComparisonRecord]>) -> Vec<Offer> {
    let mut offers: Vec<Offer> = match comparisons.filter(|rows| !rows.is_empty()) {
        Some(rows) => rows
            .iter()
            .map(|row| Offer::from(OfferSource::Comparison(row)))
            .collect(),
        None => product
            .competitors
            .iter()
            .map(|record| {
                Offer::from(OfferSource::Competitor {
                    record,
                    fallback_price: product.price,
                })
            })
            .collect(),
    };

    if needs_primary_offer(product, &offers) {
        offers.insert(0, Offer::from(OfferSource::Primary(product)));
    }

    offers
}

fn needs_primary_offer(product: &Product, existing: &[Offer]) -> bool {
    let source = product.source.trim();
    if source.is_empty() {
        // Nothing to dedupe against; only fill the gap for a directly loaded product.
        return existing.is_empty() && !product.url.trim().is_empty();
    }

    let source = source.to_lowercase();
    !existing
        .iter()
        .any(|offer| offer.seller.trim().to_lowercase() == source)
}
