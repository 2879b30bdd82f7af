//! Deduplication, price ordering and popular/other bucketing of offers.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::offers::Offer;
use crate::retailers::RetailerLists;

/// Maximum offers shown in each bucket.
pub const BUCKET_CAP: usize = 15;

/// Offers moved from `other` into an empty `popular` bucket.
pub const FALLBACK_PROMOTIONS: usize = 3;

/// Result of ranking an offer set for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedOffers {
    /// Every distinct offer, cheapest total first. Not capped.
    pub sorted: Vec<Offer>,
    pub popular: Vec<Offer>,
    pub other: Vec<Offer>,
}

impl RankedOffers {
    /// The offer with the lowest `price + shipping`, used for the headline price.
    #[must_use]
    pub fn best(&self) -> Option<&Offer> {
        best_offer(&self.sorted)
    }

    /// `true` when there is nothing to show; distinct from a failed fetch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

/// Removes repeated `(seller, url)` pairs, keeping the first occurrence.
///
/// Sellers compare case-insensitively; urls compare exactly after trimming.
#[must_use]
pub fn dedup_offers(offers: Vec<Offer>) -> Vec<Offer> {
    let mut seen = HashSet::new();
    offers
        .into_iter()
        .filter(|offer| {
            seen.insert((
                offer.seller.trim().to_lowercase(),
                offer.url.trim().to_owned(),
            ))
        })
        .collect()
}

/// Stable ascending sort by total price.
///
/// Unpriced offers (zero, missing or non-finite) sort after every priced one.
pub fn sort_by_total(offers: &mut [Offer]) {
    offers.sort_by(compare_totals);
}

fn compare_totals(a: &Offer, b: &Offer) -> Ordering {
    match (a.is_priced(), b.is_priced()) {
        (true, true) => a.total().total_cmp(&b.total()),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// Returns the cheapest priced offer by total; the earliest one wins ties.
///
/// Falls back to the first offer when none carries a price.
#[must_use]
pub fn best_offer(offers: &[Offer]) -> Option<&Offer> {
    offers.iter().reduce(|best, candidate| {
        if compare_totals(candidate, best) == Ordering::Less {
            candidate
        } else {
            best
        }
    })
}

/// Returns `true` if the seller is a verified retailer or the product's own brand.
#[must_use]
pub fn is_popular_seller(seller: &str, brand: &str, lists: &RetailerLists) -> bool {
    if lists.is_popular(seller) {
        return true;
    }
    let brand = brand.trim().to_lowercase();
    !brand.is_empty() && seller.to_lowercase().contains(&brand)
}

/// Dedupes, sorts and buckets offers for display.
///
/// When no offer comes from a popular seller, the cheapest
/// [`FALLBACK_PROMOTIONS`] offers are moved from `other` into `popular` so
/// the primary list is never empty while offers exist. Both buckets are then
/// capped at [`BUCKET_CAP`].
#[must_use]
pub fn rank_offers(offers: Vec<Offer>, brand: &str, lists: &RetailerLists) -> RankedOffers {
    let mut sorted = dedup_offers(offers);
    sort_by_total(&mut sorted);

    let (mut popular, mut other): (Vec<Offer>, Vec<Offer>) = sorted
        .iter()
        .cloned()
        .partition(|offer| is_popular_seller(&offer.seller, brand, lists));

    if popular.is_empty() && !other.is_empty() {
        let moved = other.len().min(FALLBACK_PROMOTIONS);
        popular = other.drain(..moved).collect();
    }

    popular.truncate(BUCKET_CAP);
    other.truncate(BUCKET_CAP);

    RankedOffers {
        sorted,
        popular,
        other,
    }
}
