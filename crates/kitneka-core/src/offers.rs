use serde::{Deserialize, Serialize};

use crate::records::MatchClassification;

/// Delivery estimate shown when a source does not provide one.
pub const DEFAULT_ETA: &str = "Check site";

/// Which backend record an [`Offer`] was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferOrigin {
    /// A row from the multi-store comparison endpoint.
    Comparison,
    /// An entry in the product record's legacy `competitors` list.
    LegacyCompetitor,
    /// Synthesized from the product record itself.
    Primary,
}

/// A single seller's price and terms for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub seller: String,
    /// Non-negative amount in the store currency.
    pub price: f64,
    pub shipping: f64,
    pub eta: String,
    pub url: String,
    pub image: String,
    pub match_classification: Option<MatchClassification>,
    /// 1–100 confidence that the offer is the queried product; `None` is unknown.
    pub match_score: Option<u8>,
    pub origin: OfferOrigin,
    /// `true` only for the offer synthesized from the product record.
    pub is_best: bool,
}

impl Offer {
    /// Effective price the shopper pays: `price + shipping`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.price + self.shipping
    }

    /// `false` when the source had no usable price and `price` was defaulted to zero.
    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.price > 0.0 && self.total().is_finite()
    }
}
