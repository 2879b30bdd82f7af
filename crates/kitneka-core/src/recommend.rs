//! Buy/wait verdict derived from price spread and product rating.

use serde::{Deserialize, Serialize};

use crate::offers::Offer;
use crate::retailers::RetailerLists;

/// Rating assumed when the product record carries none.
pub const DEFAULT_RATING: f64 = 4.0;

/// Ratings below this trigger a review warning regardless of price.
pub const CAUTION_RATING: f64 = 3.5;

/// Minimum spread between best and average price, in percent.
pub const GREAT_BUY_SPREAD_PCT: f64 = 15.0;
pub const GOOD_DEAL_SPREAD_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "CAUTION")]
    Caution,
    #[serde(rename = "GREAT BUY")]
    GreatBuy,
    #[serde(rename = "GOOD DEAL")]
    GoodDeal,
    #[serde(rename = "NEUTRAL")]
    Neutral,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Caution => write!(f, "CAUTION"),
            Verdict::GreatBuy => write!(f, "GREAT BUY"),
            Verdict::GoodDeal => write!(f, "GOOD DEAL"),
            Verdict::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub verdict: Verdict,
    pub title: String,
    pub reason: String,
    /// 0–10.
    pub score: u8,
}

/// Price statistics the verdict is based on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub min: f64,
    pub avg: f64,
    /// `(avg - min) / avg * 100`; `None` when the average is zero.
    pub spread_pct: Option<f64>,
}

/// Computes min/average over priced offers, ignoring sample-size stores.
///
/// Offers without a usable price never count towards the baseline. Falls
/// back to every priced offer when all priced sellers are sample stores, and
/// to the raw prices when nothing is priced. Returns `None` for an empty
/// slice.
#[must_use]
pub fn price_stats(offers: &[Offer], lists: &RetailerLists) -> Option<PriceStats> {
    let priced: Vec<&Offer> = offers.iter().filter(|o| o.is_priced()).collect();
    let real: Vec<f64> = priced
        .iter()
        .filter(|o| !lists.is_sample_store(&o.seller))
        .map(|o| o.price)
        .collect();
    let prices = match (real.is_empty(), priced.is_empty()) {
        (false, _) => real,
        (true, false) => priced.iter().map(|o| o.price).collect(),
        (true, true) => offers.iter().map(|o| o.price).collect(),
    };
    if prices.is_empty() {
        return None;
    }

    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    #[allow(clippy::cast_precision_loss)]
    let avg = prices.iter().sum::<f64>() / prices.len() as f64;
    let spread_pct = (avg.is_finite() && avg > 0.0).then(|| (avg - min) / avg * 100.0);

    Some(PriceStats {
        min,
        avg,
        spread_pct,
    })
}

/// Scores an offer set. Returns `None` when there are no offers.
///
/// Rules are checked in order and the first match wins: low rating, then a
/// spread above [`GREAT_BUY_SPREAD_PCT`], then above
/// [`GOOD_DEAL_SPREAD_PCT`], otherwise neutral.
#[must_use]
pub fn recommend(
    offers: &[Offer],
    rating: Option<f64>,
    lists: &RetailerLists,
) -> Option<Recommendation> {
    let stats = price_stats(offers, lists)?;
    let rating = rating.filter(|r| r.is_finite()).unwrap_or(DEFAULT_RATING);

    if rating < CAUTION_RATING {
        return Some(Recommendation {
            verdict: Verdict::Caution,
            title: "Check Reviews First".to_owned(),
            reason: format!(
                "Rated {rating:.1}/5 by shoppers. Read recent reviews before buying."
            ),
            score: 4,
        });
    }

    let recommendation = match stats.spread_pct {
        Some(pct) if pct > GREAT_BUY_SPREAD_PCT => Recommendation {
            verdict: Verdict::GreatBuy,
            title: "Great Buy".to_owned(),
            reason: format!(
                "Best price is {:.0}% below the market average of ₹{:.0}.",
                pct.round(),
                stats.avg.round()
            ),
            score: 9,
        },
        Some(pct) if pct > GOOD_DEAL_SPREAD_PCT => Recommendation {
            verdict: Verdict::GoodDeal,
            title: "Good Deal".to_owned(),
            reason: format!(
                "Best price is {:.0}% below the market average.",
                pct.round()
            ),
            score: 7,
        },
        _ => Recommendation {
            verdict: Verdict::Neutral,
            title: "Fair Market Price".to_owned(),
            reason: "Prices are consistent across stores.".to_owned(),
            score: 5,
        },
    };

    Some(recommendation)
}
