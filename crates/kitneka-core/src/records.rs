//! Backend payload shapes for products, comparison rows and legacy competitors.
//!
//! ## Observed shape from the discovery backend
//!
//! The backend aggregates several scrapers and an LLM matcher, so field types
//! drift between endpoints:
//!
//! - Prices arrive as JSON numbers, as display strings (`"₹1,299"`), or as
//!   `null`. Everything is folded into a non-negative `f64`; unparseable
//!   amounts become `0.0`.
//! - Display prices may hold a range or a discount note (`"₹499 - ₹599"`,
//!   `"₹1,299 (20% off)"`); only the first amount is kept.
//! - Review counts arrive as numbers, `"1,204 reviews"` or `"(1.2k)"`.
//! - `id` is usually a string but some sources send an integer.
//! - `rating` is a float or a string such as `"4.3"`; values outside `0..=5`
//!   are treated as absent.
//! - `match_classification` uses the three display classes plus the finer
//!   matcher labels (`SIZE_VARIANT`, `SIMILAR_PRODUCT`, ...). Those are folded
//!   into [`MatchClassification`].
//!
//! Nothing in this module fails on a missing or malformed field.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid amount regex"));

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(k)?\b").expect("valid review count regex")
});

/// How confident the matcher is that an offer refers to the searched product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchClassification {
    ExactMatch,
    VariantMatch,
    Similar,
}

impl MatchClassification {
    /// Maps a backend label to a classification.
    ///
    /// `*_VARIANT` labels fold into [`MatchClassification::VariantMatch`],
    /// `SIMILAR*` labels into [`MatchClassification::Similar`]. Anything else,
    /// including `DIFFERENT_PRODUCT`, is `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_uppercase();
        match label.as_str() {
            "EXACT_MATCH" | "EXACT" => Some(Self::ExactMatch),
            "VARIANT_MATCH" | "VARIANT" => Some(Self::VariantMatch),
            _ if label.ends_with("_VARIANT") => Some(Self::VariantMatch),
            _ if label.starts_with("SIMILAR") => Some(Self::Similar),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchClassification::ExactMatch => write!(f, "EXACT_MATCH"),
            MatchClassification::VariantMatch => write!(f, "VARIANT_MATCH"),
            MatchClassification::Similar => write!(f, "SIMILAR"),
        }
    }
}

/// A product as returned by search results or the product-lookup endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "de_text")]
    pub id: String,
    #[serde(default, deserialize_with = "de_text")]
    pub title: String,
    #[serde(default, deserialize_with = "de_text")]
    pub brand: String,
    #[serde(default, deserialize_with = "de_text")]
    pub category: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub price: f64,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub original_price: Option<f64>,
    #[serde(default, deserialize_with = "de_rating")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "de_count")]
    pub reviews: u64,
    #[serde(default, deserialize_with = "de_text")]
    pub image: String,
    #[serde(default, deserialize_with = "de_text")]
    pub url: String,
    /// Store or marketplace the product record came from, e.g. `"Nykaa"`.
    #[serde(default, deserialize_with = "de_text")]
    pub source: String,
    /// Legacy per-store prices attached to older product records.
    #[serde(default, deserialize_with = "de_list")]
    pub competitors: Vec<CompetitorRecord>,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_popular: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_official: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_clean_beauty: bool,
    #[serde(default, deserialize_with = "de_classification")]
    pub match_classification: Option<MatchClassification>,
    #[serde(default, deserialize_with = "de_score")]
    pub match_score: Option<u8>,
}

/// One row from the multi-store price comparison endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    #[serde(default, deserialize_with = "de_text")]
    pub source: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub price: f64,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub old_price: Option<f64>,
    #[serde(default, deserialize_with = "de_text")]
    pub url: String,
    #[serde(default, deserialize_with = "de_text")]
    pub image: String,
    #[serde(default, deserialize_with = "de_classification")]
    pub match_classification: Option<MatchClassification>,
    #[serde(default, deserialize_with = "de_score")]
    pub match_score: Option<u8>,
    /// Free-text explanation from the LLM matcher.
    #[serde(default, deserialize_with = "de_text")]
    pub llm_reason: String,
}

/// A store price from the legacy `competitors` list on a product record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRecord {
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub source: String,
    /// `None` when the competitor row carries no price of its own.
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "de_text")]
    pub url: String,
}

impl CompetitorRecord {
    /// Display name of the store: `name`, falling back to `source`.
    #[must_use]
    pub fn seller(&self) -> &str {
        if self.name.trim().is_empty() {
            self.source.trim()
        } else {
            self.name.trim()
        }
    }
}

/// A buying tip for the current shopping season.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalTip {
    #[serde(default, deserialize_with = "de_text")]
    pub title: String,
    #[serde(default, deserialize_with = "de_text")]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Lenient field deserializers
// ---------------------------------------------------------------------------

/// Any JSON scalar the backend has been seen to send for a typed field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Loose {
    fn into_amount(self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Loose::Integer(n) => Some(n as f64),
            Loose::Float(v) => Some(v),
            Loose::Text(s) => parse_amount(&s),
            Loose::Bool(_) | Loose::Other(_) => None,
        }
        .filter(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Parses a display price such as `"₹1,299.00"` or `"Rs. 499"`.
///
/// Only the first amount counts, so `"₹499 - ₹599"` is 499 and
/// `"₹1,299 (20% off)"` is 1299. Returns `None` for negative or digit-free
/// input.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.starts_with('-') {
        return None;
    }
    let amount = AMOUNT_RE.find(trimmed)?.as_str().replace(',', "");
    amount.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a review count such as `"1,204 reviews"` or `"(1.2k)"`.
fn parse_count(raw: &str) -> Option<f64> {
    let caps = COUNT_RE.captures(raw.trim())?;
    let value = caps.get(1)?.as_str().replace(',', "").parse::<f64>().ok()?;
    Some(if caps.get(2).is_some() {
        value * 1000.0
    } else {
        value
    })
}

pub(crate) fn de_text<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(de)? {
        Loose::Text(s) => s,
        Loose::Integer(n) => n.to_string(),
        Loose::Float(v) => v.to_string(),
        Loose::Bool(_) | Loose::Other(_) => String::new(),
    })
}

pub(crate) fn de_amount<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(de)?.into_amount().unwrap_or(0.0))
}

fn de_opt_amount<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(de)?.into_amount())
}

fn de_rating<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(de)?
        .into_amount()
        .filter(|r| (0.0..=5.0).contains(r)))
}

fn de_count<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    // Review counts are sent as "1,204" or "1.2k" as often as 1204.
    let count = match Loose::deserialize(de)? {
        Loose::Text(s) => parse_count(&s),
        other => other.into_amount(),
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = count
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map_or(0, |v| v.trunc() as u64);
    Ok(count)
}

fn de_score<'de, D>(de: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = Loose::deserialize(de)?
        .into_amount()
        .map(|v| v.round().min(100.0) as u8)
        .filter(|score| *score > 0);
    Ok(score)
}

fn de_flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(de)? {
        Loose::Bool(b) => b,
        Loose::Integer(n) => n != 0,
        Loose::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        Loose::Float(_) | Loose::Other(_) => false,
    })
}

fn de_classification<'de, D>(de: D) -> Result<Option<MatchClassification>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(de)? {
        Loose::Text(s) => MatchClassification::from_label(&s),
        _ => None,
    })
}

pub(crate) fn de_list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeList<T> {
        List(Vec<T>),
        Other(IgnoredAny),
    }

    Ok(match MaybeList::<T>::deserialize(de)? {
        MaybeList::List(items) => items,
        MaybeList::Other(_) => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_strips_currency_and_separators() {
        assert_eq!(parse_amount("₹1,299.00"), Some(1299.0));
        assert_eq!(parse_amount("Rs. 499"), Some(499.0));
        assert_eq!(parse_amount("  75 "), Some(75.0));
    }

    #[test]
    fn parse_amount_takes_first_amount_only() {
        assert_eq!(parse_amount("₹499 - ₹599"), Some(499.0));
        assert_eq!(parse_amount("₹1,299 (20% off)"), Some(1299.0));
        assert_eq!(parse_amount("MRP: ₹2,450.50 incl. taxes"), Some(2450.5));
    }

    #[test]
    fn review_counts_accept_thousands_suffix() {
        assert_eq!(parse_count("1.2k"), Some(1200.0));
        assert_eq!(parse_count("(3K)"), Some(3000.0));
        assert_eq!(parse_count("1,204 reviews"), Some(1204.0));
        assert_eq!(parse_count("12 kits"), Some(12.0));
        assert_eq!(parse_count("no reviews"), None);

        let product: Product = serde_json::from_str(r#"{"reviews": "(1.2k)"}"#).unwrap();
        assert_eq!(product.reviews, 1200);
    }

    #[test]
    fn parse_amount_rejects_negative_and_empty() {
        assert_eq!(parse_amount("-20"), None);
        assert_eq!(parse_amount("free"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn from_label_folds_matcher_labels() {
        assert_eq!(
            MatchClassification::from_label("EXACT_MATCH"),
            Some(MatchClassification::ExactMatch)
        );
        assert_eq!(
            MatchClassification::from_label("size_variant"),
            Some(MatchClassification::VariantMatch)
        );
        assert_eq!(
            MatchClassification::from_label("SIMILAR_PRODUCT"),
            Some(MatchClassification::Similar)
        );
        assert_eq!(MatchClassification::from_label("DIFFERENT_PRODUCT"), None);
    }

    #[test]
    fn product_deserializes_from_empty_object() {
        let product: Product = serde_json::from_str("{}").unwrap();
        assert_eq!(product, Product::default());
    }

    #[test]
    fn product_tolerates_mixed_field_types() {
        let json = serde_json::json!({
            "id": 4412,
            "title": "Lakme 9to5 Primer",
            "price": "₹1,099",
            "original_price": null,
            "rating": "4.4",
            "reviews": "2,310",
            "is_popular": "true",
            "match_classification": "COLOR_VARIANT",
            "match_score": 87.6,
            "competitors": null
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.id, "4412");
        assert!((product.price - 1099.0).abs() < f64::EPSILON);
        assert_eq!(product.original_price, None);
        assert_eq!(product.rating, Some(4.4));
        assert_eq!(product.reviews, 2310);
        assert!(product.is_popular);
        assert_eq!(
            product.match_classification,
            Some(MatchClassification::VariantMatch)
        );
        assert_eq!(product.match_score, Some(88));
        assert!(product.competitors.is_empty());
    }

    #[test]
    fn out_of_range_rating_is_absent() {
        let product: Product = serde_json::from_str(r#"{"rating": 9.5}"#).unwrap();
        assert_eq!(product.rating, None);
    }

    #[test]
    fn zero_match_score_is_unknown() {
        let row: ComparisonRecord = serde_json::from_str(r#"{"match_score": 0}"#).unwrap();
        assert_eq!(row.match_score, None);
    }

    #[test]
    fn negative_price_becomes_zero() {
        let row: ComparisonRecord = serde_json::from_str(r#"{"price": -40}"#).unwrap();
        assert!(row.price.abs() < f64::EPSILON);
    }

    #[test]
    fn competitor_without_price_keeps_none() {
        let row: CompetitorRecord =
            serde_json::from_str(r#"{"name": "Flipkart", "url": "https://flipkart.com/x"}"#)
                .unwrap();
        assert_eq!(row.price, None);
        assert_eq!(row.seller(), "Flipkart");
    }

    #[test]
    fn competitor_seller_falls_back_to_source() {
        let row: CompetitorRecord =
            serde_json::from_str(r#"{"name": " ", "source": "Myntra"}"#).unwrap();
        assert_eq!(row.seller(), "Myntra");
    }

    #[test]
    fn product_survives_serialize_round_trip_for_cache() {
        let product = Product {
            id: "p-1".to_owned(),
            title: "Plum Green Tea Face Wash".to_owned(),
            price: 345.0,
            match_classification: Some(MatchClassification::ExactMatch),
            ..Product::default()
        };
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }
}
