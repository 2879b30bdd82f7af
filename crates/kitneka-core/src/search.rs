//! Search result envelope plus the trust filter and sort applied to it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::records::{de_list, MatchClassification, Product};

/// Results per query, partitioned by channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default, deserialize_with = "de_list")]
    pub online: Vec<Product>,
    #[serde(default, deserialize_with = "de_list")]
    pub instagram: Vec<Product>,
    #[serde(default, deserialize_with = "de_list")]
    pub local: Vec<Product>,
}

impl SearchResults {
    /// `true` when neither online nor local results exist (the "no results" state).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.online.is_empty() && self.local.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterScope {
    /// Popular marketplaces, official brand stores and exact matches only.
    #[default]
    Popular,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep the backend's ranking.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFilter {
    pub scope: FilterScope,
    pub clean_beauty_only: bool,
    /// Inclusive `(min, max)` price bounds.
    pub price_range: Option<(f64, f64)>,
    pub sort: SortOrder,
}

/// Applies price bounds, trust filtering and sort order to search results.
#[must_use]
pub fn filter_results<'a>(items: &'a [Product], filter: &ResultFilter) -> Vec<&'a Product> {
    let mut kept: Vec<&Product> = items
        .iter()
        .filter(|item| {
            if let Some((min, max)) = filter.price_range {
                if item.price < min || item.price > max {
                    return false;
                }
            }

            if filter.clean_beauty_only
                && !(item.is_clean_beauty && (item.is_official || item.is_popular))
            {
                return false;
            }

            match filter.scope {
                FilterScope::All => true,
                FilterScope::Popular => {
                    item.is_popular
                        || item.is_official
                        || item.match_classification == Some(MatchClassification::ExactMatch)
                }
            }
        })
        .collect();

    match filter.sort {
        SortOrder::Relevance => {}
        SortOrder::PriceAsc => kept.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOrder::PriceDesc => kept.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }

    kept
}

/// Engagement score used by the grouped brand view: `rating × ln(reviews + 1)`.
#[must_use]
pub fn engagement_score(item: &Product) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let reviews = item.reviews as f64;
    item.rating.unwrap_or(0.0) * (reviews + 1.0).ln()
}

/// Dedupes by `id + title`, orders by [`engagement_score`] and keeps `limit` items.
#[must_use]
pub fn rank_by_engagement<'a, I>(items: I, limit: usize) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut seen = HashSet::new();
    let mut unique: Vec<&Product> = items
        .into_iter()
        .filter(|item| seen.insert(format!("{}{}", item.id, item.title)))
        .collect();
    unique.sort_by(|a, b| engagement_score(b).total_cmp(&engagement_score(a)));
    unique.truncate(limit);
    unique
}
