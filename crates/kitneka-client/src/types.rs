//! Response envelopes for the discovery endpoints.

use serde::Deserialize;

use kitneka_core::{ComparisonRecord, PriceSeries, SearchResults, SeasonalTip};

/// `GET /discovery/search` and `POST /discovery/search-by-url` body.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
    #[serde(default)]
    pub results: Option<SearchResults>,
}

/// `GET /product/compare` body: older deployments return a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CompareEnvelope {
    Bare(Vec<ComparisonRecord>),
    Wrapped {
        #[serde(default)]
        results: Option<Vec<ComparisonRecord>>,
    },
}

impl CompareEnvelope {
    pub fn into_records(self) -> Vec<ComparisonRecord> {
        match self {
            CompareEnvelope::Bare(records) => records,
            CompareEnvelope::Wrapped { results } => results.unwrap_or_default(),
        }
    }
}

/// `GET /products/{id}/history` body.
#[derive(Debug, Deserialize)]
pub(crate) struct HistoryEnvelope {
    #[serde(default)]
    pub history: Option<Vec<PriceSeries>>,
}

/// `GET /seasonality/tips` body.
#[derive(Debug, Deserialize)]
pub(crate) struct TipsEnvelope {
    #[serde(default)]
    pub tips: Option<Vec<SeasonalTip>>,
}
