pub mod app_config;
pub mod config;
pub mod history;
pub mod normalize;
pub mod offers;
pub mod rank;
pub mod recommend;
pub mod records;
pub mod retailers;
pub mod search;
pub mod similar;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use history::{
    flatten_history, lowest_point, HistoryRange, HistoryRow, PricePoint, PriceSeries,
};
pub use normalize::normalize_offers;
pub use offers::{Offer, OfferOrigin};
pub use rank::{rank_offers, RankedOffers};
pub use recommend::{recommend, Recommendation, Verdict};
pub use records::{
    ComparisonRecord, CompetitorRecord, MatchClassification, Product, SeasonalTip,
};
pub use retailers::{load_retailers, RetailerLists};
pub use search::{
    filter_results, rank_by_engagement, FilterScope, ResultFilter, SearchResults, SortOrder,
};
pub use similar::{similar_products, similar_query, SIMILAR_LIMIT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read retailers file {path}: {source}")]
    RetailersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse retailers file: {0}")]
    RetailersFileParse(#[source] serde_yaml::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
