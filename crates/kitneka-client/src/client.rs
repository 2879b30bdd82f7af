//! HTTP client for the discovery backend.
//!
//! Every endpoint answers JSON; all but URL search are plain `GET`s. Non-2xx
//! responses surface as typed [`ClientError`] variants and transient failures
//! are retried with exponential back-off.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use kitneka_core::{
    similar_products, similar_query, AppConfig, ComparisonRecord, HistoryRange, PriceSeries,
    Product, SearchResults, SeasonalTip, SIMILAR_LIMIT,
};

use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::{CompareEnvelope, HistoryEnvelope, SearchEnvelope, TipsEnvelope};

/// Client for the discovery backend.
///
/// Use [`DiscoveryClient::new`] with the loaded [`AppConfig`], or
/// [`DiscoveryClient::with_base_url`] to point at a mock server in tests.
pub struct DiscoveryClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl DiscoveryClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `api_base` does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_base,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Creates a client against an explicit base URL.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure. Set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `base_url` is not an http(s) URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // A trailing slash keeps any path prefix when segments are appended.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "expected an http(s) URL".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Searches every channel for `query`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidInput`] if `query` is blank (no request is sent).
    /// - [`ClientError::RateLimited`] / [`ClientError::UnexpectedStatus`] /
    ///   [`ClientError::Http`] once retries are exhausted.
    /// - [`ClientError::Deserialize`] if the body is not valid JSON.
    pub async fn search(&self, query: &str) -> Result<SearchResults, ClientError> {
        let query = non_blank(query, "search query")?;
        let url = self.endpoint(&["discovery", "search"], &[("q", query)])?;
        let envelope: SearchEnvelope = self
            .request_json(Method::GET, url, &format!("search(q={query})"))
            .await?;
        let results = envelope.results.unwrap_or_default();
        tracing::debug!(
            query,
            online = results.online.len(),
            instagram = results.instagram.len(),
            local = results.local.len(),
            "search results received"
        );
        Ok(results)
    }

    /// Fetches cross-store comparison records for a product title.
    ///
    /// # Errors
    ///
    /// Same as [`DiscoveryClient::search`].
    pub async fn compare(&self, title: &str) -> Result<Vec<ComparisonRecord>, ClientError> {
        let title = non_blank(title, "product title")?;
        let url = self.endpoint(&["product", "compare"], &[("title", title)])?;
        let envelope: CompareEnvelope = self
            .request_json(Method::GET, url, &format!("compare(title={title})"))
            .await?;
        let records = envelope.into_records();
        tracing::debug!(title, count = records.len(), "comparison records received");
        Ok(records)
    }

    /// Searches for the product behind a store page URL.
    ///
    /// The backend scrapes the page and searches for what it finds; local
    /// sellers are ranked for `location`.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidInput`] if `product_url` is blank or not an
    /// http(s) URL (no request is sent), otherwise as
    /// [`DiscoveryClient::search`].
    pub async fn search_by_url(
        &self,
        product_url: &str,
        location: &str,
    ) -> Result<SearchResults, ClientError> {
        let product_url = non_blank(product_url, "product url")?;
        let is_web_url = Url::parse(product_url)
            .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host());
        if !is_web_url {
            return Err(ClientError::InvalidInput(format!(
                "product url must be an http(s) URL, got '{product_url}'"
            )));
        }

        let mut query = vec![("url", product_url)];
        if !location.trim().is_empty() {
            query.push(("location", location.trim()));
        }
        let url = self.endpoint(&["discovery", "search-by-url"], &query)?;
        let envelope: SearchEnvelope = self
            .request_json(Method::POST, url, &format!("search_by_url(url={product_url})"))
            .await?;
        let results = envelope.results.unwrap_or_default();
        tracing::debug!(
            product_url,
            online = results.online.len(),
            local = results.local.len(),
            "url search results received"
        );
        Ok(results)
    }

    /// Finds up to five online products similar to `product`, excluding itself.
    ///
    /// Returns an empty list without a request when no query can be built.
    ///
    /// # Errors
    ///
    /// Same as [`DiscoveryClient::search`].
    pub async fn similar(&self, product: &Product) -> Result<Vec<Product>, ClientError> {
        let Some(query) = similar_query(product) else {
            tracing::debug!(id = %product.id, "no similar-products query for product");
            return Ok(Vec::new());
        };
        let results = self.search(&query).await?;
        Ok(similar_products(&results.online, product, SIMILAR_LIMIT)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Fetches buying tips for the current shopping season.
    ///
    /// # Errors
    ///
    /// Same as [`DiscoveryClient::search`], minus the blank-input check.
    pub async fn seasonal_tips(&self) -> Result<Vec<SeasonalTip>, ClientError> {
        let url = self.endpoint(&["seasonality", "tips"], &[])?;
        let envelope: TipsEnvelope = self
            .request_json(Method::GET, url, "seasonal_tips")
            .await?;
        Ok(envelope.tips.unwrap_or_default())
    }

    /// Looks up a single product by id.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] for an unknown id, otherwise as
    /// [`DiscoveryClient::search`].
    pub async fn product(&self, id: &str) -> Result<Product, ClientError> {
        let id = non_blank(id, "product id")?;
        let url = self.endpoint(&["products", id], &[])?;
        self.request_json(Method::GET, url, &format!("product(id={id})")).await
    }

    /// Fetches per-store price history over `range`.
    ///
    /// # Errors
    ///
    /// Same as [`DiscoveryClient::product`].
    pub async fn price_history(
        &self,
        id: &str,
        range: HistoryRange,
    ) -> Result<Vec<PriceSeries>, ClientError> {
        let id = non_blank(id, "product id")?;
        let days = range.days().to_string();
        let url = self.endpoint(&["products", id, "history"], &[("days", days.as_str())])?;
        let envelope: HistoryEnvelope = self
            .request_json(Method::GET, url, &format!("price_history(id={id}, days={days})"))
            .await?;
        Ok(envelope.history.unwrap_or_default())
    }

    /// Appends path segments and query pairs to the base URL.
    ///
    /// Segments are percent-encoded, so ids containing `/` or `?` stay in one
    /// segment.
    pub(crate) fn endpoint(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        context: &str,
    ) -> Result<T, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let method = method.clone();
            async move {
                tracing::debug!(method = %method, url = %url, "requesting discovery endpoint");
                let response = self
                    .client
                    .request(method, url.clone())
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ClientError::RateLimited { retry_after_secs });
                }

                if status == StatusCode::NOT_FOUND {
                    return Err(ClientError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(ClientError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<T>(&body).map_err(|e| ClientError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}

fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidInput(format!("{what} must not be blank")));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
