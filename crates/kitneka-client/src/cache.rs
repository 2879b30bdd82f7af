//! On-disk cache of product records, keyed by product id.
//!
//! Search results are written here so a later `compare` or `history` call can
//! resolve a product without a second lookup. A missing or unreadable entry is
//! always a cache miss, never an error.

use std::path::PathBuf;

use sha2::{Digest, Sha256};

use kitneka_core::Product;

use crate::client::DiscoveryClient;
use crate::error::ClientError;

/// Hex-encoded SHA-256 of the trimmed product id.
#[must_use]
pub fn cache_key(id: &str) -> String {
    format!("{:x}", Sha256::digest(id.trim().as_bytes()))
}

#[derive(Debug, Clone)]
pub struct ProductCache {
    dir: PathBuf,
}

impl ProductCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File that holds the cached record for `id`.
    #[must_use]
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("product_{}.json", cache_key(id)))
    }

    /// Returns the cached product, or `None` when absent or unreadable.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Product> {
        if id.trim().is_empty() {
            return None;
        }
        let path = self.path_for(id);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read cached product");
                return None;
            }
        };
        match serde_json::from_slice::<Product>(&bytes) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "discarding corrupt cached product"
                );
                None
            }
        }
    }

    /// Writes `product` under its id, creating the cache directory if needed.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidInput`] if the product has a blank id.
    /// - [`ClientError::Cache`] if the directory or file cannot be written.
    pub fn put(&self, product: &Product) -> Result<(), ClientError> {
        if product.id.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "cannot cache a product without an id".to_owned(),
            ));
        }
        let path = self.path_for(&product.id);
        let cache_err = |source: std::io::Error| ClientError::Cache {
            path: path.display().to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(cache_err)?;
        let body = serde_json::to_vec(product).map_err(|e| cache_err(std::io::Error::other(e)))?;
        std::fs::write(&path, body).map_err(cache_err)?;
        tracing::debug!(id = %product.id, path = %path.display(), "cached product");
        Ok(())
    }
}

/// Resolves a product from the cache, falling back to the backend.
///
/// A product fetched from the backend is written back to the cache; a failed
/// write is logged and does not fail the lookup.
///
/// # Errors
///
/// Returns [`ClientError`] from [`DiscoveryClient::product`] on a cache miss.
pub async fn load_product(
    client: &DiscoveryClient,
    cache: &ProductCache,
    id: &str,
) -> Result<Product, ClientError> {
    if id.trim().is_empty() {
        return Err(ClientError::InvalidInput(
            "product id must not be blank".to_owned(),
        ));
    }
    if let Some(product) = cache.get(id) {
        tracing::debug!(id, "product served from cache");
        return Ok(product);
    }

    let product = client.product(id).await?;
    if let Err(e) = cache.put(&product) {
        tracing::warn!(id, error = %e, "failed to cache product");
    }
    Ok(product)
}
