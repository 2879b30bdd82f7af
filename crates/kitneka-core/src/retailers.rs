use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Marketplaces and brand stores treated as verified.
pub const DEFAULT_POPULAR_RETAILERS: &[&str] = &[
    "Amazon",
    "Flipkart",
    "Myntra",
    "IKEA",
    "H&M",
    "Zara",
    "Nike",
    "Adidas",
    "Uniqlo",
    "Tata CLiQ",
    "Nykaa",
    "Ajio",
    "Michael Kors",
    "Lakme",
    "Sephora",
];

/// Stores that mostly sell trial or sample sizes.
pub const DEFAULT_SAMPLE_STORES: &[&str] =
    &["Smytten", "MyGlamm", "FreeCultr", "Vaana", "GharStuff"];

/// Seller name lists consulted by the ranker and the recommendation scorer.
///
/// Matching is a case-insensitive substring test against the seller name, so
/// `"Amazon"` also matches `"Amazon.in"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerLists {
    #[serde(default)]
    pub popular: Vec<String>,
    #[serde(default)]
    pub sample_stores: Vec<String>,
}

impl Default for RetailerLists {
    fn default() -> Self {
        Self {
            popular: DEFAULT_POPULAR_RETAILERS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            sample_stores: DEFAULT_SAMPLE_STORES
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

impl RetailerLists {
    /// Returns `true` if `seller` contains any popular retailer name.
    #[must_use]
    pub fn is_popular(&self, seller: &str) -> bool {
        contains_any(seller, &self.popular)
    }

    /// Returns `true` if `seller` contains any sample-store name.
    #[must_use]
    pub fn is_sample_store(&self, seller: &str) -> bool {
        contains_any(seller, &self.sample_stores)
    }
}

fn contains_any(seller: &str, needles: &[String]) -> bool {
    let seller = seller.to_lowercase();
    needles
        .iter()
        .map(|n| n.trim().to_lowercase())
        .any(|n| !n.is_empty() && seller.contains(&n))
}

/// Load and validate retailer lists from a YAML file.
///
/// ```yaml
/// popular: [Amazon, Flipkart, Nykaa]
/// sample_stores: [Smytten]
/// ```
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_retailers(path: &Path) -> Result<RetailerLists, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RetailersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let lists: RetailerLists =
        serde_yaml::from_str(&content).map_err(ConfigError::RetailersFileParse)?;

    validate_retailers(&lists)?;

    Ok(lists)
}

fn validate_retailers(lists: &RetailerLists) -> Result<(), ConfigError> {
    for (label, names) in [
        ("popular", &lists.popular),
        ("sample_stores", &lists.sample_stores),
    ] {
        let mut seen = HashSet::new();
        for name in names {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{label} entries must be non-empty"
                )));
            }
            if !seen.insert(name.trim().to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate {label} entry: '{name}'"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "retailers_test.rs"]
mod tests;
