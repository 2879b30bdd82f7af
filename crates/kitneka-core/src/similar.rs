//! "Similar products" shelf shown under a product's offers.

use std::sync::LazyLock;

use regex::Regex;

use crate::records::Product;

/// Maximum similar products shown for one product.
pub const SIMILAR_LIMIT: usize = 5;

// Model and batch codes such as "SPF50" or "B0C1234" narrow a search to the
// same item.
static MODEL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z0-9]{4,}").expect("valid model code regex"));

/// Builds the search query for products similar to `product`.
///
/// Uses `"{brand} {category}"` with model codes removed, falling back to the
/// title when brand and category are both blank. Returns `None` when nothing
/// usable is left.
#[must_use]
pub fn similar_query(product: &Product) -> Option<String> {
    let base = format!("{} {}", product.brand.trim(), product.category.trim());
    let query = strip_model_codes(&base);
    if !query.is_empty() {
        return Some(query);
    }
    Some(strip_model_codes(&product.title)).filter(|q| !q.is_empty())
}

fn strip_model_codes(raw: &str) -> String {
    MODEL_CODE_RE
        .replace_all(raw, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Picks up to `limit` search results that are not `current` itself.
///
/// Results are compared by id; when either side has no id, by trimmed,
/// case-insensitive title. Server order is kept.
#[must_use]
pub fn similar_products<'a>(
    candidates: &'a [Product],
    current: &Product,
    limit: usize,
) -> Vec<&'a Product> {
    candidates
        .iter()
        .filter(|candidate| !is_same_product(candidate, current))
        .take(limit)
        .collect()
}

fn is_same_product(a: &Product, b: &Product) -> bool {
    let (id_a, id_b) = (a.id.trim(), b.id.trim());
    if !id_a.is_empty() && !id_b.is_empty() {
        return id_a == id_b;
    }
    let title_a = a.title.trim().to_lowercase();
    !title_a.is_empty() && title_a == b.title.trim().to_lowercase()
}
