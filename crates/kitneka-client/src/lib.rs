pub mod cache;
pub mod client;
pub mod error;
mod retry;
mod types;

pub use cache::{cache_key, load_product, ProductCache};
pub use client::DiscoveryClient;
pub use error::ClientError;
