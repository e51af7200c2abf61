mod client;
mod config;

pub use client::QdrantClient;
pub use config::{AuthScheme, DEFAULT_BATCH_SIZE, DEFAULT_SOFT_DELETE_THRESHOLD, DEFAULT_URL, QdrantConfig};
