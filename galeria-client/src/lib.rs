//! Galería Client - HTTP client for the shop backend
//!
//! Provides network-based HTTP calls to the catalog and sales API.

pub mod config;
pub mod error;
pub mod http;
mod wire;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::{CatalogEntry, ItemCategory, Sale, SaleLine, SalePayload};
