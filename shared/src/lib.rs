//! Shared types for the Galería point of sale
//!
//! Plain data model used by both the HTTP client and the table-tab core:
//! catalog entries, table orders and sale payloads.

pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use models::{CatalogEntry, ExpenseError, ItemCategory, Sale, SaleLine, SalePayload};
pub use order::{LineItem, TableOrder};
pub use serde::{Deserialize, Serialize};
