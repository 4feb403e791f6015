//! Table tab module
//!
//! - **store**: `TableOrderStore`, the per-table in-progress orders
//! - **storage**: redb-backed durable key-value store
//! - **money**: decimal totals and line validation
//! - **selection**: product-selection sheet feeding `merge_items`
//! - **checkout**: settles a table against the sales backend
//!
//! # Architecture
//!
//! ```text
//! SelectionSheet ──merge_items──▶ TableOrderStore ──▶ KvStore (redb)
//!                                      │    │
//!                 CheckoutCoordinator ─┘    └─▶ broadcast (full map)
//!                        │
//!                 SalesGateway / CatalogProvider
//! ```

pub mod checkout;
pub mod error;
pub mod money;
pub mod selection;
pub mod storage;
pub mod store;

// Re-exports
pub use checkout::{CheckoutCoordinator, CheckoutError, CheckoutReceipt, build_sale_payload};
pub use error::{StoreError, StoreResult};
pub use selection::{SelectionRow, SelectionSheet};
pub use storage::{KvStore, RedbKvStore, StorageError, StorageResult};
pub use store::{TABLE_ORDERS_KEY, TableOrderMap, TableOrderStore};
