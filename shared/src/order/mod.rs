//! Table order types
//!
//! A table order (tab) is the running, unpaid list of line items for one
//! physical table. It is keyed by table number; invariants are enforced by
//! the store that owns it, these are plain data.

pub mod table_order;

// Re-exports
pub use table_order::{LineItem, TableOrder};
