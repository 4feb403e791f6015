use thiserror::Error;

/// Validation errors raised by [`TableOrderStore`](super::TableOrderStore)
///
/// All of them are detected before any state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Invalid table number: {0}")]
    InvalidTable(u32),

    #[error("Invalid quantity for {item_id}: {quantity}")]
    InvalidQuantity { item_id: String, quantity: i32 },

    #[error("Invalid price for {item_id}: {price}")]
    InvalidPrice { item_id: String, price: f64 },

    #[error("Duplicate item in replacement list: {0}")]
    DuplicateItem(String),

    #[error("Item {item_id} not found on table {table}")]
    ItemNotFound { table: u32, item_id: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
