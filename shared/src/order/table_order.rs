use crate::models::{CatalogEntry, ItemCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One catalog entry plus a requested quantity within a table order
///
/// `name` and `unit_price` are captured when the line is added and are not
/// re-fetched afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i32,
    pub category: ItemCategory,
}

impl LineItem {
    pub fn new(
        item_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        quantity: i32,
        category: ItemCategory,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            unit_price,
            quantity,
            category,
        }
    }

    /// Capture a catalog entry at its current price
    pub fn from_catalog(entry: &CatalogEntry, category: ItemCategory, quantity: i32) -> Self {
        Self::new(&entry.id, &entry.name, entry.price, quantity, category)
    }
}

/// In-progress order for one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableOrder {
    pub table_number: u32,
    pub items: Vec<LineItem>,
    /// Cached Σ(unit_price × quantity), rewritten on every mutation
    pub total: f64,
    pub last_updated: DateTime<Utc>,
}

impl TableOrder {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find_item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    /// Total units across all lines
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }
}
