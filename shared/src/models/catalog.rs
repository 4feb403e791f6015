//! Catalog Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which catalog an item comes from
///
/// Determines how a line is routed at checkout: beverage/food lines go to
/// the sale's `products` list, ceramics to `ceramics` and are removed from
/// inventory afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    BeverageFood,
    Ceramic,
}

impl ItemCategory {
    /// Backend collection path for this category
    pub fn catalog_path(self) -> &'static str {
        match self {
            ItemCategory::BeverageFood => "products",
            ItemCategory::Ceramic => "ceramics",
        }
    }

    /// Ceramics are one-off physical pieces
    pub fn is_one_off(self) -> bool {
        matches!(self, ItemCategory::Ceramic)
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCategory::BeverageFood => write!(f, "beverage/food"),
            ItemCategory::Ceramic => write!(f, "ceramic"),
        }
    }
}

/// Catalog entry (product or ceramic) as offered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub active: bool,
    /// Image URL (ceramics only)
    pub image_ref: Option<String>,
}
