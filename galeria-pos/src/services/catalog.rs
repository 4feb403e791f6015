use super::GatewayResult;
use async_trait::async_trait;
use shared::{CatalogEntry, ItemCategory};

/// Source of purchasable items
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Active entries of one catalog
    async fn list_active(&self, category: ItemCategory) -> GatewayResult<Vec<CatalogEntry>>;

    /// Remove a sold one-off entry from inventory
    async fn delete_entry(&self, category: ItemCategory, id: &str) -> GatewayResult<()>;
}
