//! Backend collaborators over HTTP

use super::{CatalogProvider, GatewayResult, SalesGateway};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use galeria_client::HttpClient;
use shared::{CatalogEntry, ItemCategory, Sale, SalePayload};

#[async_trait]
impl CatalogProvider for HttpClient {
    async fn list_active(&self, category: ItemCategory) -> GatewayResult<Vec<CatalogEntry>> {
        Ok(self.list_catalog(category).await?)
    }

    async fn delete_entry(&self, category: ItemCategory, id: &str) -> GatewayResult<()> {
        Ok(self.delete_catalog_entry(category, id).await?)
    }
}

#[async_trait]
impl SalesGateway for HttpClient {
    async fn create_sale(&self, payload: &SalePayload) -> GatewayResult<Sale> {
        Ok(HttpClient::create_sale(self, payload).await?)
    }

    async fn list_sales(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GatewayResult<Vec<Sale>> {
        Ok(HttpClient::list_sales(self, start, end).await?)
    }
}
