//! HTTP client for network-based API calls

use crate::wire::{WireCatalogEntry, WireSale, WireSaleRequest};
use crate::{ClientConfig, ClientError, ClientResult};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{CatalogEntry, ItemCategory, Sale, SalePayload};

/// HTTP client for making requests to the shop backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request, ignoring any response body
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let response = self.client.delete(self.url(path)).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        tracing::debug!(status = status.as_u16(), body = %text, "Backend returned error status");
        Err(ClientError::from_status(status, text))
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    // ========== Catalog API ==========

    /// List the active entries of a catalog
    pub async fn list_catalog(&self, category: ItemCategory) -> ClientResult<Vec<CatalogEntry>> {
        let entries: Vec<WireCatalogEntry> = self.get(category.catalog_path()).await?;
        let total = entries.len();
        let active: Vec<CatalogEntry> = entries
            .into_iter()
            .filter(|e| e.active)
            .map(Into::into)
            .collect();
        tracing::debug!(%category, total, active = active.len(), "Catalog loaded");
        Ok(active)
    }

    /// Delete one catalog entry
    pub async fn delete_catalog_entry(&self, category: ItemCategory, id: &str) -> ClientResult<()> {
        if id.is_empty() {
            return Err(ClientError::InvalidRequest("empty catalog id".to_string()));
        }
        self.delete(&format!("{}/{}", category.catalog_path(), id))
            .await
    }

    // ========== Sales API ==========

    /// Create a sale (or expense)
    pub async fn create_sale(&self, payload: &SalePayload) -> ClientResult<Sale> {
        let sale: WireSale = self.post("sales", &WireSaleRequest::from(payload)).await?;
        Ok(sale.into())
    }

    /// Sales and expenses dated within `[start, end]`, in backend order
    pub async fn list_sales(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ClientResult<Vec<Sale>> {
        if start > end {
            return Err(ClientError::InvalidRequest(format!(
                "sales range starts after it ends ({start} > {end})"
            )));
        }
        let query = sales_range_query(start, end);
        let sales: Vec<WireSale> = self.get_with_query("sales", &query).await?;
        tracing::debug!(count = sales.len(), %start, %end, "Sales loaded");
        Ok(sales.into_iter().map(Into::into).collect())
    }
}

/// `start`/`end` as ISO-8601 with millisecond precision, like the backend stores them
fn sales_range_query(start: DateTime<Utc>, end: DateTime<Utc>) -> [(&'static str, String); 2] {
    [
        ("start", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ("end", end.to_rfc3339_opts(SecondsFormat::Millis, true)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_single_slash() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:4000/api/")).unwrap();
        assert_eq!(client.url("/sales"), "http://localhost:4000/api/sales");
        assert_eq!(client.url("ceramics/c1"), "http://localhost:4000/api/ceramics/c1");
    }

    #[tokio::test]
    async fn test_delete_rejects_empty_id() {
        let client = HttpClient::new(&ClientConfig::default()).unwrap();
        let err = client
            .delete_catalog_entry(ItemCategory::Ceramic, "")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
        assert!(err.is_rejection());
    }

    #[test]
    fn test_sales_range_query_format() {
        let start: DateTime<Utc> = "2026-03-02T00:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2026-03-02T23:59:59.999Z".parse().unwrap();
        let query = sales_range_query(start, end);
        assert_eq!(query[0], ("start", "2026-03-02T00:00:00.000Z".to_string()));
        assert_eq!(query[1], ("end", "2026-03-02T23:59:59.999Z".to_string()));
    }

    #[tokio::test]
    async fn test_list_sales_rejects_inverted_range() {
        let client = HttpClient::new(&ClientConfig::default()).unwrap();
        let start: DateTime<Utc> = "2026-03-03T00:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2026-03-02T00:00:00Z".parse().unwrap();
        let err = client.list_sales(start, end).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }
}
