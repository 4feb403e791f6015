//! Checkout - settle a table's tab against the sales backend
//!
//! ```text
//! settle(table)
//!     ├─ 1. Read items; empty → EmptyOrder (no network)
//!     ├─ 2. Partition into products / ceramics
//!     ├─ 3. create_sale → Err: order untouched
//!     ├─ 4. Delete sold ceramics from inventory (best-effort)
//!     └─ 5. clear_table
//! ```
//!
//! The store is not locked while the sale is in flight; callers must not
//! submit the same table twice concurrently.

use super::money;
use super::store::TableOrderStore;
use crate::services::{CatalogProvider, GatewayError, SalesGateway};
use chrono::{DateTime, Utc};
use shared::{LineItem, SaleLine, SalePayload};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    #[error("Table {0} has no items to settle")]
    EmptyOrder(u32),

    #[error("Sale rejected: {0}")]
    Gateway(#[from] GatewayError),
}

/// Outcome of a successful checkout
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub sale_id: String,
    pub table_number: u32,
    pub total: f64,
    /// Ceramic inventory deletions that failed after the sale went through
    pub ceramic_cleanup_failures: Vec<String>,
}

/// Split a tab into the sales payload
pub fn build_sale_payload(
    items: &[LineItem],
    customer: Option<String>,
    date: DateTime<Utc>,
) -> SalePayload {
    let (ceramics, products): (Vec<&LineItem>, Vec<&LineItem>) = items
        .iter()
        .partition(|item| item.category.is_one_off());
    SalePayload {
        products: products.into_iter().map(SaleLine::from).collect(),
        ceramics: ceramics.into_iter().map(SaleLine::from).collect(),
        total_amount: money::order_total(items),
        customer,
        date,
        is_expense: false,
    }
}

pub struct CheckoutCoordinator {
    store: Arc<TableOrderStore>,
    sales: Arc<dyn SalesGateway>,
    catalog: Arc<dyn CatalogProvider>,
}

impl std::fmt::Debug for CheckoutCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutCoordinator")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl CheckoutCoordinator {
    pub fn new(
        store: Arc<TableOrderStore>,
        sales: Arc<dyn SalesGateway>,
        catalog: Arc<dyn CatalogProvider>,
    ) -> Self {
        Self {
            store,
            sales,
            catalog,
        }
    }

    pub fn store(&self) -> &Arc<TableOrderStore> {
        &self.store
    }

    /// Settle the table's order
    pub async fn settle(
        &self,
        table: u32,
        customer: Option<String>,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let items = self.store.get_items(table);
        if items.is_empty() {
            tracing::warn!(table, "Checkout rejected: table has no items");
            return Err(CheckoutError::EmptyOrder(table));
        }

        let payload = build_sale_payload(&items, customer, shared::util::now());
        let total = payload.total_amount;
        tracing::info!(
            table,
            total,
            products = payload.products.len(),
            ceramics = payload.ceramics.len(),
            "Submitting sale"
        );

        let sale = match self.sales.create_sale(&payload).await {
            Ok(sale) => sale,
            Err(e) => {
                tracing::error!(table, error = %e, "Sale rejected, table order kept");
                return Err(e.into());
            }
        };

        let mut ceramic_cleanup_failures = Vec::new();
        for item in items.iter().filter(|item| item.category.is_one_off()) {
            if let Err(e) = self.catalog.delete_entry(item.category, &item.item_id).await {
                tracing::warn!(
                    table,
                    ceramic_id = %item.item_id,
                    error = %e,
                    "Failed to remove sold ceramic from inventory"
                );
                ceramic_cleanup_failures.push(item.item_id.clone());
            }
        }

        self.store.clear_table(table);
        tracing::info!(table, sale_id = %sale.id, total, "Table settled");

        Ok(CheckoutReceipt {
            sale_id: sale.id,
            table_number: table,
            total,
            ceramic_cleanup_failures,
        })
    }
}
