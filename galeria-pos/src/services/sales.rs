use super::{GatewayError, GatewayResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{ExpenseError, Sale, SalePayload};
use thiserror::Error;

/// Backend endpoint that records sales
#[async_trait]
pub trait SalesGateway: Send + Sync {
    async fn create_sale(&self, payload: &SalePayload) -> GatewayResult<Sale>;

    /// Sales and expenses dated within `[start, end]`
    async fn list_sales(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> GatewayResult<Vec<Sale>>;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpenseRecordError {
    #[error(transparent)]
    Invalid(#[from] ExpenseError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Record a cash expense (negative sale); validated before any network call
pub async fn record_expense(
    gateway: &dyn SalesGateway,
    description: &str,
    amount: f64,
) -> Result<Sale, ExpenseRecordError> {
    let payload = SalePayload::expense(description, amount, shared::util::now())?;
    let sale = gateway.create_sale(&payload).await.inspect_err(|e| {
        tracing::error!(error = %e, description, "Failed to record expense");
    })?;
    tracing::info!(sale_id = %sale.id, amount, "Expense recorded");
    Ok(sale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingGateway {
        payloads: Mutex<Vec<SalePayload>>,
    }

    #[async_trait]
    impl SalesGateway for RecordingGateway {
        async fn create_sale(&self, payload: &SalePayload) -> GatewayResult<Sale> {
            self.payloads.lock().push(payload.clone());
            Ok(Sale {
                id: "exp-1".to_string(),
                products: vec![],
                ceramics: vec![],
                total_amount: payload.total_amount,
                customer: payload.customer.clone(),
                date: payload.date,
                is_expense: payload.is_expense,
            })
        }

        async fn list_sales(
            &self,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> GatewayResult<Vec<Sale>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_record_expense_sends_negative_total() {
        let gateway = RecordingGateway::default();
        let sale = record_expense(&gateway, "Leche", 8.0).await.unwrap();
        assert_eq!(sale.total_amount, -8.0);
        assert!(sale.is_expense);
        assert_eq!(gateway.payloads.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_expense_never_reaches_gateway() {
        let gateway = RecordingGateway::default();
        let err = record_expense(&gateway, "Leche", -2.0).await.unwrap_err();
        assert_eq!(
            err,
            ExpenseRecordError::Invalid(ExpenseError::InvalidAmount(-2.0))
        );
        assert!(gateway.payloads.lock().is_empty());
    }
}
