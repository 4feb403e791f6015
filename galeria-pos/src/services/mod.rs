//! 服务层 - collaborators of the table-tab core
//!
//! # 服务列表
//!
//! - [`CatalogProvider`] - active menu/ceramic items, one-off inventory removal
//! - [`SalesGateway`] - accepts finalized sales and expenses, lists them by date
//!
//! Both are implemented for [`galeria_client::HttpClient`] in [`http`].

pub mod catalog;
pub mod http;
pub mod sales;

pub use catalog::CatalogProvider;
pub use sales::{ExpenseRecordError, SalesGateway, record_expense};

use galeria_client::ClientError;
use thiserror::Error;

/// Errors surfaced by remote collaborators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The backend answered and refused the request
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or failed internally
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Decode(e) => GatewayError::InvalidResponse(e.to_string()),
            e if e.is_rejection() => GatewayError::Rejected(e.to_string()),
            e => GatewayError::Unavailable(e.to_string()),
        }
    }
}
