//! Errors returned by [`HttpClient`](crate::HttpClient)

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, timeout or TLS failure before any status arrived
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// 4xx
    #[error("Backend refused request ({status}): {message}")]
    Refused { status: u16, message: String },

    /// 5xx or any other non-success status
    #[error("Backend failure ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Body did not decode into the expected shape
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Rejected locally, nothing was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Classify a non-success response; an empty body falls back to the reason phrase
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            body
        };
        let status_code = status.as_u16();
        if status.is_client_error() {
            ClientError::Refused {
                status: status_code,
                message,
            }
        } else {
            ClientError::Backend {
                status: status_code,
                message,
            }
        }
    }

    /// Whether retrying the same request cannot succeed
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ClientError::Refused { .. } | ClientError::InvalidRequest(_)
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
