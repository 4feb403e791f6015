//! Data models
//!
//! Shared between the POS core and the backend client (via API).

pub mod catalog;
pub mod sale;

// Re-exports
pub use catalog::*;
pub use sale::*;
