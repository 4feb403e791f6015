//! 销售历史 - sales already confirmed by the backend
//!
//! - **summary**: bucketing by local day, week/month views, activity rows
//! - **service**: `SalesHistory`, loads a range through `SalesGateway`

pub mod service;
pub mod summary;

pub use service::{HistoryError, HistoryResult, SalesHistory};
pub use summary::{ActivityEntry, DaySummary, PeriodSummary, PeriodView};
