use super::summary::{self, DaySummary, PeriodSummary, PeriodView};
use crate::services::{GatewayError, SalesGateway};
use chrono::{NaiveDate, TimeZone};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    /// Local midnight does not exist for this date in the shop's zone
    #[error("Cannot resolve local day range for {0}")]
    UnresolvableDay(NaiveDate),

    #[error("Could not load sales: {0}")]
    Gateway(#[from] GatewayError),
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// Read side of the sales backend: daily activity and calendar totals
pub struct SalesHistory {
    gateway: Arc<dyn SalesGateway>,
}

impl std::fmt::Debug for SalesHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesHistory").finish_non_exhaustive()
    }
}

impl SalesHistory {
    pub fn new(gateway: Arc<dyn SalesGateway>) -> Self {
        Self { gateway }
    }

    /// One local day's sales and expenses
    pub async fn day<Tz: TimeZone>(&self, tz: &Tz, date: NaiveDate) -> HistoryResult<DaySummary> {
        let period = self.load(tz, &[date]).await?;
        Ok(period
            .day(date)
            .cloned()
            .unwrap_or_else(|| DaySummary::empty(date)))
    }

    /// Every day of the week or month containing `anchor`
    pub async fn period<Tz: TimeZone>(
        &self,
        tz: &Tz,
        view: PeriodView,
        anchor: NaiveDate,
    ) -> HistoryResult<PeriodSummary> {
        let days = view.days(anchor);
        let summary = self.load(tz, &days).await?;
        tracing::debug!(
            ?view,
            %anchor,
            total = summary.total,
            income = summary.income(),
            expenses = summary.expense_total(),
            active_days = summary.days.iter().filter(|d| !d.is_empty()).count(),
            "Sales period summarized"
        );
        Ok(summary)
    }

    async fn load<Tz: TimeZone>(&self, tz: &Tz, days: &[NaiveDate]) -> HistoryResult<PeriodSummary> {
        let (Some(&first), Some(&last)) = (days.first(), days.last()) else {
            return Ok(PeriodSummary {
                days: Vec::new(),
                total: 0.0,
            });
        };
        let (start, end) = summary::local_range(tz, first, last)
            .ok_or(HistoryError::UnresolvableDay(first))?;
        let sales = self.gateway.list_sales(start, end).await.inspect_err(|e| {
            tracing::error!(error = %e, %first, %last, "Failed to load sales history");
        })?;
        Ok(summary::summarize(tz, days, sales))
    }
}
