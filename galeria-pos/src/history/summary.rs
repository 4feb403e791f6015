//! Day and period summaries over confirmed sales
//!
//! Sales are bucketed by their local calendar day in the shop's time zone.
//! Expenses (negative totals) count against the day they were recorded.

use crate::orders::money;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use shared::Sale;

/// One row of the recent-activity list
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub sale_id: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
    pub is_expense: bool,
}

impl From<&Sale> for ActivityEntry {
    fn from(sale: &Sale) -> Self {
        Self {
            sale_id: sale.id.clone(),
            date: sale.date,
            description: sale.description(),
            amount: sale.total_amount,
            is_expense: sale.is_expense_entry(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub sales: Vec<Sale>,
    pub expenses: Vec<Sale>,
    /// Net total: sales minus expenses
    pub total: f64,
}

impl DaySummary {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            sales: Vec::new(),
            expenses: Vec::new(),
            total: 0.0,
        }
    }

    pub fn income(&self) -> f64 {
        money::sum_amounts(self.sales.iter().map(|s| s.total_amount))
    }

    /// Σ of expense amounts (≤ 0)
    pub fn expense_total(&self) -> f64 {
        money::sum_amounts(self.expenses.iter().map(|s| s.total_amount))
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty() && self.expenses.is_empty()
    }

    /// Sales and expenses together, newest first
    pub fn activity(&self) -> Vec<ActivityEntry> {
        let mut entries: Vec<ActivityEntry> = self
            .sales
            .iter()
            .chain(self.expenses.iter())
            .map(ActivityEntry::from)
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    fn push(&mut self, sale: Sale) {
        if sale.is_expense_entry() {
            self.expenses.push(sale);
        } else {
            self.sales.push(sale);
        }
    }

    fn recompute_total(&mut self) {
        self.total = money::sum_amounts(
            self.sales
                .iter()
                .chain(self.expenses.iter())
                .map(|s| s.total_amount),
        );
    }
}

/// Calendar views offered by the history screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodView {
    /// Monday through Sunday around the anchor day
    Week,
    /// Every day of the anchor's month
    Month,
}

impl PeriodView {
    pub fn days(self, anchor: NaiveDate) -> Vec<NaiveDate> {
        match self {
            PeriodView::Week => {
                let offset = u64::from(anchor.weekday().num_days_from_monday());
                let monday = anchor - Days::new(offset);
                monday.iter_days().take(7).collect()
            }
            PeriodView::Month => {
                let month = anchor.month();
                let first = anchor - Days::new(u64::from(anchor.day0()));
                first
                    .iter_days()
                    .take_while(|d| d.month() == month)
                    .collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub days: Vec<DaySummary>,
    pub total: f64,
}

impl PeriodSummary {
    pub fn day(&self, date: NaiveDate) -> Option<&DaySummary> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn income(&self) -> f64 {
        money::sum_amounts(self.days.iter().map(DaySummary::income))
    }

    pub fn expense_total(&self) -> f64 {
        money::sum_amounts(self.days.iter().map(DaySummary::expense_total))
    }
}

/// UTC instant of local midnight; `None` if the zone skips it
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `[start of first, end of last]` in UTC, end inclusive to the millisecond
pub fn local_range<Tz: TimeZone>(
    tz: &Tz,
    first: NaiveDate,
    last: NaiveDate,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_midnight(tz, first)?;
    let end = local_midnight(tz, last.succ_opt()?)? - TimeDelta::milliseconds(1);
    (start <= end).then_some((start, end))
}

/// Bucket `sales` into `days`; sales falling outside are ignored
pub fn summarize<Tz: TimeZone>(tz: &Tz, days: &[NaiveDate], sales: Vec<Sale>) -> PeriodSummary {
    let mut buckets: Vec<DaySummary> = days.iter().copied().map(DaySummary::empty).collect();
    for sale in sales {
        let local_day = sale.date.with_timezone(tz).date_naive();
        match buckets.iter_mut().find(|d| d.date == local_day) {
            Some(bucket) => bucket.push(sale),
            None => tracing::debug!(sale_id = %sale.id, %local_day, "Sale outside period"),
        }
    }
    for bucket in &mut buckets {
        bucket.recompute_total();
    }
    let total = money::sum_amounts(buckets.iter().map(|d| d.total));
    PeriodSummary {
        days: buckets,
        total,
    }
}
