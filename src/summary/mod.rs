//! Summaries of spending over time.
//!
//! This module groups expenses by month, ISO week and category, and computes
//! a running total. The aggregation functions are pure and work on any slice
//! of expenses; the handlers fetch expenses from the store first.

mod aggregation;
mod handlers;
mod range;

pub use aggregation::{
    Bucket, CategoryTotal, CumulativePoint, MonthlyBucket, WeeklyBucket, by_category, cumulative,
    monthly, weekly,
};
pub use handlers::{
    get_category_summary, get_cumulative_summary, get_monthly_summary, get_weekly_summary,
};
pub(crate) use aggregation::{add_amount, checked_total};
pub use range::DateRange;
pub(crate) use range::fetch_expenses_in_range;
