//! Route handlers for the expense summaries.

use axum::{Json, extract::State};

use crate::{
    Error,
    expense::ExpenseState,
    extract::ValidQuery,
    summary::{
        aggregation::{
            CategoryTotal, CumulativePoint, MonthlyBucket, WeeklyBucket, by_category, cumulative,
            monthly, weekly,
        },
        range::{DateRange, fetch_expenses_in_range},
    },
};

/// Get the total spent in each calendar month, optionally limited to a date range.
pub async fn get_monthly_summary(
    State(state): State<ExpenseState>,
    ValidQuery(range): ValidQuery<DateRange>,
) -> Result<Json<Vec<MonthlyBucket>>, Error> {
    let expenses = fetch_expenses_in_range(&state.expense_store, range)?;

    Ok(Json(monthly(&expenses)?))
}

/// Get the total spent in each ISO week, optionally limited to a date range.
pub async fn get_weekly_summary(
    State(state): State<ExpenseState>,
    ValidQuery(range): ValidQuery<DateRange>,
) -> Result<Json<Vec<WeeklyBucket>>, Error> {
    let expenses = fetch_expenses_in_range(&state.expense_store, range)?;

    Ok(Json(weekly(&expenses)?))
}

/// Get the total spent in each category, optionally limited to a date range.
pub async fn get_category_summary(
    State(state): State<ExpenseState>,
    ValidQuery(range): ValidQuery<DateRange>,
) -> Result<Json<Vec<CategoryTotal>>, Error> {
    let expenses = fetch_expenses_in_range(&state.expense_store, range)?;

    Ok(Json(by_category(&expenses)?))
}

/// Get the running total of expenses over time, optionally limited to a date range.
pub async fn get_cumulative_summary(
    State(state): State<ExpenseState>,
    ValidQuery(range): ValidQuery<DateRange>,
) -> Result<Json<Vec<CumulativePoint>>, Error> {
    let expenses = fetch_expenses_in_range(&state.expense_store, range)?;

    Ok(Json(cumulative(&expenses)?))
}
