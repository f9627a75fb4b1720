//! Route handlers for checking spending against the monthly budget.

use axum::{
    Json,
    extract::{FromRef, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    app_state::BudgetConfig,
    budget::{BudgetPreview, BudgetStatus, SavingsProgress, evaluate, preview, savings_progress},
    expense::validate_amount,
    extract::ValidQuery,
    period::{MonthKey, month_key},
    stores::{ExpenseStore, SQLiteExpenseStore},
    summary::checked_total,
    timezone::local_today,
};

/// The state needed for the budget and forecast endpoints.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The store for reading expenses.
    pub expense_store: SQLiteExpenseStore,
    /// The default budget and savings goal.
    pub budget_config: BudgetConfig,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
            budget_config: state.budget_config.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl BudgetState {
    /// The month containing today's date in the local timezone.
    fn current_month(&self) -> Result<MonthKey, Error> {
        local_today(&self.local_timezone)
            .map(month_key)
            .ok_or_else(|| Error::InvalidTimezoneError(self.local_timezone.clone()))
    }

    /// The threshold from a request, or the configured monthly budget if none was given.
    fn threshold_or_default(&self, threshold: Option<Decimal>) -> Result<Decimal, Error> {
        match threshold {
            Some(threshold) => validate_amount("threshold", threshold),
            None => Ok(self.budget_config.monthly_budget),
        }
    }

    /// The total of the expenses dated within `month`.
    fn month_total(&self, month: MonthKey) -> Result<Decimal, Error> {
        let expenses = self.expense_store.all()?;

        checked_total(
            expenses
                .into_iter()
                .filter(|expense| month.contains(expense.date))
                .map(|expense| expense.amount),
        )
    }
}

/// The query parameters for the budget status endpoint.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetQuery {
    /// The month to check, e.g. "2024-03". Defaults to the current month.
    pub month: Option<MonthKey>,
    /// The budget to check against. Defaults to the configured monthly budget.
    pub threshold: Option<Decimal>,
    /// The savings goal. Defaults to the configured savings goal.
    pub savings_goal: Option<Decimal>,
}

/// The spending for a month compared with the budget.
#[derive(Debug, Serialize)]
pub struct BudgetReport {
    /// The month that was checked.
    pub month: MonthKey,
    /// The total spent in `month`.
    pub spent: Decimal,
    /// The budget `spent` was compared against.
    pub threshold: Decimal,
    /// Whether `spent` exceeds `threshold`.
    pub status: BudgetStatus,
    /// Progress towards the savings goal.
    pub savings: SavingsProgress,
}

/// Check a month's spending against the budget and savings goal.
pub async fn get_budget_status(
    State(state): State<BudgetState>,
    ValidQuery(query): ValidQuery<BudgetQuery>,
) -> Result<Json<BudgetReport>, Error> {
    let month = match query.month {
        Some(month) => month,
        None => state.current_month()?,
    };
    let threshold = state.threshold_or_default(query.threshold)?;
    let savings_goal = match query.savings_goal {
        Some(goal) => validate_amount("savings_goal", goal)?,
        None => state.budget_config.savings_goal,
    };

    let spent = state.month_total(month)?;

    Ok(Json(BudgetReport {
        month,
        spent,
        threshold,
        status: evaluate(spent, threshold),
        savings: savings_progress(threshold, spent, savings_goal)?,
    }))
}

/// The query parameters for the budget preview endpoint.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreviewQuery {
    /// The date of the expense that would be added.
    pub date: Date,
    /// The amount of the expense that would be added.
    pub amount: Decimal,
    /// The budget to check against. Defaults to the configured monthly budget.
    pub threshold: Option<Decimal>,
}

/// Check whether adding an expense would take its month over budget.
///
/// Nothing is saved, so clients can warn the user before they submit an expense.
pub async fn get_budget_preview(
    State(state): State<BudgetState>,
    ValidQuery(query): ValidQuery<PreviewQuery>,
) -> Result<Json<BudgetPreview>, Error> {
    let month = month_key(query.date);
    let amount = validate_amount("amount", query.amount)?;
    let threshold = state.threshold_or_default(query.threshold)?;

    let current_total = state.month_total(month)?;

    Ok(Json(preview(month, current_total, amount, threshold)?))
}
