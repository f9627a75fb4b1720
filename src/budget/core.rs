//! Budget checks on spending totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{Error, period::MonthKey, summary::add_amount};

/// Whether a total is within a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    /// The total is less than or equal to the budget.
    WithinBudget,
    /// The total is strictly greater than the budget.
    Exceeded,
}

/// Compare a spending total against a budget threshold.
///
/// Spending exactly the budget counts as within budget. This applies equally
/// to monthly totals, weekly totals and forecasts.
pub fn evaluate(total: Decimal, threshold: Decimal) -> BudgetStatus {
    if total > threshold {
        BudgetStatus::Exceeded
    } else {
        BudgetStatus::WithinBudget
    }
}

/// How close the user is to their savings goal for a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsProgress {
    /// The amount the user wants to save.
    pub goal: Decimal,
    /// The budget minus the amount spent. Negative when over budget.
    pub savings: Decimal,
    /// How much more needs to be saved to reach the goal, never negative.
    pub remaining: Decimal,
    /// Whether the savings meet or exceed the goal.
    pub achieved: bool,
    /// The fraction of the goal saved, between 0 and 1.
    ///
    /// `None` when the goal is zero or negative, since progress towards it is
    /// meaningless.
    pub progress: Option<Decimal>,
}

/// Work out the savings for a month where `spent` was spent against `budget`.
///
/// # Errors
/// Returns an [Error::AmountOverflow] if the savings or the amount remaining
/// do not fit in a [Decimal].
pub fn savings_progress(
    budget: Decimal,
    spent: Decimal,
    goal: Decimal,
) -> Result<SavingsProgress, Error> {
    let savings = budget.checked_sub(spent).ok_or(Error::AmountOverflow)?;

    let progress = if goal > Decimal::ZERO {
        // A quotient too large to represent is far past the goal, or far below it.
        let ratio = savings
            .checked_div(goal)
            .unwrap_or(if savings > Decimal::ZERO {
                Decimal::ONE
            } else {
                Decimal::ZERO
            });

        Some(ratio.clamp(Decimal::ZERO, Decimal::ONE))
    } else {
        None
    };

    let remaining = goal
        .checked_sub(savings)
        .ok_or(Error::AmountOverflow)?
        .max(Decimal::ZERO);

    Ok(SavingsProgress {
        goal,
        savings,
        remaining,
        achieved: savings >= goal,
        progress,
    })
}

/// The effect on a month's budget of adding one more expense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetPreview {
    /// The month the new expense falls in.
    pub month: MonthKey,
    /// The total already spent in `month`.
    pub current_total: Decimal,
    /// The total for `month` after adding the new expense.
    pub total_after: Decimal,
    /// The budget status of `total_after`.
    pub status: BudgetStatus,
}

/// Check whether adding `amount` to a month that has `current_total` spent
/// would go over `threshold`.
///
/// # Errors
/// Returns an [Error::AmountOverflow] if the new total does not fit in a [Decimal].
pub fn preview(
    month: MonthKey,
    current_total: Decimal,
    amount: Decimal,
    threshold: Decimal,
) -> Result<BudgetPreview, Error> {
    let total_after = add_amount(current_total, amount)?;

    Ok(BudgetPreview {
        month,
        current_total,
        total_after,
        status: evaluate(total_after, threshold),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        budget::{BudgetStatus, evaluate, preview, savings_progress},
        period::MonthKey,
    };

    #[test]
    fn equal_total_is_within_budget() {
        assert_eq!(
            evaluate(dec!(10000.00), dec!(10000.00)),
            BudgetStatus::WithinBudget
        );
    }

    #[test]
    fn one_cent_over_exceeds_budget() {
        assert_eq!(evaluate(dec!(10000.01), dec!(10000.00)), BudgetStatus::Exceeded);
    }

    #[test]
    fn under_budget_is_within_budget() {
        assert_eq!(evaluate(dec!(0), dec!(10000.00)), BudgetStatus::WithinBudget);
    }

    #[test]
    fn status_serializes_in_upper_case() {
        assert_eq!(
            serde_json::to_string(&BudgetStatus::WithinBudget).unwrap(),
            "\"WITHIN_BUDGET\""
        );
        assert_eq!(
            serde_json::to_string(&BudgetStatus::Exceeded).unwrap(),
            "\"EXCEEDED\""
        );
    }

    #[test]
    fn savings_goal_reached() {
        let got = savings_progress(dec!(10000), dec!(4000), dec!(5000)).unwrap();

        assert_eq!(got.savings, dec!(6000));
        assert_eq!(got.remaining, dec!(0));
        assert!(got.achieved);
        assert_eq!(got.progress, Some(dec!(1)));
    }

    #[test]
    fn savings_goal_partially_reached() {
        let got = savings_progress(dec!(10000), dec!(7500), dec!(5000)).unwrap();

        assert_eq!(got.savings, dec!(2500));
        assert_eq!(got.remaining, dec!(2500));
        assert!(!got.achieved);
        assert_eq!(got.progress, Some(dec!(0.5)));
    }

    #[test]
    fn overspending_clamps_progress_to_zero() {
        let got = savings_progress(dec!(10000), dec!(12000), dec!(5000)).unwrap();

        assert_eq!(got.savings, dec!(-2000));
        assert_eq!(got.remaining, dec!(7000));
        assert_eq!(got.progress, Some(dec!(0)));
    }

    #[test]
    fn zero_goal_has_no_progress() {
        let got = savings_progress(dec!(10000), dec!(100), dec!(0)).unwrap();

        assert!(got.achieved);
        assert_eq!(got.progress, None);
    }

    #[test]
    fn preview_adds_amount_to_current_total() {
        let month = MonthKey::new(2024, 3).unwrap();

        let got = preview(month, dec!(9900), dec!(150), dec!(10000)).unwrap();

        assert_eq!(got.total_after, dec!(10050));
        assert_eq!(got.status, BudgetStatus::Exceeded);
        assert_eq!(got.month, month);
    }

    #[test]
    fn tiny_goal_does_not_overflow() {
        let got = savings_progress(dec!(10000), dec!(0), dec!(0.0000000000000000000000000001))
            .unwrap();

        assert!(got.achieved);
        assert_eq!(got.progress, Some(dec!(1)));

        let got = savings_progress(dec!(0), dec!(10000), dec!(0.0000000000000000000000000001))
            .unwrap();

        assert!(!got.achieved);
        assert_eq!(got.progress, Some(dec!(0)));
    }

    #[test]
    fn unrepresentable_savings_are_errors() {
        assert_eq!(
            savings_progress(Decimal::MIN, Decimal::MAX, dec!(5000)),
            Err(Error::AmountOverflow)
        );
        assert_eq!(
            savings_progress(dec!(0), Decimal::MAX, Decimal::MAX),
            Err(Error::AmountOverflow)
        );
    }

    #[test]
    fn preview_reports_overflow() {
        let month = MonthKey::new(2024, 3).unwrap();

        let got = preview(month, dec!(10000), Decimal::MAX, dec!(10000));

        assert_eq!(got, Err(Error::AmountOverflow));
    }
}
