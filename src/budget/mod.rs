//! Budget evaluation for monthly spending and forecasts.

mod core;
mod endpoint;

pub use self::core::{
    BudgetPreview, BudgetStatus, SavingsProgress, evaluate, preview, savings_progress,
};
pub use endpoint::{BudgetState, get_budget_preview, get_budget_status};
