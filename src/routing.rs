//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::{auth_guard, post_log_in, post_log_out},
    budget::{get_budget_preview, get_budget_status},
    endpoints,
    expense::{
        create_expense, delete_expense, export_expenses, get_expense, get_suggested_category,
        list_expenses, update_expense,
    },
    forecast::get_forecast,
    not_found::get_404_not_found,
    summary::{
        get_category_summary, get_cumulative_summary, get_monthly_summary, get_weekly_summary,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out));

    let protected_routes = Router::new()
        .route(endpoints::EXPENSES, get(list_expenses).post(create_expense))
        .route(
            endpoints::EXPENSE,
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route(endpoints::EXPORT_EXPENSES, get(export_expenses))
        .route(endpoints::SUGGEST_CATEGORY, get(get_suggested_category))
        .route(endpoints::MONTHLY_SUMMARY, get(get_monthly_summary))
        .route(endpoints::WEEKLY_SUMMARY, get(get_weekly_summary))
        .route(endpoints::CATEGORY_SUMMARY, get(get_category_summary))
        .route(endpoints::CUMULATIVE_SUMMARY, get(get_cumulative_summary))
        .route(endpoints::FORECAST, get(get_forecast))
        .route(endpoints::BUDGET, get(get_budget_status))
        .route(endpoints::BUDGET_PREVIEW, get(get_budget_preview))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
