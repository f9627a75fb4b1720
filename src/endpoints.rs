//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

/// The route for logging in with the application password.
pub const LOG_IN: &str = "/api/log_in";
/// The route for ending the current session.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create and list expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to get, update or delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to download expenses as CSV.
pub const EXPORT_EXPENSES: &str = "/api/expenses/export";
/// The route to suggest a category for an expense title.
pub const SUGGEST_CATEGORY: &str = "/api/expenses/suggest_category";
/// The route for totals by calendar month.
pub const MONTHLY_SUMMARY: &str = "/api/summary/monthly";
/// The route for totals by ISO week.
pub const WEEKLY_SUMMARY: &str = "/api/summary/weekly";
/// The route for totals by category.
pub const CATEGORY_SUMMARY: &str = "/api/summary/categories";
/// The route for the running total of expenses.
pub const CUMULATIVE_SUMMARY: &str = "/api/summary/cumulative";
/// The route for next month's spending forecast.
pub const FORECAST: &str = "/api/forecast";
/// The route for a month's spending against the budget.
pub const BUDGET: &str = "/api/budget";
/// The route for checking a new expense against the budget before saving it.
pub const BUDGET_PREVIEW: &str = "/api/budget/preview";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace.
/// For example, in the endpoint path '/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path contains at most one parameter.
/// If no parameter is found in `endpoint_path`, the original `endpoint_path` is returned.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::LOG_IN,
            endpoints::LOG_OUT,
            endpoints::EXPENSES,
            endpoints::EXPORT_EXPENSES,
            endpoints::SUGGEST_CATEGORY,
            endpoints::MONTHLY_SUMMARY,
            endpoints::WEEKLY_SUMMARY,
            endpoints::CATEGORY_SUMMARY,
            endpoints::CUMULATIVE_SUMMARY,
            endpoints::FORECAST,
            endpoints::BUDGET,
            endpoints::BUDGET_PREVIEW,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }

        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::EXPENSE, 1));
    }

    #[test]
    fn replaces_parameter() {
        let formatted_path = format_endpoint(endpoints::EXPENSE, 42);

        assert_eq!(formatted_path, "/api/expenses/42");
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        assert_eq!(format_endpoint("/hello/world", 1), "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        assert_eq!(format_endpoint("/hello/{world}/bye", 1), "/hello/1/bye");
    }

    #[test]
    fn unclosed_parameter_runs_to_end() {
        assert_eq!(format_endpoint("/hello/{world", 1), "/hello/1");
    }
}
