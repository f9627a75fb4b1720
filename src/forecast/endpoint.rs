//! Route handler for next month's spending forecast.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    budget::{BudgetState, BudgetStatus, evaluate},
    expense::validate_amount,
    extract::ValidQuery,
    forecast::{ForecastMethod, forecast, round_for_display},
    period::MonthKey,
    stores::ExpenseStore,
    summary::monthly,
};

/// The query parameters for the forecast endpoint.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastQuery {
    /// The budget to check the forecast against. Defaults to the configured monthly budget.
    pub threshold: Option<Decimal>,
}

/// The forecast for next month, as sent to the client.
///
/// When there are no expenses to forecast from, `month`, `method` and
/// `status` are null and `forecast` is zero.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    /// The month the forecast is for.
    pub month: Option<MonthKey>,
    /// The predicted total, rounded to two decimal places.
    pub forecast: Decimal,
    /// How the forecast was calculated.
    pub method: Option<ForecastMethod>,
    /// The budget the forecast was checked against.
    pub threshold: Decimal,
    /// Whether the forecast exceeds `threshold`.
    pub status: Option<BudgetStatus>,
}

/// Forecast next month's spending and check it against the budget.
///
/// Budget status is evaluated on the unrounded forecast.
pub async fn get_forecast(
    State(state): State<BudgetState>,
    ValidQuery(query): ValidQuery<ForecastQuery>,
) -> Result<Json<ForecastResponse>, Error> {
    let threshold = match query.threshold {
        Some(threshold) => validate_amount("threshold", threshold)?,
        None => state.budget_config.monthly_budget,
    };

    let expenses = state.expense_store.all().map_err(|error| match error {
        Error::UpstreamUnavailable(_) => {
            Error::UpstreamUnavailable("forecast unavailable".to_owned())
        }
        error => error,
    })?;

    let response = match forecast(&monthly(&expenses)?) {
        Some(point) => ForecastResponse {
            month: Some(point.month),
            forecast: point.rounded_amount(),
            method: Some(point.method),
            threshold,
            status: Some(evaluate(point.amount, threshold)),
        },
        None => ForecastResponse {
            month: None,
            forecast: round_for_display(Decimal::ZERO),
            method: None,
            threshold,
            status: None,
        },
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use time::{Date, macros::date};

    use crate::{
        app_state::BudgetConfig,
        budget::BudgetState,
        db::initialize,
        endpoints,
        expense::NewExpense,
        stores::{ExpenseStore, SQLiteExpenseStore},
    };

    use super::get_forecast;

    fn get_test_server(expenses: &[(Decimal, Date)]) -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let mut expense_store = SQLiteExpenseStore::new(Arc::new(Mutex::new(connection)));

        for &(amount, date) in expenses {
            expense_store
                .create(NewExpense::new("Shopping", amount, "Misc", date).unwrap())
                .unwrap();
        }

        let app = Router::new()
            .route(endpoints::FORECAST, get(get_forecast))
            .with_state(BudgetState {
                expense_store,
                budget_config: BudgetConfig::default(),
                local_timezone: "Etc/UTC".to_owned(),
            });

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn no_expenses_gives_empty_forecast() {
        let server = get_test_server(&[]);

        let response = server.get(endpoints::FORECAST).await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "month": null,
            "forecast": "0.00",
            "method": null,
            "threshold": "10000.00",
            "status": null,
        }));
    }

    #[tokio::test]
    async fn three_months_are_averaged() {
        let server = get_test_server(&[
            (dec!(90), date!(2024 - 01 - 05)),
            (dec!(110), date!(2024 - 02 - 05)),
            (dec!(60), date!(2024 - 03 - 05)),
            (dec!(40), date!(2024 - 03 - 25)),
        ]);

        let response = server
            .get(endpoints::FORECAST)
            .add_query_param("threshold", "100")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "month": "2024-04",
            "forecast": "100.00",
            "method": "three_month_mean",
            "threshold": "100",
            "status": "WITHIN_BUDGET",
        }));
    }

    #[tokio::test]
    async fn short_history_carries_forward() {
        let server = get_test_server(&[(dec!(100), date!(2024 - 01 - 15))]);

        let response = server
            .get(endpoints::FORECAST)
            .add_query_param("threshold", "99.99")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "month": "2024-02",
            "forecast": "100.00",
            "method": "carry_forward",
            "threshold": "99.99",
            "status": "EXCEEDED",
        }));
    }

    #[tokio::test]
    async fn status_uses_unrounded_forecast() {
        // The mean is 100.0033.., which rounds to 100.00 but is still over 100.
        let server = get_test_server(&[
            (dec!(100), date!(2024 - 01 - 05)),
            (dec!(100), date!(2024 - 02 - 05)),
            (dec!(100.01), date!(2024 - 03 - 05)),
        ]);

        let response = server
            .get(endpoints::FORECAST)
            .add_query_param("threshold", "100")
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["forecast"], "100.00");
        assert_eq!(body["status"], "EXCEEDED");
    }

    #[tokio::test]
    async fn huge_threshold_is_rejected() {
        let server = get_test_server(&[(dec!(100), date!(2024 - 01 - 15))]);

        let response = server
            .get(endpoints::FORECAST)
            .add_query_param("threshold", "-79228162514264337593543950335")
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
