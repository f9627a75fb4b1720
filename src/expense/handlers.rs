//! Route handlers for creating, reading, updating and deleting expenses.

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    expense::{Expense, ExpenseForm, ExpenseState, NewExpense, suggest_category},
    extract::{ValidJson, ValidPath, ValidQuery},
    pagination::{PageQuery, PaginationConfig},
    stores::{ExpenseStore, SQLiteExpenseStore},
};

/// The state needed to list expenses a page at a time.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The store for reading expenses.
    pub expense_store: SQLiteExpenseStore,
    /// The default and maximum page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// A route handler for creating a new expense.
///
/// Responds with 201 Created and the new expense.
pub async fn create_expense(
    State(mut state): State<ExpenseState>,
    ValidJson(form): ValidJson<ExpenseForm>,
) -> Result<impl IntoResponse, Error> {
    let expense = state.expense_store.create(NewExpense::try_from(form)?)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// A route handler for listing expenses in the order they were created.
pub async fn list_expenses(
    State(state): State<ListExpensesState>,
    ValidQuery(query): ValidQuery<PageQuery>,
) -> Result<Json<Vec<Expense>>, Error> {
    let (offset, limit) = query.resolve(&state.pagination_config);

    let expenses = state.expense_store.list(offset, limit)?;

    Ok(Json(expenses))
}

/// A route handler for getting a single expense.
pub async fn get_expense(
    State(state): State<ExpenseState>,
    ValidPath(expense_id): ValidPath<ExpenseId>,
) -> Result<Json<Expense>, Error> {
    state.expense_store.get(expense_id).map(Json)
}

/// A route handler for replacing all the fields of an expense.
pub async fn update_expense(
    State(mut state): State<ExpenseState>,
    ValidPath(expense_id): ValidPath<ExpenseId>,
    ValidJson(form): ValidJson<ExpenseForm>,
) -> Result<Json<Expense>, Error> {
    let expense = state
        .expense_store
        .update(expense_id, NewExpense::try_from(form)?)?;

    Ok(Json(expense))
}

/// A route handler for deleting an expense.
pub async fn delete_expense(
    State(mut state): State<ExpenseState>,
    ValidPath(expense_id): ValidPath<ExpenseId>,
) -> Result<impl IntoResponse, Error> {
    state.expense_store.delete(expense_id)?;

    Ok(Json(json!({ "detail": "Deleted" })))
}

/// The query parameters for the category suggestion endpoint.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestQuery {
    /// The title of the expense being entered.
    pub title: String,
}

/// The suggested category for an expense title.
#[derive(Debug, Serialize)]
pub struct CategorySuggestion {
    /// The suggested category, or null if there is nothing to base a suggestion on.
    pub category: Option<String>,
}

/// A route handler for suggesting a category for a new expense based on past expenses.
pub async fn get_suggested_category(
    State(state): State<ExpenseState>,
    ValidQuery(query): ValidQuery<SuggestQuery>,
) -> Result<Json<CategorySuggestion>, Error> {
    let history = state.expense_store.all()?;

    Ok(Json(CategorySuggestion {
        category: suggest_category(&query.title, &history),
    }))
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, BudgetConfig,
        endpoints::{self, format_endpoint},
        expense::{
            create_expense, delete_expense, get_expense, get_suggested_category, list_expenses,
            update_expense,
        },
        pagination::PaginationConfig,
        stores::{ExpenseStore, SQLiteExpenseStore},
    };

    fn get_test_server() -> (TestServer, SQLiteExpenseStore) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC",
            PaginationConfig {
                default_limit: 2,
                max_limit: 3,
            },
            BudgetConfig::default(),
        )
        .unwrap();
        let expense_store = state.expense_store.clone();

        let app = Router::new()
            .route(endpoints::EXPENSES, get(list_expenses).post(create_expense))
            .route(
                endpoints::EXPENSE,
                get(get_expense).put(update_expense).delete(delete_expense),
            )
            .route(endpoints::SUGGEST_CATEGORY, get(get_suggested_category))
            .with_state(state);

        (
            TestServer::try_new(app).expect("Could not create test server."),
            expense_store,
        )
    }

    fn coffee() -> Value {
        json!({
            "title": "Coffee",
            "amount": "4.50",
            "category": "Food",
            "date": "2024-01-15",
        })
    }

    #[tokio::test]
    async fn create_expense_returns_created() {
        let (server, store) = get_test_server();

        let response = server.post(endpoints::EXPENSES).json(&coffee()).await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["title"], "Coffee");
        assert_eq!(body["amount"], "4.50");
        assert_eq!(body["category"], "Food");
        assert_eq!(body["date"], "2024-01-15");
        assert!(body["id"].is_i64());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn create_expense_accepts_numeric_amount() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({
                "title": "Refund",
                "amount": -12.5,
                "category": "Shopping",
                "date": "2024-01-15",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["amount"], "-12.5");
    }

    #[tokio::test]
    async fn create_expense_rejects_unknown_fields() {
        let (server, store) = get_test_server();
        let mut body = coffee();
        body["colour"] = json!("blue");

        let response = server.post(endpoints::EXPENSES).json(&body).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn create_expense_rejects_missing_fields() {
        let (server, store) = get_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "title": "Coffee", "amount": "4.50" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn create_expense_rejects_blank_title() {
        let (server, store) = get_test_server();
        let mut body = coffee();
        body["title"] = json!("   ");

        let response = server.post(endpoints::EXPENSES).json(&body).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        response.assert_json(&json!({ "error": "title must not be empty" }));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn create_expense_rejects_huge_amount() {
        let (server, store) = get_test_server();
        let mut body = coffee();
        body["amount"] = json!("79228162514264337593543950335");

        let response = server.post(endpoints::EXPENSES).json(&body).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn create_expense_rejects_bad_date() {
        let (server, _) = get_test_server();
        let mut body = coffee();
        body["date"] = json!("2024-02-30");

        let response = server.post(endpoints::EXPENSES).json(&body).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn list_expenses_uses_default_limit() {
        let (server, _) = get_test_server();
        for _ in 0..3 {
            server.post(endpoints::EXPENSES).json(&coffee()).await;
        }

        let response = server.get(endpoints::EXPENSES).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Value>>().len(), 2);
    }

    #[tokio::test]
    async fn list_expenses_applies_offset_and_caps_limit() {
        let (server, _) = get_test_server();
        for i in 0..5 {
            let mut body = coffee();
            body["title"] = json!(format!("Coffee {i}"));
            server.post(endpoints::EXPENSES).json(&body).await;
        }

        let response = server
            .get(endpoints::EXPENSES)
            .add_query_param("offset", 1)
            .add_query_param("limit", 100)
            .await;

        response.assert_status_ok();
        let titles: Vec<String> = response
            .json::<Vec<Value>>()
            .iter()
            .map(|expense| expense["title"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(titles, vec!["Coffee 1", "Coffee 2", "Coffee 3"]);
    }

    #[tokio::test]
    async fn list_expenses_rejects_negative_offset() {
        let (server, _) = get_test_server();

        let response = server
            .get(endpoints::EXPENSES)
            .add_query_param("offset", -1)
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn create_update_delete_flow() {
        let (server, store) = get_test_server();

        let created = server
            .post(endpoints::EXPENSES)
            .json(&coffee())
            .await
            .json::<Value>();
        let id = created["id"].as_i64().unwrap();
        let path = format_endpoint(endpoints::EXPENSE, id);

        let updated = server
            .put(&path)
            .json(&json!({
                "title": "Taxi",
                "amount": "23.00",
                "category": "Transport",
                "date": "2024-02-01",
            }))
            .await;
        updated.assert_status_ok();
        updated.assert_json(&json!({
            "id": id,
            "title": "Taxi",
            "amount": "23.00",
            "category": "Transport",
            "date": "2024-02-01",
        }));

        let fetched = server.get(&path).await;
        fetched.assert_status_ok();
        assert_eq!(fetched.json::<Value>()["title"], "Taxi");

        let deleted = server.delete(&path).await;
        deleted.assert_status_ok();
        deleted.assert_json(&json!({ "detail": "Deleted" }));
        assert_eq!(store.count().unwrap(), 0);

        server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_missing_expense_returns_not_found() {
        let (server, store) = get_test_server();
        server.post(endpoints::EXPENSES).json(&coffee()).await;

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE, 999))
            .json(&coffee())
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "error": "Expense not found" }));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_missing_expense_returns_not_found() {
        let (server, store) = get_test_server();
        server.post(endpoints::EXPENSES).json(&coffee()).await;

        let response = server.delete(&format_endpoint(endpoints::EXPENSE, 999)).await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected() {
        let (server, _) = get_test_server();

        let response = server.get("/api/expenses/abc").await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn suggests_category_from_history() {
        let (server, _) = get_test_server();
        server.post(endpoints::EXPENSES).json(&coffee()).await;

        let response = server
            .get(endpoints::SUGGEST_CATEGORY)
            .add_query_param("title", "Iced coffee")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "category": "Food" }));
    }

    #[tokio::test]
    async fn no_suggestion_without_history() {
        let (server, _) = get_test_server();

        let response = server
            .get(endpoints::SUGGEST_CATEGORY)
            .add_query_param("title", "Iced coffee")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "category": null }));
    }
}
