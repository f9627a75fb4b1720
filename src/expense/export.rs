//! Exports expenses as a CSV file.

use axum::{extract::State, http::header, response::IntoResponse};

use crate::{
    Error,
    expense::{Expense, ExpenseState},
    extract::ValidQuery,
    summary::{DateRange, fetch_expenses_in_range},
};

const CSV_HEADER: [&str; 5] = ["id", "title", "amount", "category", "date"];

/// Write `expenses` as CSV with a header row, even when there are no expenses.
fn write_csv(expenses: &[Expense]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for expense in expenses {
        writer
            .serialize(expense)
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

/// A route handler for downloading expenses as a CSV file, ordered by date.
///
/// The optional `start` and `end` query parameters limit the export to an
/// inclusive date range.
pub async fn export_expenses(
    State(state): State<ExpenseState>,
    ValidQuery(range): ValidQuery<DateRange>,
) -> Result<impl IntoResponse, Error> {
    let expenses = fetch_expenses_in_range(&state.expense_store, range)?;
    let body = write_csv(&expenses)?;

    tracing::debug!("exported {} expenses", expenses.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"expenses.csv\"",
            ),
        ],
        body,
    ))
}
