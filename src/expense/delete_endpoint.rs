//! Defines the endpoint for deleting an expense.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    api::{ApiClient, AuthToken},
    expense::core::delete_expense,
};

/// A route handler for deleting an expense, responds with an alert.
pub async fn delete_expense_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Path(expense_id): Path<String>,
) -> Response {
    match delete_expense(&api, &token, &expense_id).await {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::SuccessSimple {
            message: "Expense deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
