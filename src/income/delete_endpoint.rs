//! Defines the endpoint for deleting an income.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    api::{ApiClient, AuthToken},
    income::core::delete_income,
};

/// A route handler for deleting an income, responds with an alert.
pub async fn delete_income_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Path(income_id): Path<String>,
) -> Response {
    match delete_income(&api, &token, &income_id).await {
        Ok(()) => Alert::SuccessSimple {
            message: "Income deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not delete income {income_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Json, Router,
        extract::{Path, State},
        http::StatusCode,
        routing::delete,
    };
    use serde_json::json;

    use crate::test_utils::{get_test_app_state_with_stub, response_text, test_token};

    use super::delete_income_endpoint;

    #[tokio::test]
    async fn deletes_income() {
        let router = Router::new().route(
            "/incomes/{id}",
            delete(|| async { Json(json!({ "message": "Income deleted" })) }),
        );
        let state = get_test_app_state_with_stub(router).await;

        let response = delete_income_endpoint(
            State(state.api.clone()),
            Extension(test_token()),
            Path("i1".to_owned()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response_text(response).await.contains("Income deleted successfully"));
    }

    #[tokio::test]
    async fn server_error_is_bad_gateway() {
        let router = Router::new().route(
            "/incomes/{id}",
            delete(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let state = get_test_app_state_with_stub(router).await;

        let response = delete_income_endpoint(
            State(state.api.clone()),
            Extension(test_token()),
            Path("i1".to_owned()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
