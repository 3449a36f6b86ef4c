//! Defines the endpoint that e-mails the monthly summary.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    api::{ApiClient, AuthToken},
    profile::core::send_monthly_summary,
};

const SUMMARY_SENT_MSG: &str = "Monthly summary sent to your email";

/// A route handler that asks the API to e-mail this month's summary.
pub async fn send_monthly_summary_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
) -> Response {
    match send_monthly_summary(&api, &token).await {
        Ok(message) => Alert::Success {
            message: "Summary sent".to_owned(),
            details: message.unwrap_or_else(|| SUMMARY_SENT_MSG.to_owned()),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not send monthly summary: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Extension, Json, Router, extract::State, http::StatusCode, routing::post};
    use serde_json::json;

    use crate::test_utils::{get_test_app_state_with_stub, response_text, test_token};

    use super::{SUMMARY_SENT_MSG, send_monthly_summary_endpoint};

    #[tokio::test]
    async fn shows_api_message() {
        let router = Router::new().route(
            "/summary/monthly",
            post(|| async { Json(json!({ "message": "Summary for March sent" })) }),
        );
        let state = get_test_app_state_with_stub(router).await;

        let response =
            send_monthly_summary_endpoint(State(state.api.clone()), Extension(test_token())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response_text(response).await.contains("Summary for March sent"));
    }

    #[tokio::test]
    async fn falls_back_to_default_message() {
        let router = Router::new().route("/summary/monthly", post(|| async { StatusCode::OK }));
        let state = get_test_app_state_with_stub(router).await;

        let response =
            send_monthly_summary_endpoint(State(state.api.clone()), Extension(test_token())).await;

        assert!(response_text(response).await.contains(SUMMARY_SENT_MSG));
    }

    #[tokio::test]
    async fn failure_is_an_error_alert() {
        let router = Router::new().route(
            "/summary/monthly",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Mail server unavailable" })),
                )
            }),
        );
        let state = get_test_app_state_with_stub(router).await;

        let response =
            send_monthly_summary_endpoint(State(state.api.clone()), Extension(test_token())).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response_text(response).await.contains("Mail server unavailable"));
    }
}
