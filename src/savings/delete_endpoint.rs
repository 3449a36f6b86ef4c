//! Defines the endpoint for deleting the savings plan.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    api::{ApiClient, AuthToken},
    endpoints,
    savings::core::delete_savings_plan,
};

/// A route handler for deleting the savings plan, reloads the savings view on success.
pub async fn delete_savings_plan_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Path(savings_id): Path<String>,
) -> Response {
    match delete_savings_plan(&api, &token, &savings_id).await {
        Ok(()) => (
            HxRedirect(endpoints::SAVINGS_VIEW.to_owned()),
            StatusCode::OK,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not delete savings plan {savings_id}: {error}");
            error.into_alert_response()
        }
    }
}
