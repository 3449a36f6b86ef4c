//! Defines the endpoint for adding this month's contribution to the savings plan.

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
    savings::core::contribute,
};

/// A route handler for contributing to the savings plan, reloads the savings view on success.
pub async fn contribute_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Path(savings_id): Path<String>,
) -> Response {
    if let Err(error) = contribute(&api, &token, &savings_id).await {
        tracing::error!("Could not contribute to savings plan {savings_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::SAVINGS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
