//! Defines the endpoint for setting the monthly budget.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    Error,
    api::{ApiClient, AuthToken},
    budget::core::set_budget,
    endpoints,
};

#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    pub monthly_budget: f64,
}

/// A route handler for setting the monthly budget, reloads the budget view on success.
pub async fn update_budget_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Form(form): Form<BudgetForm>,
) -> Response {
    if !form.monthly_budget.is_finite() || form.monthly_budget <= 0.0 {
        return Error::Validation("Budget must be greater than 0".to_owned()).into_alert_response();
    }

    if let Err(error) = set_budget(&api, &token, form.monthly_budget).await {
        tracing::error!("Could not set monthly budget to {}: {error}", form.monthly_budget);
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::BUDGET_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
