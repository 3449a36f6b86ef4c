//! Defines the endpoint for creating or updating the savings plan.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    api::{ApiClient, AuthToken, DATE_FORMAT},
    endpoints,
    filter::optional_text,
    savings::core::{SavingsPlanInput, create_savings_plan, update_savings_plan},
};

#[derive(Debug, Deserialize)]
pub struct SavingsPlanForm {
    /// The plan to update, missing when creating a new plan.
    #[serde(default, deserialize_with = "optional_text")]
    pub plan_id: Option<String>,
    pub monthly_contribution: f64,
    pub target_amount: f64,
    /// The date picker's "YYYY-MM-DD" value, missing when the plan has no target date.
    #[serde(default, deserialize_with = "optional_text")]
    pub target_date: Option<String>,
}

const INVALID_TARGET_DATE_MSG: &str = "Target date must be a date like 2026-01-31";

impl SavingsPlanForm {
    fn to_input(&self) -> Result<SavingsPlanInput, Error> {
        if !self.monthly_contribution.is_finite() || self.monthly_contribution < 0.0 {
            return Err(Error::Validation(
                "Monthly contribution cannot be negative".to_owned(),
            ));
        }

        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(Error::Validation(
                "Target amount must be greater than 0".to_owned(),
            ));
        }

        let target_date = self
            .target_date
            .as_deref()
            .map(|text| Date::parse(text, DATE_FORMAT))
            .transpose()
            .map_err(|_| Error::Validation(INVALID_TARGET_DATE_MSG.to_owned()))?;

        Ok(SavingsPlanInput {
            monthly_contribution: self.monthly_contribution,
            target_amount: self.target_amount,
            target_date,
        })
    }
}

/// A route handler that creates the savings plan, or updates it when the form names an existing plan.
pub async fn save_savings_plan_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Form(form): Form<SavingsPlanForm>,
) -> Response {
    let input = match form.to_input() {
        Ok(input) => input,
        Err(error) => return error.into_alert_response(),
    };

    let result = match &form.plan_id {
        Some(plan_id) => update_savings_plan(&api, &token, plan_id, &input).await,
        None => create_savings_plan(&api, &token, &input).await,
    };

    if let Err(error) = result {
        tracing::error!("Could not save savings plan {input:?}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::SAVINGS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
