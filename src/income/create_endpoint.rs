//! Defines the endpoint for adding an income.

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
    api::{ApiClient, AuthToken, calendar_date},
    endpoints,
    income::core::{NewIncome, create_income},
};

#[derive(Debug, Deserialize)]
pub struct IncomeForm {
    pub amount: f64,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub note: String,
    #[serde(with = "calendar_date")]
    pub date: Date,
}

impl IncomeForm {
    fn into_new_income(self) -> Result<NewIncome, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::Validation("Amount must be a positive number".to_owned()));
        }

        let source = self.source.trim();
        if source.is_empty() {
            return Err(Error::Validation("Source is required".to_owned()));
        }

        let note = self.note.trim();

        Ok(NewIncome {
            amount: self.amount,
            source: source.to_owned(),
            note: (!note.is_empty()).then(|| note.to_owned()),
            date: self.date,
        })
    }
}

/// A route handler for adding an income, redirects to the income view on success.
pub async fn create_income_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Form(form): Form<IncomeForm>,
) -> Response {
    let income = match form.into_new_income() {
        Ok(income) => income,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = create_income(&api, &token, &income).await {
        tracing::error!("Could not create income {income:?}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::INCOMES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
