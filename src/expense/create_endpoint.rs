//! Defines the endpoint for adding an expense.

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
    expense::core::{
        Category, NewExpense, PAYMENT_METHOD, create_expense, get_categories, subcategories_of,
    },
};

/// The form data for adding an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    pub amount: f64,
    /// The ID of the category.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub note: String,
    #[serde(with = "calendar_date")]
    pub date: Date,
}

impl ExpenseForm {
    fn into_new_expense(self) -> Result<NewExpense, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::Validation("Amount must be a positive number".to_owned()));
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(Error::Validation("Category is required".to_owned()));
        }

        let subcategory = self.subcategory.trim();

        Ok(NewExpense {
            amount: self.amount,
            note: self.note.trim().to_owned(),
            date: self.date,
            category: category.to_owned(),
            subcategory: (!subcategory.is_empty()).then(|| subcategory.to_owned()),
            payment_method: PAYMENT_METHOD,
        })
    }
}

const SUBCATEGORY_MISMATCH_MSG: &str = "Subcategory does not belong to the selected category";

fn check_subcategory(expense: &NewExpense, categories: &[Category]) -> Result<(), Error> {
    match &expense.subcategory {
        Some(subcategory)
            if !subcategories_of(categories, &expense.category).contains(subcategory) =>
        {
            Err(Error::Validation(SUBCATEGORY_MISMATCH_MSG.to_owned()))
        }
        _ => Ok(()),
    }
}

/// A route handler for adding an expense, redirects to the expenses view on success.
pub async fn create_expense_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let expense = match form.into_new_expense() {
        Ok(expense) => expense,
        Err(error) => return error.into_alert_response(),
    };

    if expense.subcategory.is_some() {
        let checked = match get_categories(&api, &token).await {
            Ok(categories) => check_subcategory(&expense, &categories),
            Err(error) => Err(error),
        };

        if let Err(error) = checked {
            return error.into_alert_response();
        }
    }

    if let Err(error) = create_expense(&api, &token, &expense).await {
        tracing::error!("Could not create expense {expense:?}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
