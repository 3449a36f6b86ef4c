//! Incomes as the API stores them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use crate::{
    Error,
    api::{ApiClient, AuthToken, calendar_date, decode_list, lenient_amount},
    endpoints::format_resource_path,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Income {
    pub id: String,
    #[serde(deserialize_with = "lenient_amount::deserialize")]
    pub amount: f64,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(with = "calendar_date")]
    pub date: Date,
}

impl Income {
    pub fn note(&self) -> &str {
        self.note.as_deref().unwrap_or_default()
    }
}

/// The body of `POST /incomes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIncome {
    pub amount: f64,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(with = "calendar_date")]
    pub date: Date,
}

/// Get all of the user's incomes, newest first.
pub async fn get_incomes(api: &ApiClient, token: &AuthToken) -> Result<Vec<Income>, Error> {
    let response: Value = api.get("/incomes", token).await?;
    let mut incomes: Vec<Income> = decode_list(response, "incomes");
    incomes.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(incomes)
}

pub async fn create_income(
    api: &ApiClient,
    token: &AuthToken,
    income: &NewIncome,
) -> Result<(), Error> {
    api.post_json::<_, serde::de::IgnoredAny>("/incomes", Some(token), income)
        .await?;

    Ok(())
}

pub async fn delete_income(api: &ApiClient, token: &AuthToken, id: &str) -> Result<(), Error> {
    api.delete::<serde::de::IgnoredAny>(&format_resource_path("/incomes/{income_id}", id)?, token)
        .await?;

    Ok(())
}
