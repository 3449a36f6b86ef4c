//! Expenses and expense categories as the API stores them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use crate::{
    Error,
    api::{ApiClient, AuthToken, calendar_date, decode_list, lenient_amount},
    endpoints::format_resource_path,
};

/// The label shown for expenses without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The category of an expense, which the API sends either as a plain name or
/// as an object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Name(String),
    Object {
        #[serde(default)]
        id: Option<String>,
        name: String,
    },
}

impl CategoryRef {
    pub fn name(&self) -> &str {
        match self {
            CategoryRef::Name(name) | CategoryRef::Object { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    #[serde(deserialize_with = "lenient_amount::deserialize")]
    pub amount: f64,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(with = "calendar_date")]
    pub date: Date,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl Expense {
    /// The category name, or [UNCATEGORIZED].
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(CategoryRef::name)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn note(&self) -> &str {
        self.note.as_deref().unwrap_or_default()
    }
}

/// An expense category offered when adding an expense.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// The subcategories of the category with the ID `category_id`, empty for unknown categories.
pub fn subcategories_of<'a>(categories: &'a [Category], category_id: &str) -> &'a [String] {
    categories
        .iter()
        .find(|category| category.id == category_id)
        .map(|category| category.subcategories.as_slice())
        .unwrap_or_default()
}

/// The body of `POST /expenses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: f64,
    pub note: String,
    #[serde(with = "calendar_date")]
    pub date: Date,
    /// The ID of the category.
    pub category: String,
    pub subcategory: Option<String>,
    pub payment_method: &'static str,
}

/// Every expense is recorded as paid in cash.
pub const PAYMENT_METHOD: &str = "cash";

/// Get all of the user's expenses, newest first.
pub async fn get_expenses(api: &ApiClient, token: &AuthToken) -> Result<Vec<Expense>, Error> {
    let response: Value = api.get("/expenses", token).await?;
    let mut expenses: Vec<Expense> = decode_list(response, "expenses");
    expenses.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(expenses)
}

pub async fn get_categories(api: &ApiClient, token: &AuthToken) -> Result<Vec<Category>, Error> {
    let response: Value = api.get("/categories", token).await?;

    Ok(decode_list(response, "categories"))
}

pub async fn create_expense(
    api: &ApiClient,
    token: &AuthToken,
    expense: &NewExpense,
) -> Result<(), Error> {
    api.post_json::<_, serde::de::IgnoredAny>("/expenses", Some(token), expense)
        .await?;

    Ok(())
}

pub async fn delete_expense(api: &ApiClient, token: &AuthToken, id: &str) -> Result<(), Error> {
    api.delete::<serde::de::IgnoredAny>(&format_resource_path("/expenses/{expense_id}", id)?, token)
        .await?;

    Ok(())
}
