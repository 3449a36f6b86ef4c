//! Expenses and incomes merged into a single list of transactions.

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    api::{ApiClient, AuthToken},
    endpoints::{self, format_endpoint},
    expense::{Expense, get_expenses},
    income::{Income, get_incomes},
};

/// Whether a transaction is money going out or coming in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }
}

/// An expense or an income, reduced to the fields both have in common.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: f64,
    /// The category name of an expense or the source of an income.
    pub label: String,
    pub note: Option<String>,
    pub date: Date,
}

impl Transaction {
    pub fn note(&self) -> &str {
        self.note.as_deref().unwrap_or_default()
    }

    /// The amount with expenses counted as negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Expense => -self.amount,
            TransactionKind::Income => self.amount,
        }
    }

    /// The route that deletes this transaction.
    pub fn delete_url(&self) -> String {
        let endpoint = match self.kind {
            TransactionKind::Expense => endpoints::DELETE_EXPENSE,
            TransactionKind::Income => endpoints::DELETE_INCOME,
        };

        format_endpoint(endpoint, &self.id)
    }
}

impl From<&Expense> for Transaction {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id.clone(),
            kind: TransactionKind::Expense,
            amount: expense.amount,
            label: expense.category_name().to_owned(),
            note: expense.note.clone(),
            date: expense.date,
        }
    }
}

impl From<&Income> for Transaction {
    fn from(income: &Income) -> Self {
        Self {
            id: income.id.clone(),
            kind: TransactionKind::Income,
            amount: income.amount,
            label: income.source.clone(),
            note: income.note.clone(),
            date: income.date,
        }
    }
}

/// Merge expenses and incomes into one list, newest first.
pub fn merge_transactions(expenses: &[Expense], incomes: &[Income]) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = expenses
        .iter()
        .map(Transaction::from)
        .chain(incomes.iter().map(Transaction::from))
        .collect();
    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    transactions
}

/// Fetch the user's expenses and incomes concurrently and merge them.
pub async fn get_transactions(
    api: &ApiClient,
    token: &AuthToken,
) -> Result<Vec<Transaction>, Error> {
    let (expenses, incomes) = tokio::join!(get_expenses(api, token), get_incomes(api, token));

    Ok(merge_transactions(&expenses?, &incomes?))
}
