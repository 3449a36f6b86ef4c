//! The monthly budget and how much of it has been spent.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    api::{ApiClient, AuthToken, lenient_amount},
};

/// The number of expenses and incomes recorded this month.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransactionCount {
    pub expenses: u32,
    pub incomes: u32,
}

/// The budget for the current month.
///
/// Every field is zero or empty when the user has not set a budget.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetOverview {
    #[serde(deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub monthly_budget: f64,
    #[serde(deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub budget_utilization: f64,
    #[serde(deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub balance: f64,
    pub month: Option<String>,
    #[serde(deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub total_expenses: f64,
    #[serde(deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub total_income: f64,
    pub transaction_count: Option<TransactionCount>,
}

/// `GET /budget` answers with either the overview or just the monthly budget.
#[derive(Deserialize)]
#[serde(untagged)]
enum BudgetResponse {
    Amount(f64),
    Overview(BudgetOverview),
}

impl From<BudgetResponse> for BudgetOverview {
    fn from(response: BudgetResponse) -> Self {
        match response {
            BudgetResponse::Amount(monthly_budget) => BudgetOverview {
                monthly_budget,
                ..Default::default()
            },
            BudgetResponse::Overview(overview) => overview,
        }
    }
}

impl BudgetOverview {
    /// This month's expenses as a percentage of the budget, 0 without a budget.
    ///
    /// Not capped, spending over budget gives a value above 100.
    pub fn utilisation(&self) -> f64 {
        if self.monthly_budget > 0.0 {
            self.total_expenses * 100.0 / self.monthly_budget
        } else {
            0.0
        }
    }

    pub fn status(&self) -> BudgetStatus {
        BudgetStatus::from_utilisation(self.utilisation())
    }
}

/// The headline shown above the budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetStatus {
    /// Spending is over budget by `excess` percent.
    Exceeded { excess: f64 },
    FullyUsed,
    /// Spending is at 90% of the budget or more.
    Alert,
    NoSpending,
    WithinBudget,
}

impl BudgetStatus {
    pub fn from_utilisation(utilisation: f64) -> Self {
        if utilisation > 100.0 {
            BudgetStatus::Exceeded {
                excess: utilisation - 100.0,
            }
        } else if utilisation == 100.0 {
            BudgetStatus::FullyUsed
        } else if utilisation >= 90.0 {
            BudgetStatus::Alert
        } else if utilisation == 0.0 {
            BudgetStatus::NoSpending
        } else {
            BudgetStatus::WithinBudget
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            BudgetStatus::Exceeded { .. } => "Budget Exceeded",
            BudgetStatus::FullyUsed => "Budget Fully Used",
            BudgetStatus::Alert => "Budget Alert",
            BudgetStatus::NoSpending => "No Spending Yet",
            BudgetStatus::WithinBudget => "Budget Status",
        }
    }

    pub fn description(&self) -> String {
        match self {
            BudgetStatus::Exceeded { excess } => {
                format!("You've exceeded your monthly budget by {excess:.1}%!")
            }
            BudgetStatus::FullyUsed => {
                "You've exactly met your monthly budget. Plan ahead to avoid overspending."
                    .to_owned()
            }
            BudgetStatus::Alert => "You're close to exceeding your monthly budget!".to_owned(),
            BudgetStatus::NoSpending => "You haven't recorded any expenses this month.".to_owned(),
            BudgetStatus::WithinBudget => "Your spending is within budget limits.".to_owned(),
        }
    }

    /// Whether the status should be shown as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, BudgetStatus::Exceeded { .. } | BudgetStatus::Alert)
    }
}

/// The body of `POST /budget`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub monthly_budget: f64,
}

/// Get this month's budget, all zeros if the user has not set one.
pub async fn get_budget(api: &ApiClient, token: &AuthToken) -> Result<BudgetOverview, Error> {
    let response: Option<Option<BudgetResponse>> = api.get_optional("/budget", token).await?;

    Ok(response.flatten().map(BudgetOverview::from).unwrap_or_default())
}

pub async fn set_budget(api: &ApiClient, token: &AuthToken, monthly_budget: f64) -> Result<(), Error> {
    api.post_json::<_, serde::de::IgnoredAny>("/budget", Some(token), &NewBudget { monthly_budget })
        .await?;

    Ok(())
}
