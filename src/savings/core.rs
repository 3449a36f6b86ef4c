//! The user's savings plan and their progress towards its target.

use serde::{Deserialize, Serialize, Serializer};
use time::{Date, macros::format_description};

use crate::{
    Error,
    api::{ApiClient, AuthToken, FirestoreTimestamp, lenient_amount},
    endpoints::format_resource_path,
};

/// The savings for one month of the plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySavings {
    /// The month label, e.g. "Jan".
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub savings: f64,
    /// Whether the month is in the future and the savings are an estimate.
    #[serde(default)]
    pub is_projected: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlan {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub current_amount: f64,
    #[serde(default, deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub monthly_contribution: f64,
    #[serde(default, deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub target_amount: f64,
    #[serde(default)]
    pub target_date: Option<FirestoreTimestamp>,
    #[serde(default)]
    pub start_date: Option<FirestoreTimestamp>,
    #[serde(default)]
    pub monthly_data: Vec<MonthlySavings>,
    /// Whether this month's contribution can still be made.
    #[serde(default)]
    pub can_contribute: bool,
    /// The balance available for contributing.
    #[serde(default)]
    pub current_balance: Option<f64>,
}

impl SavingsPlan {
    /// The current amount as a percentage of the target, 0 without a target.
    pub fn progress(&self) -> f64 {
        if self.target_amount > 0.0 {
            self.current_amount * 100.0 / self.target_amount
        } else {
            0.0
        }
    }

    pub fn status(&self) -> SavingsStatus {
        SavingsStatus::from_progress(self.progress())
    }
}

/// The headline shown above the savings plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavingsStatus {
    GoalAchieved,
    AlmostThere,
    GoodProgress,
    KeepSaving,
}

impl SavingsStatus {
    pub fn from_progress(progress: f64) -> Self {
        if progress >= 100.0 {
            SavingsStatus::GoalAchieved
        } else if progress >= 90.0 {
            SavingsStatus::AlmostThere
        } else if progress >= 50.0 {
            SavingsStatus::GoodProgress
        } else {
            SavingsStatus::KeepSaving
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SavingsStatus::GoalAchieved => "Goal Achieved!",
            SavingsStatus::AlmostThere => "Almost There!",
            SavingsStatus::GoodProgress => "Good Progress",
            SavingsStatus::KeepSaving => "Keep Saving",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SavingsStatus::GoalAchieved => "Congratulations! You've reached your savings goal.",
            SavingsStatus::AlmostThere => "You're close to reaching your savings goal!",
            SavingsStatus::GoodProgress => {
                "You're making good progress towards your savings goal."
            }
            SavingsStatus::KeepSaving => "Continue your savings journey to reach your goal.",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavingsResponse {
    #[serde(default)]
    savings_plan: Option<SavingsPlan>,
}

/// The body of `POST /savings` and `PUT /savings/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlanInput {
    pub monthly_contribution: f64,
    pub target_amount: f64,
    #[serde(serialize_with = "serialize_target_date")]
    pub target_date: Option<Date>,
}

/// The API stores the target date as midnight UTC, e.g. "2025-12-31T00:00:00.000Z".
fn serialize_target_date<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => {
            let text = date
                .format(format_description!("[year]-[month]-[day]T00:00:00.000Z"))
                .map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(&text)
        }
        None => serializer.serialize_none(),
    }
}

/// Get the user's savings plan, `None` if they do not have one.
pub async fn get_savings_plan(
    api: &ApiClient,
    token: &AuthToken,
) -> Result<Option<SavingsPlan>, Error> {
    let response: Option<Option<SavingsResponse>> = api.get_optional("/savings", token).await?;

    Ok(response.flatten().and_then(|response| response.savings_plan))
}

pub async fn create_savings_plan(
    api: &ApiClient,
    token: &AuthToken,
    plan: &SavingsPlanInput,
) -> Result<(), Error> {
    api.post_json::<_, serde::de::IgnoredAny>("/savings", Some(token), plan)
        .await?;

    Ok(())
}

pub async fn update_savings_plan(
    api: &ApiClient,
    token: &AuthToken,
    id: &str,
    plan: &SavingsPlanInput,
) -> Result<(), Error> {
    api.put_json::<_, serde::de::IgnoredAny>(&format_resource_path("/savings/{savings_id}", id)?, token, plan)
        .await?;

    Ok(())
}

pub async fn delete_savings_plan(api: &ApiClient, token: &AuthToken, id: &str) -> Result<(), Error> {
    api.delete::<serde::de::IgnoredAny>(&format_resource_path("/savings/{savings_id}", id)?, token)
        .await?;

    Ok(())
}

/// Add this month's contribution to the plan.
pub async fn contribute(api: &ApiClient, token: &AuthToken, id: &str) -> Result<(), Error> {
    api.post::<serde::de::IgnoredAny>(
        &format_resource_path("/savings/{savings_id}/contribute", id)?,
        token,
    )
    .await?;

    Ok(())
}
