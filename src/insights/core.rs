//! The AI generated analysis of the user's finances.

use serde::Deserialize;
use time::{
    OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{
    Error,
    api::{ApiClient, AuthToken, lenient_amount},
};

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Prediction {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TopCategory {
    pub category: String,
    #[serde(deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub amount: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsightSummary {
    #[serde(deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub total_spent: f64,
    #[serde(deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub total_income: f64,
    #[serde(deserialize_with = "lenient_amount::deserialize_or_zero")]
    pub average_transaction: f64,
    pub budget_status: Option<String>,
    pub top_categories: Vec<TopCategory>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightMetadata {
    pub total_transactions: u64,
    pub last_updated: Option<String>,
    pub analysis_period: Option<String>,
}

impl InsightMetadata {
    /// The time of the analysis in the local timezone, e.g. "2025-03-10 14:05".
    pub fn last_updated(&self, offset: UtcOffset) -> Option<String> {
        let text = self.last_updated.as_deref()?;

        let formatted = OffsetDateTime::parse(text, &Rfc3339)
            .ok()
            .and_then(|timestamp| {
                timestamp
                    .to_offset(offset)
                    .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
                    .ok()
            })
            .unwrap_or_else(|| text.to_owned());

        Some(formatted)
    }
}

/// The response of `GET /ai/insights`. Missing sections are empty.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiInsights {
    pub insights: Vec<Insight>,
    pub summary: InsightSummary,
    pub predictions: Vec<Prediction>,
    pub metadata: Option<InsightMetadata>,
}

/// An insight or prediction type for display, e.g. "spending_pattern" as "spending pattern".
pub fn display_kind(kind: &str) -> String {
    kind.replace('_', " ")
}

pub async fn get_insights(api: &ApiClient, token: &AuthToken) -> Result<AiInsights, Error> {
    let insights: Option<AiInsights> = api.get("/ai/insights", token).await?;

    Ok(insights.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::UtcOffset;

    use super::{AiInsights, display_kind};

    #[test]
    fn decodes_full_response() {
        let insights: AiInsights = serde_json::from_value(json!({
            "insights": [{ "type": "spending_pattern", "message": "You spend most on weekends", "timestamp": "2025-03-10T10:00:00.000Z" }],
            "summary": {
                "total_spent": 1200.5,
                "total_income": "3000",
                "average_transaction": 45,
                "budget_status": "On track",
                "top_categories": [{ "category": "Food", "amount": 400 }]
            },
            "predictions": [{ "type": "next_month", "message": "Expect to spend $1,100" }],
            "metadata": { "totalTransactions": 42, "lastUpdated": "2025-03-10T10:05:00.000Z", "analysisPeriod": "30 days" }
        }))
        .unwrap();

        assert_eq!(insights.insights[0].kind, "spending_pattern");
        assert_eq!(insights.summary.total_income, 3000.0);
        assert_eq!(insights.summary.top_categories[0].category, "Food");
        assert_eq!(insights.predictions.len(), 1);
        let metadata = insights.metadata.unwrap();
        assert_eq!(metadata.total_transactions, 42);
        assert_eq!(
            metadata.last_updated(UtcOffset::from_hms(2, 0, 0).unwrap()).as_deref(),
            Some("2025-03-10 12:05")
        );
    }

    #[test]
    fn missing_sections_are_empty() {
        let insights: AiInsights = serde_json::from_value(json!({})).unwrap();
        let partial: AiInsights = serde_json::from_value(json!({ "insights": [] })).unwrap();

        assert_eq!(insights, AiInsights::default());
        assert_eq!(partial.summary.total_spent, 0.0);
        assert!(partial.metadata.is_none());
    }

    #[test]
    fn underscores_become_spaces() {
        assert_eq!(display_kind("budget_over_limit"), "budget over limit");
        assert_eq!(display_kind("saving"), "saving");
    }
}
