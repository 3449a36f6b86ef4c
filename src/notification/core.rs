//! Budget and savings alerts raised by the API.

use serde::Deserialize;
use serde_json::Value;
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::{
    Error,
    api::{ApiClient, AuthToken, decode_list},
    endpoints::format_resource_path,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    SavingsAlert,
    BudgetAlert,
}

impl NotificationType {
    pub fn title(self) -> &'static str {
        match self {
            NotificationType::SavingsAlert => "Savings Alert",
            NotificationType::BudgetAlert => "Budget Alert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// The colour of the unread marker.
    pub fn marker_style(self) -> &'static str {
        match self {
            Severity::High => "bg-red-600",
            Severity::Medium => "bg-yellow-500",
            Severity::Low => "bg-blue-600",
        }
    }
}

/// A notification as the API sends it.
///
/// Entries with an unknown type or severity, or with fields of the wrong
/// type, fail to deserialize and are dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    pub severity: Severity,
    pub read: bool,
    pub timestamp: String,
}

impl Notification {
    /// When the notification was raised, e.g. "3h ago".
    pub fn relative_time(&self, now: OffsetDateTime, offset: UtcOffset) -> String {
        match OffsetDateTime::parse(&self.timestamp, &Rfc3339) {
            Ok(timestamp) => relative_time(timestamp, now, offset),
            Err(error) => {
                tracing::debug!("Could not parse notification timestamp {:?}: {error}", self.timestamp);
                self.timestamp.clone()
            }
        }
    }
}

/// "Nh ago" within a day, "Yesterday" within two days, otherwise the local date.
pub fn relative_time(timestamp: OffsetDateTime, now: OffsetDateTime, offset: UtcOffset) -> String {
    let hours = (now - timestamp).abs().as_seconds_f64() / 3600.0;

    if hours < 24.0 {
        format!("{:.0}h ago", hours.round())
    } else if hours < 48.0 {
        "Yesterday".to_owned()
    } else {
        timestamp.to_offset(offset).date().to_string()
    }
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications
        .iter()
        .filter(|notification| !notification.read)
        .count()
}

pub async fn get_notifications(
    api: &ApiClient,
    token: &AuthToken,
) -> Result<Vec<Notification>, Error> {
    let response: Value = api.get("/notifications", token).await?;

    Ok(decode_list(response, "notifications"))
}

pub async fn mark_read(api: &ApiClient, token: &AuthToken, id: &str) -> Result<(), Error> {
    api.patch::<serde::de::IgnoredAny>(
        &format_resource_path("/notifications/{notification_id}/read", id)?,
        token,
    )
    .await?;

    Ok(())
}

pub async fn mark_all_read(api: &ApiClient, token: &AuthToken) -> Result<(), Error> {
    api.patch::<serde::de::IgnoredAny>("/notifications/read-all", token)
        .await?;

    Ok(())
}

/// Delete the notifications the API considers old.
pub async fn clear_old(api: &ApiClient, token: &AuthToken) -> Result<(), Error> {
    api.delete::<serde::de::IgnoredAny>("/notifications/old", token)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, routing::get};
    use serde_json::json;
    use time::{Duration, UtcOffset, macros::datetime};

    use crate::test_utils::{get_test_app_state_with_stub, test_token};

    use super::{NotificationType, Severity, get_notifications, relative_time, unread_count};

    #[test]
    fn relative_time_buckets() {
        let now = datetime!(2025-03-10 12:00 UTC);

        assert_eq!(relative_time(now - Duration::minutes(20), now, UtcOffset::UTC), "0h ago");
        assert_eq!(relative_time(now - Duration::minutes(150), now, UtcOffset::UTC), "3h ago");
        assert_eq!(relative_time(now - Duration::hours(30), now, UtcOffset::UTC), "Yesterday");
        assert_eq!(relative_time(now - Duration::hours(72), now, UtcOffset::UTC), "2025-03-07");
    }

    #[test]
    fn old_dates_use_local_offset() {
        let now = datetime!(2025-03-10 12:00 UTC);
        let timestamp = datetime!(2025-03-05 23:30 UTC);
        let offset = UtcOffset::from_hms(13, 0, 0).unwrap();

        assert_eq!(relative_time(timestamp, now, offset), "2025-03-06");
    }

    #[tokio::test]
    async fn drops_invalid_notifications() {
        let router = Router::new().route(
            "/notifications",
            get(|| async {
                Json(json!({
                    "message": "ok",
                    "notifications": [
                        { "id": "n1", "type": "budget_alert", "message": "90% of budget used", "severity": "high", "read": false, "timestamp": "2025-03-10T10:00:00.000Z" },
                        { "id": "n2", "type": "weather_alert", "message": "Rain", "severity": "low", "read": false, "timestamp": "2025-03-10T10:00:00.000Z" },
                        { "id": "n3", "type": "savings_alert", "message": "Goal reached", "severity": "urgent", "read": false, "timestamp": "2025-03-10T10:00:00.000Z" },
                        { "id": "n4", "type": "savings_alert", "message": "Halfway", "severity": "low", "read": "no", "timestamp": "2025-03-10T10:00:00.000Z" },
                        { "id": "n5", "type": "savings_alert", "message": "Halfway", "severity": "medium", "read": true, "timestamp": "2025-03-09T10:00:00.000Z" }
                    ]
                }))
            }),
        );
        let state = get_test_app_state_with_stub(router).await;

        let notifications = get_notifications(&state.api, &test_token()).await.unwrap();

        let ids: Vec<&str> = notifications.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["n1", "n5"]);
        assert_eq!(notifications[0].kind, NotificationType::BudgetAlert);
        assert_eq!(notifications[1].severity, Severity::Medium);
        assert_eq!(unread_count(&notifications), 1);
    }

    #[tokio::test]
    async fn response_without_array_is_empty() {
        let router = Router::new().route(
            "/notifications",
            get(|| async { Json(json!({ "message": "No notifications" })) }),
        );
        let state = get_test_app_state_with_stub(router).await;

        let notifications = get_notifications(&state.api, &test_token()).await.unwrap();

        assert!(notifications.is_empty());
    }
}
