//! The user's profile as stored by the API and the requests that change it.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    api::{ApiClient, AuthToken},
    currency::DEFAULT_CURRENCY,
};

/// The colour scheme the user prefers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::System];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    /// Parse the theme name stored in the profile, falling back to [Theme::System].
    fn from_name(name: &str) -> Self {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == name)
            .unwrap_or_default()
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which notifications the user wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    /// Monthly summary e-mails.
    #[serde(default = "enabled")]
    pub email: bool,
    /// Budget and savings alerts in the notification bell.
    #[serde(default = "enabled")]
    pub push: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
        }
    }
}

/// The profile returned by `GET /profile`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub profile_picture_url: Option<String>,
    pub phone_number: Option<String>,
    pub currency: Option<String>,
    pub language: Option<String>,
    pub theme: Option<String>,
    pub notification_preferences: NotificationPreferences,
}

impl UserProfile {
    /// The user's currency code, [DEFAULT_CURRENCY] if none is set.
    pub fn currency_code(&self) -> &str {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn theme(&self) -> Theme {
        self.theme.as_deref().map_or(Theme::System, Theme::from_name)
    }
}

#[derive(Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    data: Option<UserProfile>,
}

/// The body of `PUT /profile`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: String,
    pub phone_number: String,
    pub currency: String,
    pub theme: Theme,
    pub notification_preferences: NotificationPreferences,
}

#[derive(Deserialize)]
struct MessageResponse {
    message: Option<String>,
}

/// Get the profile of the logged in user.
///
/// A response without a `data` object is treated as an empty profile.
pub async fn get_profile(api: &ApiClient, token: &AuthToken) -> Result<UserProfile, Error> {
    let response: Option<ProfileResponse> = api.get("/profile", token).await?;

    Ok(response
        .and_then(|response| response.data)
        .unwrap_or_default())
}

/// Get the user's currency code.
///
/// Failing to load the profile is logged and [DEFAULT_CURRENCY] is used instead.
pub async fn get_currency_or_default(api: &ApiClient, token: &AuthToken) -> String {
    match get_profile(api, token).await {
        Ok(profile) => profile.currency_code().to_owned(),
        Err(error) => {
            tracing::error!("Could not load profile for the currency, using {DEFAULT_CURRENCY}: {error}");
            DEFAULT_CURRENCY.to_owned()
        }
    }
}

pub async fn update_profile(
    api: &ApiClient,
    token: &AuthToken,
    update: &ProfileUpdate,
) -> Result<(), Error> {
    api.put_json::<_, serde::de::IgnoredAny>("/profile", token, update)
        .await?;

    Ok(())
}

/// Permanently delete the user's account.
pub async fn delete_profile(api: &ApiClient, token: &AuthToken) -> Result<(), Error> {
    api.delete::<serde::de::IgnoredAny>("/profile", token).await?;

    Ok(())
}

/// Ask the API to e-mail this month's summary, returning the API's message if it sent one.
pub async fn send_monthly_summary(
    api: &ApiClient,
    token: &AuthToken,
) -> Result<Option<String>, Error> {
    let response: Option<MessageResponse> = api.post("/summary/monthly", token).await?;

    Ok(response.and_then(|response| response.message))
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    use crate::{
        currency::DEFAULT_CURRENCY,
        profile::core::{
            NotificationPreferences, ProfileUpdate, Theme, UserProfile, get_currency_or_default,
            get_profile,
        },
        test_utils::{get_test_app_state_with_stub, test_token},
    };

    #[test]
    fn missing_fields_use_defaults() {
        let profile: UserProfile = serde_json::from_str(r#"{"email":"ada@example.com"}"#).unwrap();

        assert_eq!(profile.currency_code(), DEFAULT_CURRENCY);
        assert_eq!(profile.theme(), Theme::System);
        assert_eq!(profile.notification_preferences, NotificationPreferences::default());
    }

    #[test]
    fn partial_notification_preferences_default_to_enabled() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"notificationPreferences":{"push":false}}"#).unwrap();

        assert!(profile.notification_preferences.email);
        assert!(!profile.notification_preferences.push);
    }

    #[test]
    fn unknown_theme_is_system() {
        let profile = UserProfile {
            theme: Some("sepia".to_owned()),
            ..Default::default()
        };

        assert_eq!(profile.theme(), Theme::System);
    }

    #[test]
    fn update_uses_api_field_names() {
        let update = ProfileUpdate {
            display_name: "Ada".to_owned(),
            phone_number: "021 123 4567".to_owned(),
            currency: "NZD".to_owned(),
            theme: Theme::Dark,
            notification_preferences: NotificationPreferences {
                email: false,
                push: true,
            },
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "displayName": "Ada",
                "phoneNumber": "021 123 4567",
                "currency": "NZD",
                "theme": "dark",
                "notificationPreferences": { "email": false, "push": true }
            })
        );
    }

    #[tokio::test]
    async fn profile_is_read_from_data() {
        let router = Router::new().route(
            "/profile",
            get(|| async {
                Json(json!({ "data": { "name": "Ada", "email": "ada@example.com", "currency": "EUR" } }))
            }),
        );
        let state = get_test_app_state_with_stub(router).await;

        let profile = get_profile(&state.api, &test_token()).await.unwrap();

        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.currency_code(), "EUR");
    }

    #[tokio::test]
    async fn currency_falls_back_when_profile_fails() {
        let router = Router::new().route(
            "/profile",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let state = get_test_app_state_with_stub(router).await;

        let currency = get_currency_or_default(&state.api, &test_token()).await;

        assert_eq!(currency, DEFAULT_CURRENCY);
    }
}
