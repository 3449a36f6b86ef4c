//! Defines the endpoint for saving the settings form.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    api::{ApiClient, AuthToken},
    currency::find_currency,
    profile::core::{NotificationPreferences, ProfileUpdate, Theme, update_profile},
};

/// The form data for updating the profile.
///
/// Unchecked checkboxes are left out of the form, so they are `None`.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub display_name: String,
    #[serde(default)]
    pub phone_number: String,
    pub currency: String,
    #[serde(default)]
    pub theme: Theme,
    pub email_notifications: Option<String>,
    pub push_notifications: Option<String>,
}

impl ProfileForm {
    fn into_update(self) -> Result<ProfileUpdate, Error> {
        let display_name = self.display_name.trim().to_owned();
        if display_name.is_empty() {
            return Err(Error::Validation("Name cannot be empty".to_owned()));
        }

        let currency = self.currency.trim();
        if find_currency(currency).is_none() {
            return Err(Error::Validation(format!(
                "\"{currency}\" is not a supported currency"
            )));
        }

        Ok(ProfileUpdate {
            display_name,
            phone_number: self.phone_number.trim().to_owned(),
            currency: currency.to_owned(),
            theme: self.theme,
            notification_preferences: NotificationPreferences {
                email: self.email_notifications.is_some(),
                push: self.push_notifications.is_some(),
            },
        })
    }
}

/// A route handler for saving the profile, responds with a success alert.
pub async fn update_profile_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let update = match form.into_update() {
        Ok(update) => update,
        Err(error) => return error.into_alert_response(),
    };

    match update_profile(&api, &token, &update).await {
        Ok(()) => Alert::SuccessSimple {
            message: "Profile updated successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not update profile with {update:?}: {error}");
            error.into_alert_response()
        }
    }
}
