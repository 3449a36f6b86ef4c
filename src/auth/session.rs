//! Starting a session from the API's log-in and sign-up responses.

use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use time::Duration;

use crate::auth::{cookie::set_auth_cookie, token::SessionUser};

/// The body the API returns from `/auth/login` and `/auth/signup`.
#[derive(Debug, Deserialize)]
pub(super) struct AuthResponse {
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<ApiUser>,
}

/// The parts of the API's user object the session keeps.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiUser {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

pub(super) const NO_TOKEN_ERROR_MSG: &str = "No token received from server";

/// Store the API token from `response` in the auth cookie.
///
/// `email` and `fallback_name` fill in whatever the API's user object leaves out.
///
/// # Errors
/// Returns a message for the user if the response has no token or the cookie
/// could not be set.
pub(super) fn start_session(
    jar: PrivateCookieJar,
    response: AuthResponse,
    email: &str,
    fallback_name: Option<&str>,
    duration: Duration,
) -> Result<PrivateCookieJar, &'static str> {
    let token = response
        .token
        .filter(|token| !token.is_empty())
        .ok_or(NO_TOKEN_ERROR_MSG)?;

    let (name, api_email) = match response.user {
        Some(user) => (user.display_name.or(user.name), user.email),
        None => (None, None),
    };
    let email = api_email.unwrap_or_else(|| email.to_owned());
    let name = name
        .or_else(|| fallback_name.map(str::to_owned))
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_owned());

    set_auth_cookie(jar, &token, SessionUser { name, email }, duration).map_err(|error| {
        tracing::error!("Error setting auth cookie: {error}");
        "An internal error occurred. Please try again later."
    })
}
