//! Implements a struct that holds the state of the web server.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, api::ApiClient, auth::DEFAULT_COOKIE_DURATION};

/// How often the notification bell asks for new notifications by default.
pub const DEFAULT_NOTIFICATION_POLL_SECONDS: u64 = 60;

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The client for the Cashlyzer REST API.
    pub api: ApiClient,

    /// The number of seconds between notification bell refreshes.
    pub notification_poll_seconds: u64,
}

impl AppState {
    /// Create a new [AppState] that forwards requests to the API at `api_base_url`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        cookie_secret: &str,
        local_timezone: &str,
        api_base_url: &str,
        notification_poll_seconds: u64,
    ) -> Result<Self, Error> {
        let api = ApiClient::new(api_base_url)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            api,
            notification_poll_seconds,
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl FromRef<AppState> for ApiClient {
    fn from_ref(state: &AppState) -> Self {
        state.api.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
