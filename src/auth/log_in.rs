//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The credentials are checked by the API, this module only keeps the token it hands back.

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use email_address::EmailAddress;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState,
    api::{ApiClient, ApiError},
    auth::{
        redirect::normalize_redirect_url,
        session::{AuthResponse, start_session},
    },
    endpoints,
    html::{
        FORM_CHECKBOX_STYLE, LINK_STYLE, auth_card, base, password_input, submit_button,
        text_input,
    },
};

/// The shortest password the API accepts.
pub(super) const MIN_PASSWORD_LENGTH: u8 = 8;

pub(super) const INVALID_EMAIL_ERROR_MSG: &str = "Please enter a valid email address";
pub(super) const SHORT_PASSWORD_ERROR_MSG: &str = "Password must be at least 8 characters";
pub(super) const NO_ACCOUNT_ERROR_MSG: &str = "Account doesn't exist. Please sign up.";
pub(super) const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";
pub(super) const API_UNREACHABLE_ERROR_MSG: &str =
    "Could not reach Cashlyzer. Please try again later.";

/// Check the e-mail and password before they are sent to the API.
pub(super) fn validate_credentials(email: &str, password: &str) -> Result<(), &'static str> {
    if !EmailAddress::is_valid(email.trim()) {
        return Err(INVALID_EMAIL_ERROR_MSG);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH as usize {
        return Err(SHORT_PASSWORD_ERROR_MSG);
    }

    Ok(())
}

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" { (error_message) }
            }

            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (text_input("Email", "email", "email", email, None))
            (password_input("password", "Password", MIN_PASSWORD_LENGTH, None))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class=(FORM_CHECKBOX_STYLE);

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            (submit_button("Log in"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Forgot your password? "
                a href=(endpoints::FORGOT_PASSWORD_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Reset it here"
                }
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Don't have an account? "
                a href=(endpoints::SIGN_UP_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Sign up here"
                }
            }
        }
    }
}

pub(super) fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let log_in_form = log_in_form("", None, redirect_url.as_deref());
    let content = auth_card("Log in to your account", &log_in_form);
    base("Log In", &[], &content).into_response()
}

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The client used to check the user's credentials.
    pub api: ApiClient,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            api: state.api.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Serialize)]
struct LogInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Map a failed log-in call to the message shown above the form.
fn log_in_error_message(error: &ApiError) -> &str {
    match error {
        ApiError::NotFound { .. } => NO_ACCOUNT_ERROR_MSG,
        ApiError::Unauthorized => INVALID_CREDENTIALS_ERROR_MSG,
        ApiError::Network(_) => API_UNREACHABLE_ERROR_MSG,
        error => {
            error.message_or("Failed to log in. Please check your credentials and try again.")
        }
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie set and the client is redirected to the
/// dashboard page, or the page they were on before being asked to log in.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();
    let email = user_data.email.trim();

    if let Err(message) = validate_credentials(email, &user_data.password) {
        return log_in_form(email, Some(message), redirect_url).into_response();
    }

    let request = LogInRequest {
        email,
        password: &user_data.password,
    };
    let response: AuthResponse = match state.api.post_json("/auth/login", None, &request).await {
        Ok(response) => response,
        Err(error) => {
            tracing::error!("Log in failed: {error}");
            return log_in_form(email, Some(log_in_error_message(&error)), redirect_url)
                .into_response();
        }
    };

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    match start_session(jar, response, email, None, cookie_duration) {
        Ok(jar) => {
            let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);
            (
                StatusCode::SEE_OTHER,
                HxRedirect(redirect_url.to_owned()),
                jar,
            )
                .into_response()
        }
        Err(message) => log_in_form(email, Some(message), redirect_url).into_response(),
    }
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// E-mail address entered during log-in.
    pub email: String,

    /// Password entered during log-in.
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set
    /// (see the [MDN docs](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/input/checkbox#value_2)).
    /// The `Some` variant should be interpreted as `true` irregardless of the
    /// string value, and the `None` variant should be interpreted as `false`.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    /// Only accepted from the log-in form submission.
    pub redirect_url: Option<String>,
}
