//! The page for requesting a password reset e-mail.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use email_address::EmailAddress;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    alert::Alert,
    api::{ApiClient, ApiError},
    auth::log_in::{API_UNREACHABLE_ERROR_MSG, INVALID_EMAIL_ERROR_MSG},
    endpoints,
    html::{LINK_STYLE, auth_card, base, submit_button, text_input},
};

const RESET_SENT_MSG: &str = "Password reset instructions sent to your email!";

fn forgot_password_form(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::FORGOT_PASSWORD_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" { (error_message) }
            }

            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                "Enter the e-mail address of your account and we'll send you instructions to reset your password."
            }

            (text_input("Email", "email", "email", email, None))

            (submit_button("Send reset instructions"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Remembered it? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE) { "Back to log in" }
            }
        }
    }
}

/// Renders the page for requesting a password reset e-mail.
pub async fn get_forgot_password_page() -> Response {
    let form = forgot_password_form("", None);
    let content = auth_card("Forgot your password?", &form);
    base("Forgot Password", &[], &content).into_response()
}

/// The e-mail entered in the forgot password form.
#[derive(Serialize, Deserialize)]
pub struct ForgotPasswordData {
    pub email: String,
}

/// Ask the API to e-mail password reset instructions.
///
/// On success the form is replaced with a confirmation and a success alert.
pub async fn post_forgot_password(
    State(api): State<ApiClient>,
    Form(data): Form<ForgotPasswordData>,
) -> Response {
    let email = data.email.trim();

    if !EmailAddress::is_valid(email) {
        return forgot_password_form(email, Some(INVALID_EMAIL_ERROR_MSG)).into_response();
    }

    let request = ForgotPasswordData {
        email: email.to_owned(),
    };
    match api
        .post_json::<_, serde_json::Value>("/auth/forgot-password", None, &request)
        .await
    {
        Ok(_) => html! {
            p class="text-base text-gray-900 dark:text-white"
            {
                "If an account exists for " strong { (email) } ", you will receive an e-mail shortly."
            }
            a href=(endpoints::LOG_IN_VIEW) class=(LINK_STYLE) { "Back to log in" }

            (Alert::SuccessSimple { message: RESET_SENT_MSG.to_owned() }.into_oob_html())
        }
        .into_response(),
        Err(error) => {
            tracing::error!("Could not request password reset: {error}");
            let message = match &error {
                ApiError::Network(_) => API_UNREACHABLE_ERROR_MSG,
                error => error.message_or("Failed to send reset instructions. Please try again."),
            };
            forgot_password_form(email, Some(message)).into_response()
        }
    }
}
