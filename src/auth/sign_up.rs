//! The page and handler for creating a new account.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    api::ApiError,
    auth::{
        log_in::{API_UNREACHABLE_ERROR_MSG, LoginState, MIN_PASSWORD_LENGTH, validate_credentials},
        session::{AuthResponse, start_session},
    },
    endpoints,
    html::{LINK_STYLE, auth_card, base, password_input, submit_button, text_input},
};

const MIN_NAME_LENGTH: usize = 2;

pub(super) const SHORT_NAME_ERROR_MSG: &str = "Name must be at least 2 characters";
pub(super) const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match";

/// The values the user entered, kept so the form can be re-rendered after an error.
#[derive(Default)]
struct SignUpFormValues<'a> {
    name: &'a str,
    email: &'a str,
}

fn sign_up_form(values: SignUpFormValues, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::SIGN_UP_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" { (error_message) }
            }

            (text_input("Name", "name", "text", values.name, None))
            (text_input("Email", "email", "email", values.email, None))
            (password_input("password", "Password", MIN_PASSWORD_LENGTH, None))
            (password_input("confirm_password", "Confirm password", MIN_PASSWORD_LENGTH, None))

            (submit_button("Create account"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Response {
    let form = sign_up_form(SignUpFormValues::default(), None);
    let content = auth_card("Create an account", &form);
    base("Sign Up", &[], &content).into_response()
}

/// The raw data entered by the user in the sign-up form.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignUpData {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

fn validate_sign_up(data: &SignUpData) -> Result<(), &'static str> {
    if data.name.trim().chars().count() < MIN_NAME_LENGTH {
        return Err(SHORT_NAME_ERROR_MSG);
    }

    validate_credentials(data.email.trim(), &data.password)?;

    if data.password != data.confirm_password {
        return Err(PASSWORD_MISMATCH_ERROR_MSG);
    }

    Ok(())
}

/// Handler for sign-up requests via the POST method.
///
/// On success the new account is logged in and the client is redirected to the dashboard.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_sign_up(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(data): Form<SignUpData>,
) -> Response {
    let values = SignUpFormValues {
        name: data.name.trim(),
        email: data.email.trim(),
    };

    if let Err(message) = validate_sign_up(&data) {
        return sign_up_form(values, Some(message)).into_response();
    }

    let request = SignUpRequest {
        email: values.email,
        password: &data.password,
        name: values.name,
    };
    let response: AuthResponse = match state.api.post_json("/auth/signup", None, &request).await
    {
        Ok(response) => response,
        Err(error) => {
            tracing::error!("Sign up failed: {error}");
            let message = match &error {
                ApiError::Network(_) => API_UNREACHABLE_ERROR_MSG,
                error => error.message_or("Failed to create account. Please try again."),
            };
            return sign_up_form(values, Some(message)).into_response();
        }
    };

    match start_session(
        jar,
        response,
        values.email,
        Some(values.name),
        state.cookie_duration,
    ) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(message) => sign_up_form(values, Some(message)).into_response(),
    }
}

#[cfg(test)]
mod sign_up_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form, Json, Router,
        extract::{FromRef, State},
        http::StatusCode,
        routing::post,
    };
    use axum_extra::extract::PrivateCookieJar;
    use serde_json::{Value, json};

    use crate::{
        auth::LoginState,
        endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input, assert_form_input_with_value,
            assert_hx_endpoint, assert_hx_redirect, assert_valid_html, get_test_app_state,
            get_test_app_state_with_stub, must_get_form, parse_html_document,
            parse_html_fragment,
        },
    };

    use super::{
        PASSWORD_MISMATCH_ERROR_MSG, SHORT_NAME_ERROR_MSG, SignUpData, get_sign_up_page,
        post_sign_up,
    };

    fn sign_up_data() -> SignUpData {
        SignUpData {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password: "password123".to_owned(),
            confirm_password: "password123".to_owned(),
        }
    }

    #[tokio::test]
    async fn sign_up_page_displays_form() {
        let response = get_sign_up_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::SIGN_UP_API, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "password", "password");
        assert_form_input(&form, "confirm_password", "password");
    }

    #[tokio::test]
    async fn mismatched_passwords_are_rejected() {
        let state = LoginState::from_ref(&get_test_app_state("http://127.0.0.1:1"));
        let jar = PrivateCookieJar::new(state.cookie_key.clone());
        let mut data = sign_up_data();
        data.confirm_password = "password456".to_owned();

        let response = post_sign_up(State(state), jar, Form(data)).await;

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, PASSWORD_MISMATCH_ERROR_MSG);
        assert_form_input_with_value(&form, "email", "email", "ada@example.com");
    }

    #[tokio::test]
    async fn short_name_is_rejected() {
        let state = LoginState::from_ref(&get_test_app_state("http://127.0.0.1:1"));
        let jar = PrivateCookieJar::new(state.cookie_key.clone());
        let mut data = sign_up_data();
        data.name = "A".to_owned();

        let response = post_sign_up(State(state), jar, Form(data)).await;

        let html = parse_html_fragment(response).await;
        assert_form_error_message(&must_get_form(&html), SHORT_NAME_ERROR_MSG);
    }

    #[tokio::test]
    async fn existing_account_shows_api_message() {
        let router = Router::new().route(
            "/auth/signup",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({ "message": "Email already in use" })),
                )
            }),
        );
        let state = LoginState::from_ref(&get_test_app_state_with_stub(router).await);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = post_sign_up(State(state), jar, Form(sign_up_data())).await;

        let html = parse_html_fragment(response).await;
        assert_form_error_message(&must_get_form(&html), "Email already in use");
    }

    #[tokio::test]
    async fn sign_up_sends_name_and_redirects_to_dashboard() {
        let received = Arc::new(Mutex::new(Value::Null));
        let captured = received.clone();
        let router = Router::new().route(
            "/auth/signup",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = body;
                    (StatusCode::CREATED, Json(json!({ "token": "api-token" })))
                }
            }),
        );
        let state = LoginState::from_ref(&get_test_app_state_with_stub(router).await);
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        let response = post_sign_up(State(state), jar, Form(sign_up_data())).await;

        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert!(response.headers().get("set-cookie").is_some());
        assert_eq!(
            *received.lock().unwrap(),
            json!({ "email": "ada@example.com", "password": "password123", "name": "Ada" })
        );
    }
}
