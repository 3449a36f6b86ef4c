//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    alert::Alert, api::ApiError, auth::SessionRejected, endpoints,
    internal_server_error::InternalServerError, not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The session cookie is missing from the cookie jar in the request.
    #[error("no session cookie in the cookie jar :(")]
    CookieMissing,

    /// The session cookie could not be decoded.
    #[error("could not decode the session cookie: {0}")]
    InvalidSessionCookie(String),

    /// The session cookie has expired.
    #[error("the session has expired")]
    SessionExpired,

    /// There was an error formatting the date in the cookie or creating the
    /// new expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The API rejected the session's bearer token, the user must log in again.
    #[error("the session is no longer valid")]
    Unauthorized,

    /// The user submitted a form with invalid values.
    ///
    /// The string explains the problem and is shown to the user.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A call to the Cashlyzer API failed.
    #[error("API request failed: {0}")]
    Api(ApiError),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<ApiError> for Error {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Error::Unauthorized,
            error => Error::Api(error),
        }
    }
}

/// Mark `response` so the auth guard can send the user to log in and back.
///
/// Without an auth guard the response still logs the user out.
fn reject_session(mut response: Response) -> Response {
    response.extensions_mut().insert(SessionRejected);
    response
}

const API_UNAVAILABLE_FIX: &str =
    "The Cashlyzer service could not be reached. Check your connection and try again later.";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            // The log-out route clears the stale cookie before showing the log-in page.
            Error::Unauthorized
            | Error::CookieMissing
            | Error::SessionExpired
            | Error::InvalidSessionCookie(_) => {
                reject_session(Redirect::to(endpoints::LOG_OUT).into_response())
            }
            Error::Api(ApiError::Network(error)) => {
                tracing::error!("Could not reach the API: {error}");
                InternalServerError {
                    description: "Service Unavailable",
                    fix: API_UNAVAILABLE_FIX,
                }
                .into_response()
            }
            Error::Api(error) => {
                tracing::error!("An API request failed: {error}");
                InternalServerError {
                    description: "Could not load your data",
                    fix: error.message_or("Try again later or check the server logs"),
                }
                .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    ///
    /// Session errors become an HTMX redirect to the log-out route instead.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Unauthorized
            | Error::CookieMissing
            | Error::SessionExpired
            | Error::InvalidSessionCookie(_) => {
                return reject_session(
                    (HxRedirect(endpoints::LOG_OUT.to_owned()), StatusCode::OK).into_response(),
                );
            }
            Error::Validation(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Invalid input".to_owned(),
                    details,
                },
            ),
            Error::NotFound | Error::Api(ApiError::NotFound { .. }) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The item could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::Api(ApiError::Network(error)) => {
                tracing::error!("Could not reach the API: {error}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: "Service unavailable".to_owned(),
                        details: API_UNAVAILABLE_FIX.to_owned(),
                    },
                )
            }
            Error::Api(error) => {
                tracing::error!("An API request failed: {error}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: error
                            .message_or("The Cashlyzer service could not complete the request.")
                            .to_owned(),
                    },
                )
            }
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{
        Error,
        api::ApiError,
        auth::SessionRejected,
        endpoints,
        test_utils::{assert_hx_redirect, parse_html_fragment},
    };

    #[test]
    fn unauthorized_api_error_becomes_session_error() {
        assert_eq!(Error::from(ApiError::Unauthorized), Error::Unauthorized);
        assert_eq!(
            Error::from(ApiError::Network("timed out".to_owned())),
            Error::Api(ApiError::Network("timed out".to_owned()))
        );
    }

    #[test]
    fn unauthorized_page_redirects_to_log_out() {
        let response = Error::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::LOG_OUT
        );
    }

    #[test]
    fn unauthorized_alert_uses_hx_redirect() {
        let response = Error::Unauthorized.into_alert_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_hx_redirect(&response, endpoints::LOG_OUT);
        assert!(response.extensions().get::<SessionRejected>().is_some());
    }

    #[tokio::test]
    async fn api_message_is_shown_in_alert() {
        let response = Error::Api(ApiError::Status {
            status: 400,
            message: Some("Amount must be positive".to_owned()),
        })
        .into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(
            text.contains("Amount must be positive"),
            "alert should contain the API message, got {text:?}"
        );
    }

    #[tokio::test]
    async fn validation_error_is_unprocessable() {
        let response = Error::Validation("Amount must be greater than 0".to_owned())
            .into_alert_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Amount must be greater than 0"));
    }
}
