//! Errors that occur at the boundary with the Cashlyzer REST API.

use reqwest::StatusCode;
use serde::Deserialize;

/// The errors that may occur when calling the Cashlyzer REST API.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ApiError {
    /// The API rejected the bearer token, e.g. because it has expired.
    ///
    /// The user has to log in again.
    #[error("the API rejected the session token")]
    Unauthorized,

    /// The API could not find the requested resource.
    ///
    /// Some resources (budget, savings plan) answer with 404 until they have
    /// been created, so callers may treat this as "nothing yet".
    #[error("the requested resource could not be found: {}", message.as_deref().unwrap_or("no details"))]
    NotFound {
        /// The message in the error body, if any.
        message: Option<String>,
    },

    /// The API responded with a non-success status code.
    #[error("the API responded with status {status}: {}", message.as_deref().unwrap_or("no details"))]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The message in the error body, if any.
        message: Option<String>,
    },

    /// The request could not be sent or the response could not be read.
    #[error("could not reach the API: {0}")]
    Network(String),

    /// The response body was not in the expected format.
    #[error("could not decode the API response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The message the API gave for the error, if it gave one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { message } | ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The API's message, or `fallback` if the API did not give one.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message().unwrap_or(fallback)
    }

    pub(super) fn from_status(status: StatusCode, body: &str) -> Self {
        let message = parse_error_message(body);

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound { message },
            status => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Network(error.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Extract the `message` (or `error`) field from an error response body.
fn parse_error_message(body: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(body).ok()?;

    body.message
        .or(body.error)
        .map(|message| message.trim().to_owned())
        .filter(|message| !message.is_empty())
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::ApiError;

    #[test]
    fn unauthorized_ignores_body() {
        let error = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"message":"expired"}"#);

        assert_eq!(error, ApiError::Unauthorized);
    }

    #[test]
    fn not_found_keeps_message() {
        let error = ApiError::from_status(
            StatusCode::NOT_FOUND,
            r#"{"message":"No budget set for this month"}"#,
        );

        assert_eq!(
            error,
            ApiError::NotFound {
                message: Some("No budget set for this month".to_owned())
            }
        );
    }

    #[test]
    fn status_falls_back_to_error_field() {
        let error = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error":"Invalid amount"}"#);

        assert_eq!(error.message(), Some("Invalid amount"));
        assert!(matches!(error, ApiError::Status { status: 400, .. }));
    }

    #[test]
    fn non_json_body_has_no_message() {
        let error = ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");

        assert_eq!(
            error,
            ApiError::Status {
                status: 502,
                message: None
            }
        );
        assert_eq!(error.message_or("Something went wrong"), "Something went wrong");
    }
}
