//! Defines the endpoint for deleting the user's account.

use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    Error,
    api::{ApiClient, AuthToken},
    auth::{SessionUser, invalidate_auth_cookie},
    endpoints,
    profile::core::delete_profile,
};

/// The confirmation typed into the delete account form.
///
/// HTMX sends the parameters of DELETE requests in the query string.
#[derive(Debug, Deserialize)]
pub struct DeleteAccountQuery {
    #[serde(default)]
    pub confirm_email: String,
}

/// A route handler for deleting the account, logs the user out on success.
///
/// The user must confirm by typing the e-mail address of the account.
pub async fn delete_account_endpoint(
    State(api): State<ApiClient>,
    Extension(token): Extension<AuthToken>,
    Extension(user): Extension<SessionUser>,
    jar: PrivateCookieJar,
    Query(query): Query<DeleteAccountQuery>,
) -> Response {
    if !query.confirm_email.trim().eq_ignore_ascii_case(&user.email) {
        return Error::Validation(
            "The e-mail address does not match your account.".to_owned(),
        )
        .into_alert_response();
    }

    if let Err(error) = delete_profile(&api, &token).await {
        tracing::error!("Could not delete account: {error}");
        return error.into_alert_response();
    }

    tracing::info!("Deleted account {}", user.email);

    (
        invalidate_auth_cookie(jar),
        HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
        StatusCode::OK,
    )
        .into_response()
}
