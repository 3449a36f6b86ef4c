//! Defines the endpoints behind the buttons in the notification bell.
//!
//! Each endpoint responds with the updated bell.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    Error,
    alert::Alert,
    api::AuthToken,
    notification::{
        bell::{NotificationState, load_bell},
        core::{clear_old, mark_all_read, mark_read},
    },
};

/// Render the bell after a successful action, with an optional success alert.
async fn bell_after_action(
    state: &NotificationState,
    token: &AuthToken,
    success: Option<&str>,
) -> Response {
    let bell = match load_bell(state, token).await {
        Ok(bell) => bell,
        Err(error) => return error.into_alert_response(),
    };

    html! {
        (bell)

        @if let Some(message) = success {
            (Alert::SuccessSimple { message: message.to_owned() }.into_oob_html())
        }
    }
    .into_response()
}

fn action_failed(action: &str, error: Error) -> Response {
    tracing::error!("Could not {action}: {error}");
    error.into_alert_response()
}

/// A route handler for marking one notification as read.
pub async fn mark_notification_read_endpoint(
    State(state): State<NotificationState>,
    Extension(token): Extension<AuthToken>,
    Path(notification_id): Path<String>,
) -> Response {
    if let Err(error) = mark_read(&state.api, &token, &notification_id).await {
        return action_failed(&format!("mark notification {notification_id} as read"), error);
    }

    bell_after_action(&state, &token, None).await
}

pub async fn mark_all_notifications_read_endpoint(
    State(state): State<NotificationState>,
    Extension(token): Extension<AuthToken>,
) -> Response {
    if let Err(error) = mark_all_read(&state.api, &token).await {
        return action_failed("mark all notifications as read", error);
    }

    bell_after_action(&state, &token, Some("All notifications marked as read")).await
}

pub async fn clear_notifications_endpoint(
    State(state): State<NotificationState>,
    Extension(token): Extension<AuthToken>,
) -> Response {
    if let Err(error) = clear_old(&state.api, &token).await {
        return action_failed("clear notifications", error);
    }

    bell_after_action(&state, &token, Some("All notifications cleared")).await
}
