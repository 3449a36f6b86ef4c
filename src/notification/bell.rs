//! The notification bell in the navigation bar.
//!
//! The bell is an HTMX partial that replaces itself every few seconds. The
//! actions in its dropdown replace it with the updated list.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error,
    api::{ApiClient, AuthToken},
    endpoints::{self, format_endpoint},
    notification::core::{Notification, get_notifications, unread_count},
    profile::get_profile,
    timezone::get_local_offset,
};

/// The state needed to render the notification bell.
#[derive(Debug, Clone)]
pub struct NotificationState {
    pub api: ApiClient,
    pub local_timezone: String,
    /// The number of seconds between refreshes.
    pub poll_seconds: u64,
}

impl FromRef<AppState> for NotificationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
            poll_seconds: state.notification_poll_seconds,
        }
    }
}

const BELL_TARGET: &str = "#notification-bell";

const MENU_BUTTON_STYLE: &str = "text-xs font-medium text-blue-600 hover:underline \
    dark:text-blue-400";

fn bell_icon() -> Markup {
    html! {
        svg
            class="w-6 h-6"
            aria-hidden="true"
            xmlns="http://www.w3.org/2000/svg"
            fill="none"
            viewBox="0 0 24 24"
            stroke="currentColor"
            stroke-width="1.5"
        {
            path
                stroke-linecap="round"
                stroke-linejoin="round"
                d="M14.857 17.082a23.848 23.848 0 0 0 5.454-1.31A8.967 8.967 0 0 1 18 9.75V9A6 6 0 0 0 6 9v.75a8.967 8.967 0 0 1-2.312 6.022c1.733.64 3.56 1.085 5.455 1.31m5.714 0a24.255 24.255 0 0 1-5.714 0m5.714 0a3 3 0 1 1-5.714 0"
            {}
        }
    }
}

fn notification_item(notification: &Notification, now: OffsetDateTime, offset: UtcOffset) -> Markup {
    let background = if notification.read {
        ""
    } else {
        "bg-blue-50 dark:bg-gray-700"
    };

    html! {
        li
            class={ "px-4 py-3 border-b border-gray-100 dark:border-gray-700 " (background) }
            data-notification-id=(notification.id)
        {
            div class="flex items-start gap-3"
            {
                span
                    class={ "mt-1.5 h-2 w-2 shrink-0 rounded-full " (notification.severity.marker_style()) }
                {}

                div class="flex-1 min-w-0"
                {
                    p class="text-sm font-semibold text-gray-900 dark:text-white"
                    {
                        (notification.kind.title())
                    }
                    p class="text-sm text-gray-600 dark:text-gray-300" { (notification.message) }
                    p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                    {
                        (notification.relative_time(now, offset))
                    }
                }

                @if !notification.read {
                    button
                        type="button"
                        class=(MENU_BUTTON_STYLE)
                        hx-patch=(format_endpoint(endpoints::NOTIFICATION_READ, &notification.id))
                        hx-target=(BELL_TARGET)
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Mark read"
                    }
                }
            }
        }
    }
}

/// Render the bell with its dropdown.
///
/// `notifications` is `None` when they could not be loaded.
pub fn notification_bell(
    notifications: Option<&[Notification]>,
    now: OffsetDateTime,
    offset: UtcOffset,
    poll_seconds: u64,
) -> Markup {
    let unread = notifications.map_or(0, unread_count);
    // Polling would close the dropdown while the user is reading it.
    let trigger = format!("every {poll_seconds}s [!this.querySelector('details[open]')]");

    html! {
        div
            id="notification-bell"
            class="relative"
            hx-get=(endpoints::NOTIFICATIONS_API)
            hx-trigger=(trigger)
            hx-swap="outerHTML"
        {
            details class="relative"
            {
                summary
                    class="list-none cursor-pointer relative p-2 rounded-full text-gray-600
                    hover:bg-gray-100 dark:text-gray-300 dark:hover:bg-gray-700"
                    aria-label="Notifications"
                {
                    (bell_icon())

                    @if unread > 0 {
                        span
                            id="unread-count"
                            class="absolute -top-0.5 -right-0.5 inline-flex items-center
                            justify-center h-5 min-w-5 px-1 rounded-full bg-red-600
                            text-xs font-bold text-white"
                        {
                            (unread)
                        }
                    }
                }

                div
                    class="absolute right-0 z-50 mt-2 w-80 rounded-lg border border-gray-200
                    bg-white shadow-lg dark:border-gray-700 dark:bg-gray-800"
                {
                    div class="flex items-center justify-between px-4 py-3 border-b
                        border-gray-100 dark:border-gray-700"
                    {
                        h3 class="text-sm font-semibold text-gray-900 dark:text-white"
                        {
                            "Notifications"
                        }

                        div class="flex gap-3"
                        {
                            @if unread > 0 {
                                button
                                    id="mark-all-read"
                                    type="button"
                                    class=(MENU_BUTTON_STYLE)
                                    hx-patch=(endpoints::NOTIFICATIONS_READ_ALL)
                                    hx-target=(BELL_TARGET)
                                    hx-swap="outerHTML"
                                    hx-target-error="#alert-container"
                                {
                                    "Mark all as read"
                                }
                            }

                            @if notifications.is_some_and(|notifications| !notifications.is_empty()) {
                                button
                                    id="clear-notifications"
                                    type="button"
                                    class=(MENU_BUTTON_STYLE)
                                    hx-delete=(endpoints::NOTIFICATIONS_CLEAR)
                                    hx-target=(BELL_TARGET)
                                    hx-swap="outerHTML"
                                    hx-target-error="#alert-container"
                                {
                                    "Clear all"
                                }
                            }
                        }
                    }

                    @match notifications {
                        None => {
                            p class="px-4 py-6 text-sm text-center text-red-600 dark:text-red-400"
                            {
                                "Could not load notifications"
                            }
                        }
                        Some([]) => {
                            p class="px-4 py-6 text-sm text-center text-gray-500 dark:text-gray-400"
                            {
                                "No notifications"
                            }
                        }
                        Some(notifications) => {
                            ul class="max-h-96 overflow-y-auto"
                            {
                                @for notification in notifications {
                                    (notification_item(notification, now, offset))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Load the notifications and render the bell.
///
/// Failing to load the notifications is shown in the dropdown, except when
/// the session is no longer valid.
pub(super) async fn load_bell(state: &NotificationState, token: &AuthToken) -> Result<Markup, Error> {
    let offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let notifications = match get_notifications(&state.api, token).await {
        Ok(notifications) => Some(notifications),
        Err(Error::Unauthorized) => return Err(Error::Unauthorized),
        Err(error) => {
            tracing::error!("Could not load notifications: {error}");
            None
        }
    };

    Ok(notification_bell(
        notifications.as_deref(),
        OffsetDateTime::now_utc(),
        offset,
        state.poll_seconds,
    ))
}

/// A route handler for the notification bell partial.
///
/// Users who turned push notifications off get an empty response, which
/// removes the bell and stops the polling.
pub async fn get_notification_bell(
    State(state): State<NotificationState>,
    Extension(token): Extension<AuthToken>,
) -> Response {
    match get_profile(&state.api, &token).await {
        Ok(profile) if !profile.notification_preferences.push => {
            return Html("").into_response();
        }
        Ok(_) => {}
        Err(Error::Unauthorized) => return Error::Unauthorized.into_alert_response(),
        Err(error) => {
            tracing::warn!("Could not load notification preferences, showing notifications: {error}");
        }
    }

    match load_bell(&state, &token).await {
        Ok(bell) => bell.into_response(),
        Err(error) => error.into_alert_response(),
    }
}
