//! Alert system for displaying success and error messages to users.
//!
//! Error alerts are swapped into `#alert-container` by the `hx-target-error`
//! attribute on the form or button that made the request. Success alerts
//! ride along with the main response as an out-of-band swap.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// A message for the user, rendered as a dismissible toast.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success { message: String, details: String },
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with details on how to fix it.
    Error { message: String, details: String },
}

const SUCCESS_STYLE: &str = "flex items-start p-4 mb-4 text-green-800 border border-green-300 \
    rounded-lg bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800";
const ERROR_STYLE: &str = "flex items-start p-4 mb-4 text-red-800 border border-red-300 \
    rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

impl Alert {
    fn parts(&self) -> (&'static str, &str, Option<&str>) {
        match self {
            Alert::Success { message, details } => {
                (SUCCESS_STYLE, message.as_str(), Some(details.as_str()))
            }
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message.as_str(), None),
            Alert::Error { message, details } => {
                (ERROR_STYLE, message.as_str(), Some(details.as_str()))
            }
        }
    }

    /// Render the alert for swapping directly into `#alert-container`.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = self.parts();

        html! {
            div role="alert" class=(style)
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if let Some(details) = details.filter(|details| !details.is_empty()) {
                        p class="mt-1 text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="ms-4 text-lg leading-none"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert as an out-of-band swap into `#alert-container`.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div hx-swap-oob="innerHTML:#alert-container"
            {
                (self.into_html())
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.into_oob_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use scraper::Selector;

    use crate::{alert::Alert, test_utils::parse_html_fragment};

    #[tokio::test]
    async fn success_alert_is_out_of_band() {
        let response = Alert::SuccessSimple {
            message: "Expense deleted".to_owned(),
        }
        .into_response();

        let html = parse_html_fragment(response).await;
        let oob = html
            .select(&Selector::parse("[hx-swap-oob]").unwrap())
            .next()
            .expect("alert should be swapped out of band");
        assert_eq!(
            oob.value().attr("hx-swap-oob"),
            Some("innerHTML:#alert-container")
        );
        let text = oob.text().collect::<String>();
        assert!(text.contains("Expense deleted"));
    }

    #[test]
    fn error_alert_omits_empty_details() {
        let markup = Alert::Error {
            message: "Could not save".to_owned(),
            details: String::new(),
        }
        .into_html()
        .into_string();

        assert!(markup.contains("Could not save"));
        assert_eq!(markup.matches("<p").count(), 1);
    }
}
