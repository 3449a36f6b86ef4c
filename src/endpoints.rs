//! The endpoint URIs served by this app.
//!
//! For endpoints that take a parameter, e.g., '/api/expenses/{expense_id}', use [format_endpoint].

use reqwest::Url;

use crate::Error;

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying expenses and incomes in one list.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for listing and adding expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for listing and adding incomes.
pub const INCOMES_VIEW: &str = "/incomes";
/// The page for the monthly budget.
pub const BUDGET_VIEW: &str = "/budget";
/// The page for the savings plan.
pub const SAVINGS_VIEW: &str = "/savings";
/// The page for the user's profile and preferences.
pub const SETTINGS_VIEW: &str = "/settings";
/// The route for getting the sign up page.
pub const SIGN_UP_VIEW: &str = "/sign_up";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for creating a new account.
pub const SIGN_UP_API: &str = "/api/sign_up";
/// The route for requesting a password reset e-mail.
pub const FORGOT_PASSWORD_API: &str = "/api/forgot_password";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create expenses.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to delete a single expense.
pub const DELETE_EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route for the subcategory picker of the add expense form.
pub const EXPENSE_SUBCATEGORIES: &str = "/api/subcategories";
/// The route to create incomes.
pub const INCOMES_API: &str = "/api/incomes";
/// The route to delete a single income.
pub const DELETE_INCOME: &str = "/api/incomes/{income_id}";
/// The route to set the monthly budget.
pub const BUDGET_API: &str = "/api/budget";
/// The route to create or update the savings plan.
pub const SAVINGS_API: &str = "/api/savings";
/// The route to delete the savings plan.
pub const SAVINGS_PLAN: &str = "/api/savings/{savings_id}";
/// The route to add this month's contribution to the savings plan.
pub const SAVINGS_CONTRIBUTE: &str = "/api/savings/{savings_id}/contribute";
/// The route for the notification bell partial.
pub const NOTIFICATIONS_API: &str = "/api/notifications";
/// The route to mark a single notification as read.
pub const NOTIFICATION_READ: &str = "/api/notifications/{notification_id}/read";
/// The route to mark every notification as read.
pub const NOTIFICATIONS_READ_ALL: &str = "/api/notifications/read_all";
/// The route to clear old notifications.
pub const NOTIFICATIONS_CLEAR: &str = "/api/notifications/clear";
/// The route for the AI insights partial.
pub const INSIGHTS_API: &str = "/api/insights";
/// The route to update or delete the user's profile.
pub const PROFILE_API: &str = "/api/profile";
/// The route to e-mail the monthly summary.
pub const MONTHLY_SUMMARY_API: &str = "/api/summary";

/// Replace the parameter in `endpoint_path` with `id`, percent-encoded as one path segment.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`. An `id` that cannot be a single path segment
/// is left out, see [format_resource_path] for the checked version.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    replace_parameter(endpoint_path, &encode_path_segment(id).unwrap_or_default())
}

/// Like [format_endpoint], for paths on the Cashlyzer API.
///
/// # Errors
/// Returns [Error::Validation] if `id` is empty, `.`, `..` or contains a slash.
pub fn format_resource_path(endpoint_path: &str, id: &str) -> Result<String, Error> {
    encode_path_segment(id)
        .map(|segment| replace_parameter(endpoint_path, &segment))
        .ok_or_else(|| Error::Validation(format!("\"{id}\" is not a valid ID")))
}

/// Percent-encode `id` so that it is exactly one path segment.
fn encode_path_segment(id: &str) -> Option<String> {
    if id.is_empty() || id == "." || id == ".." || id.contains('/') {
        return None;
    }

    let mut url = Url::parse("http://localhost/").ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push(id);

    url.path().strip_prefix('/').map(str::to_owned)
}

fn replace_parameter(endpoint_path: &str, value: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}
