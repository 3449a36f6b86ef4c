//! Sessions: logging in and out against the API and guarding the pages that need a session.

mod cookie;
mod forgot_password;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod session;
mod sign_up;
mod token;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use forgot_password::{get_forgot_password_page, post_forgot_password};
pub use log_in::{LoginState, get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{SessionRejected, auth_guard, auth_guard_hx};
pub use sign_up::{get_sign_up_page, post_sign_up};
pub use token::SessionUser;

#[cfg(test)]
pub use cookie::COOKIE_TOKEN;

#[cfg(test)]
pub use middleware::AuthState;
