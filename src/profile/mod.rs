//! The user's profile, preferences and account.

mod core;
mod delete_endpoint;
mod settings_page;
mod summary_endpoint;
mod update_endpoint;

pub use core::{UserProfile, get_currency_or_default, get_profile};
pub use delete_endpoint::delete_account_endpoint;
pub use settings_page::get_settings_page;
pub use summary_endpoint::send_monthly_summary_endpoint;
pub use update_endpoint::update_profile_endpoint;
