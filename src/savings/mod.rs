mod contribute_endpoint;
mod core;
mod delete_endpoint;
mod save_endpoint;
mod savings_page;

pub use contribute_endpoint::contribute_endpoint;
pub use delete_endpoint::delete_savings_plan_endpoint;
pub use save_endpoint::save_savings_plan_endpoint;
pub use savings_page::get_savings_page;
