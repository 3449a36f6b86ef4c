mod core;
mod create_endpoint;
mod delete_endpoint;
mod incomes_page;
mod query;

pub use core::{Income, get_incomes};
pub use create_endpoint::create_income_endpoint;
pub use delete_endpoint::delete_income_endpoint;
pub use incomes_page::get_incomes_page;
