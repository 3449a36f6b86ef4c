mod budget_page;
mod core;
mod update_endpoint;

pub use budget_page::get_budget_page;
pub use core::{BudgetOverview, get_budget};
pub use update_endpoint::update_budget_endpoint;
