mod core;
mod create_endpoint;
mod delete_endpoint;
mod expenses_page;
mod query;
mod subcategories_endpoint;

pub use core::{CategoryRef, Expense, get_expenses};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use expenses_page::get_expenses_page;
pub use subcategories_endpoint::get_subcategory_select;
