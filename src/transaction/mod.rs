mod core;
mod query;
mod transactions_page;

pub use core::{Transaction, TransactionKind, merge_transactions};
pub use transactions_page::get_transactions_page;
