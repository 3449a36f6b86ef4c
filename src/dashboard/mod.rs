//! Dashboard module
//!
//! Provides an overview page with this month's figures, trend charts, the
//! top spending categories and the most recent transactions.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
