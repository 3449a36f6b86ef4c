//! The AI insights panel.

mod core;
mod panel;

pub use panel::{InsightsState, get_insights_panel, insights_placeholder};
