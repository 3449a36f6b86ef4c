//! Access to the Cashlyzer REST API.
//!
//! All user data lives behind the API. This module holds the HTTP client,
//! the error type for failed calls and serde helpers for the API's date and
//! number formats. The domain modules build their requests on top of
//! [ApiClient].

mod client;
mod date;
mod error;
mod list;

pub use client::{ApiClient, AuthToken};
pub use date::{DATE_FORMAT, FirestoreTimestamp, calendar_date, lenient_amount, parse_calendar_date};
pub use error::ApiError;
pub use list::decode_list;
