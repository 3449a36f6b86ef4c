//! Budget and savings alerts shown in the notification bell.

mod actions_endpoint;
mod bell;
mod core;

pub use actions_endpoint::{
    clear_notifications_endpoint, mark_all_notifications_read_endpoint,
    mark_notification_read_endpoint,
};
pub use bell::{NotificationState, get_notification_bell};
