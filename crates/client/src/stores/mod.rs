//! Global stores for application state.

pub mod notifications;

pub use notifications::{
    add_notification, get_notifications, remove_notification, NewNotification, Notification,
    NotificationStore, NOTIFICATIONS, NOTIFICATION_TTL_MS,
};
