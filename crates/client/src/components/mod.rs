//! Reusable UI components.

pub mod avatar;
pub mod notifications;

pub use avatar::Avatar;
pub use notifications::{NotificationCenter, NotificationToast};
