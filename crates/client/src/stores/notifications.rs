//! Transient UI notifications.
//!
//! Every notification is scheduled for removal a fixed delay after it is
//! added. The removal fires even if the notification was dismissed earlier;
//! removing an absent id does nothing.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use crate::timer::{sleep_ms, Clock, SystemClock};

/// Lifetime of a notification, in milliseconds.
pub const NOTIFICATION_TTL_MS: u32 = 5000;

pub const DEFAULT_KIND: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A notification before it is added; missing fields get defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNotification {
    pub id: Option<String>,
    pub title: String,
    pub kind: Option<String>,
    pub text: Option<String>,
}

impl NewNotification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Ordered notification list with scheduled removals.
#[derive(Debug, Clone)]
pub struct NotificationStore<C: Clock = SystemClock> {
    clock: C,
    items: Vec<Notification>,
    /// (deadline in unix ms, id)
    pending: Vec<(i64, String)>,
}

impl NotificationStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for NotificationStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> NotificationStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            items: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Append a notification and schedule its removal. Returns its id.
    pub fn add(&mut self, notification: NewNotification) -> String {
        let id = notification
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let kind = notification
            .kind
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| DEFAULT_KIND.to_string());

        self.items.push(Notification {
            id: id.clone(),
            title: notification.title,
            kind,
            text: notification.text,
        });

        let deadline = self.clock.now_ms() + i64::from(NOTIFICATION_TTL_MS);
        self.pending.push((deadline, id.clone()));
        id
    }

    /// Remove the notification with this id. Returns whether one was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Notifications in insertion order.
    pub fn list(&self) -> &[Notification] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fire the scheduled removal for `id` now, regardless of its deadline.
    pub fn expire(&mut self, id: &str) -> bool {
        self.pending.retain(|(_, pending)| pending != id);
        self.remove(id)
    }

    /// Fire every scheduled removal whose deadline has passed. Returns how
    /// many notifications were actually removed.
    pub fn expire_due(&mut self) -> usize {
        let now = self.clock.now_ms();
        let mut due = Vec::new();
        self.pending.retain(|(deadline, id)| {
            if *deadline <= now {
                due.push(id.clone());
                false
            } else {
                true
            }
        });

        due.iter().filter(|id| self.remove(id)).count()
    }

    /// Earliest pending removal deadline, in unix ms.
    pub fn next_deadline(&self) -> Option<i64> {
        self.pending.iter().map(|(deadline, _)| *deadline).min()
    }
}

/// Process-wide notification store for the UI.
pub static NOTIFICATIONS: GlobalSignal<NotificationStore> = Signal::global(NotificationStore::new);

/// Add a notification to the global store and schedule its removal.
///
/// Must be called from within the Dioxus runtime.
pub fn add_notification(notification: NewNotification) -> String {
    let id = NOTIFICATIONS.write().add(notification);

    let scheduled = id.clone();
    spawn(async move {
        sleep_ms(NOTIFICATION_TTL_MS).await;
        NOTIFICATIONS.write().expire(&scheduled);
    });

    id
}

pub fn remove_notification(id: &str) {
    NOTIFICATIONS.write().remove(id);
}

/// Snapshot of the global notification list.
pub fn get_notifications() -> Vec<Notification> {
    NOTIFICATIONS.read().list().to_vec()
}
