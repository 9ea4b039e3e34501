//! Toast list for the global notification store.

use dioxus::prelude::*;

use crate::stores::{remove_notification, Notification, NOTIFICATIONS};

fn kind_class(kind: &str) -> &'static str {
    match kind {
        "success" => "border-green-500",
        "warning" => "border-yellow-500",
        "error" => "border-red-500",
        _ => "border-indigo-500",
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct NotificationToastProps {
    pub notification: Notification,
}

#[component]
pub fn NotificationToast(props: NotificationToastProps) -> Element {
    let notification = props.notification;
    let border = kind_class(&notification.kind);

    rsx! {
        div {
            class: "pointer-events-auto w-80 rounded-lg border-l-4 {border} bg-[#2b2d31] px-4 py-3 shadow-lg",
            div { class: "flex items-start justify-between gap-3",
                div { class: "min-w-0",
                    p { class: "text-sm font-semibold text-white", "{notification.title}" }
                    if let Some(text) = notification.text.as_ref() {
                        p { class: "mt-1 text-sm text-gray-400", "{text}" }
                    }
                }
                button {
                    class: "text-gray-400 hover:text-white",
                    r#type: "button",
                    onclick: {
                        let id = notification.id.clone();
                        move |_| remove_notification(&id)
                    },
                    "×"
                }
            }
        }
    }
}

/// Renders every notification in the global store, oldest first.
#[component]
pub fn NotificationCenter() -> Element {
    let notifications = NOTIFICATIONS.read().list().to_vec();

    rsx! {
        div { class: "pointer-events-none fixed right-4 top-4 z-50 flex flex-col gap-2",
            for notification in notifications {
                NotificationToast { key: "{notification.id}", notification }
            }
        }
    }
}
