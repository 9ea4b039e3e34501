//! Huddle Client - client-side utilities for the huddle call app.
//!
//! - [`api_client`]: JSON HTTP wrapper with bearer-token auth
//! - [`ws`]: WebSocket bootstrap and `[event, payload]` multiplexer
//! - [`stores`]: transient UI notifications
//! - [`format`], [`clipboard`]: display helpers
//!
//! Runs in the browser (WASM) and on native targets.

pub mod logging;

pub mod api_client;
pub mod clipboard;
pub mod components;
pub mod config;
pub mod format;
pub mod storage;
pub mod stores;
pub mod timer;
pub mod ws;

pub use api_client::{ApiClient, RequestConfig};
pub use clipboard::{copy_to_clipboard, ClipboardError};
pub use config::ClientConfig;
pub use format::{format_date, string_to_color, DateValue, FormatError};
pub use stores::{NewNotification, Notification, NotificationStore};
pub use ws::{connect, connect_from_env, AppSocket, EventMux, Handler, SubscriptionId};
