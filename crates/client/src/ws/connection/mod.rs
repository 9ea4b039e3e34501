//! Channel bootstrap and the socket handle.
//!
//! This module provides the shared types and conditionally includes
//! the platform-specific implementation.

use std::ops::Deref;

use futures_channel::mpsc::UnboundedReceiver;
use futures_util::StreamExt;
use huddle_shared::{ConnectError, FrameError};
use url::Url;

use super::multiplexer::EventMux;
use crate::config::ClientConfig;
use crate::storage;

/// Connection state of a channel. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}

/// An open channel with its event multiplexer.
///
/// Derefs to [`EventMux`], so `socket.on(..)`, `socket.send(..)` and friends
/// are available directly.
#[derive(Debug)]
pub struct AppSocket {
    url: Url,
    mux: EventMux<WsHandle>,
    incoming: UnboundedReceiver<String>,
    state: ConnectionState,
}

impl AppSocket {
    fn new(url: Url, handle: WsHandle, incoming: UnboundedReceiver<String>) -> Self {
        Self {
            url,
            mux: EventMux::new(handle),
            incoming,
            state: ConnectionState::Open,
        }
    }

    pub fn mux(&self) -> &EventMux<WsHandle> {
        &self.mux
    }

    /// Current channel state.
    ///
    /// Reports `Closed` as soon as the underlying socket stops accepting
    /// writes, even while already-received messages are still queued for
    /// [`recv`](Self::recv).
    pub fn state(&self) -> ConnectionState {
        match self.state {
            ConnectionState::Open if !self.mux.sink().is_open() => ConnectionState::Closed,
            state => state,
        }
    }

    /// Channel URL without its query string.
    pub fn endpoint(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.to_string()
    }

    /// Wait for the next inbound message and dispatch it.
    ///
    /// Returns the number of handlers invoked, a decode error for a malformed
    /// message, or `None` once the channel has closed.
    pub async fn recv(&mut self) -> Option<Result<usize, FrameError>> {
        if self.state == ConnectionState::Closed {
            return None;
        }
        match self.incoming.next().await {
            Some(text) => Some(self.mux.dispatch(&text)),
            None => {
                crate::log_info!("channel {} closed", self.endpoint());
                self.state = ConnectionState::Closed;
                None
            }
        }
    }

    /// Dispatch inbound messages until the channel closes. Malformed
    /// messages are logged and skipped.
    pub async fn run(&mut self) {
        while let Some(result) = self.recv().await {
            if let Err(e) = result {
                crate::log_warn!("dropping malformed frame: {}", e);
            }
        }
    }

    /// Close the channel. Later sends fail with `WsError::Closed`.
    pub fn close(&mut self) {
        self.mux.sink().close();
        self.state = ConnectionState::Closed;
    }
}

impl Deref for AppSocket {
    type Target = EventMux<WsHandle>;

    fn deref(&self) -> &Self::Target {
        &self.mux
    }
}

/// Open a channel to `<origin>/echo`, authenticated with `token`.
///
/// Resolves once the channel is open. Fails once, with
/// [`ConnectError::Closed`], if it errors or closes first. There is no retry.
pub async fn connect(config: &ClientConfig, token: Option<&str>) -> Result<AppSocket, ConnectError> {
    let url = config.channel_url(token)?;
    let endpoint = format!("{}{}", url.origin().ascii_serialization(), url.path());

    crate::log_debug!("channel {}: {:?}", endpoint, ConnectionState::Connecting);
    let (handle, incoming) = open(&url).await.inspect_err(|e| {
        crate::log_error!("channel {} failed: {}", endpoint, e);
    })?;
    crate::log_info!("channel {}: {:?}", endpoint, ConnectionState::Open);

    Ok(AppSocket::new(url, handle, incoming))
}

/// [`connect`] using the environment configuration and the stored token.
pub async fn connect_from_env() -> Result<AppSocket, ConnectError> {
    let token = storage::token();
    connect(&ClientConfig::from_env(), token.as_deref()).await
}

// Include platform-specific implementation
#[cfg(target_arch = "wasm32")]
mod connection_wasm;
#[cfg(target_arch = "wasm32")]
use connection_wasm::open;
#[cfg(target_arch = "wasm32")]
pub use connection_wasm::WsHandle;

#[cfg(not(target_arch = "wasm32"))]
mod connection_native;
#[cfg(not(target_arch = "wasm32"))]
use connection_native::open;
#[cfg(not(target_arch = "wasm32"))]
pub use connection_native::WsHandle;
