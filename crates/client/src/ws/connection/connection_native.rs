//! Native/Desktop WebSocket implementation using tokio-tungstenite.
//!
//! The socket is split into a reader and a writer task. Both only move text
//! between the socket and unbounded queues; dispatch happens on the task
//! that owns the `AppSocket`.

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_channel::oneshot;
use futures_util::{SinkExt, StreamExt};
use huddle_shared::{ConnectError, WsError};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::ws::FrameSink;

/// Write side of a native channel.
#[derive(Debug, Clone)]
pub struct WsHandle {
    sender: UnboundedSender<String>,
}

impl WsHandle {
    pub(crate) fn new(sender: UnboundedSender<String>) -> Self {
        Self { sender }
    }

    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Stop writing and send a close frame.
    pub fn close(&self) {
        self.sender.close_channel();
    }
}

impl FrameSink for WsHandle {
    fn send_text(&self, text: String) -> Result<(), WsError> {
        self.sender.unbounded_send(text).map_err(|_| WsError::Closed)
    }
}

pub(super) async fn open(url: &Url) -> Result<(WsHandle, UnboundedReceiver<String>), ConnectError> {
    let (ws_stream, _response) = connect_async(url.as_str()).await.map_err(|e| {
        crate::log_debug!("WebSocket handshake failed: {}", e);
        ConnectError::Closed
    })?;

    let (mut write, mut read) = ws_stream.split();
    let (out_tx, mut out_rx) = unbounded::<String>();
    let (in_tx, in_rx) = unbounded::<String>();
    let (closed_tx, mut closed_rx) = oneshot::channel::<()>();

    // Read task
    tokio::spawn(async move {
        while let Some(msg_result) = read.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    if in_tx.unbounded_send(text.as_str().to_owned()).is_err() {
                        // AppSocket dropped
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    crate::log_debug!("WebSocket received close frame");
                    break;
                }
                Ok(_) => {
                    // Ignore binary, ping, pong
                }
                Err(e) => {
                    crate::log_error!("WebSocket read error: {}", e);
                    break;
                }
            }
        }
        let _ = closed_tx.send(());
    });

    // Write task
    tokio::spawn(async move {
        loop {
            tokio::select! {
                msg = out_rx.next() => match msg {
                    Some(text) => {
                        if let Err(e) = write.send(Message::text(text)).await {
                            crate::log_error!("Send failed: {}", e);
                            break;
                        }
                    }
                    None => {
                        let _ = write.send(Message::Close(None)).await;
                        break;
                    }
                },
                _ = &mut closed_rx => break,
            }
        }
        out_rx.close();
    });

    Ok((WsHandle::new(out_tx), in_rx))
}
