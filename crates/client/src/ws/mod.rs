//! WebSocket channel to the call service.
//!
//! - [`connect`] opens one authenticated channel and resolves once it is open.
//! - [`AppSocket`] owns the channel and an [`EventMux`] routing inbound
//!   `[event, payload]` frames to registered handlers.
//!
//! ```rust,ignore
//! let mut socket = connect_from_env().await?;
//! let id = socket.on_typed(events::CALL_MESSAGE, |msg: CallMessagePosted| {
//!     log_info!("{}: {}", msg.message.user_name, msg.message.text);
//! });
//! socket.send(events::CALL_JOIN, &CallRef { id: call_id })?;
//! socket.run().await;
//! ```

mod connection;
mod multiplexer;

use huddle_shared::WsError;

pub use connection::{connect, connect_from_env, AppSocket, ConnectionState, WsHandle};
pub use multiplexer::{EventMux, Handler, SubscriptionId};

/// Anything frames can be written to: the live channel, or a peer connection.
pub trait FrameSink {
    fn send_text(&self, text: String) -> Result<(), WsError>;
}
