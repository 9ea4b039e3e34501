//! Error types shared by the HTTP and WebSocket layers.

use thiserror::Error;

/// API error type for client-side use
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, connection refused, ...).
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx response. Only the status text is kept.
    #[error("{status_text}")]
    Http { status_text: String },
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    /// The request could not be built (unencodable body, token that is not a
    /// valid header value). Nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// A text message that is not a valid `[event, payload]` frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    Json(String),
    #[error("frame must be a two-element array")]
    NotAPair,
    #[error("frame event name must be a string")]
    EventNotString,
}

/// Failure to establish a channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// The platform has no WebSocket capability.
    #[error("WebSocket is not supported on this platform")]
    Unsupported,
    #[error("invalid origin: {0}")]
    InvalidOrigin(String),
    /// The channel errored or closed before it opened.
    #[error("connection closed before it was established")]
    Closed,
}

/// Failure to write to an established channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WsError {
    #[error("channel is closed")]
    Closed,
    #[error("failed to encode frame: {0}")]
    Encode(String),
}
