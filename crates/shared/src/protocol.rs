//! Channel framing and event names.
//!
//! Every message on the channel, in both directions, is a JSON array of
//! exactly two elements: `[event_name, payload]`. A missing payload is sent
//! as `null`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{FrameError, WsError};

/// Path of the channel endpoint, relative to the API origin.
pub const CHANNEL_PATH: &str = "/echo";

/// Query parameter carrying the bearer token on the channel URL.
pub const CHANNEL_TOKEN_PARAM: &str = "token";

/// Event names used by the call protocol.
pub mod events {
    pub const CALL_JOIN: &str = "call:join";
    pub const CALL_LEAVE: &str = "call:leave";
    pub const CALL_JOINED: &str = "call:joined";
    pub const CALL_USER_JOINED: &str = "call:user-joined";
    pub const CALL_USER_LEFT: &str = "call:user-left";
    pub const CALL_USER_DISCONNECTED: &str = "call:user-disconnected";
    pub const CALL_PC_OFFER: &str = "call:pc-offer";
    pub const CALL_PC_ANSWER: &str = "call:pc-answer";
    pub const CALL_PC_ICE_CANDIDATE: &str = "call:pc-ice-candidate";
    pub const CALL_MESSAGE: &str = "call:message";
    pub const CALL_MESSAGES: &str = "call:messages";
}

/// One decoded `[event, payload]` message.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub event: String,
    pub payload: Value,
}

impl Frame {
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }

    /// Build a frame from any serializable payload.
    pub fn with_payload<T: Serialize + ?Sized>(event: impl Into<String>, payload: &T) -> Result<Self, WsError> {
        let payload = serde_json::to_value(payload).map_err(|e| WsError::Encode(e.to_string()))?;
        Ok(Self::new(event, payload))
    }

    /// Decode a text message.
    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(text).map_err(|e| FrameError::Json(e.to_string()))?;
        let Value::Array(mut items) = value else {
            return Err(FrameError::NotAPair);
        };
        if items.len() != 2 {
            return Err(FrameError::NotAPair);
        }

        let payload = items.pop().unwrap_or(Value::Null);
        match items.pop() {
            Some(Value::String(event)) => Ok(Self { event, payload }),
            _ => Err(FrameError::EventNotString),
        }
    }

    /// Encode as the `[event, payload]` text form.
    pub fn encode(&self) -> String {
        Value::Array(vec![Value::String(self.event.clone()), self.payload.clone()]).to_string()
    }

    /// Deserialize the payload into a typed value.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}
