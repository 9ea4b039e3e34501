//! API and channel payload models for the call service.

use chrono::{DateTime, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

/// Request body for `POST /api/users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub name: String,
}

/// Response of `POST /api/users`: the bearer token for the new user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}

/// A call and the ids of the users currently in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Call {
    pub id: Uuid,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "http_or_iso_datetime"
    )]
    pub created_at: Option<NaiveDateTime>,
}

/// REST responses carry timestamps as HTTP dates
/// (`Fri, 05 Jan 2024 09:03:07 GMT`); channel payloads use ISO 8601.
/// Both are read as naive UTC.
fn http_or_iso_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc2822(&text) {
        return Ok(Some(dt.naive_utc()));
    }
    text.parse::<NaiveDateTime>()
        .map(Some)
        .map_err(|e| de::Error::custom(format!("invalid timestamp {text:?}: {e}")))
}

/// A chat message posted inside a call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallMessage {
    pub id: Uuid,
    pub call_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub user_name: String,
    pub text: String,
    pub created_at: NaiveDateTime,
}

// --- Channel payloads ---

/// Payload addressing a call by id (`call:join`, `call:leave`, `call:messages`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRef {
    pub id: Uuid,
}

/// Payload of an outgoing `call:message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendCallMessage {
    pub id: Uuid,
    pub text: String,
}

/// Payload of `call:joined`, sent to the user who joined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallJoined {
    pub id: Uuid,
    pub users: Vec<User>,
}

/// Payload of `call:user-joined`, `call:user-left` and `call:user-disconnected`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallMember {
    pub id: Uuid,
    pub user: User,
}

/// Payload of an incoming `call:message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallMessagePosted {
    pub id: Uuid,
    pub message: CallMessage,
}

/// Payload of `call:messages`: the history of a call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallHistory {
    pub id: Uuid,
    pub messages: Vec<CallMessage>,
}
