//! Shared types for the huddle client: wire frames, event names, API models
//! and error types.

pub mod error;
pub mod models;
pub mod protocol;

pub use error::*;
pub use models::*;
pub use protocol::*;
