// src/client/mod.rs — Backend clients for the pension-advisory assistant

pub mod chat;
pub mod context;
pub mod session;
pub mod transcript;
pub mod transport;
pub mod types;

pub use chat::ChatClient;
pub use context::ClientContext;
pub use session::{ActiveSession, SessionClient};
pub use transcript::Transcript;
pub use transport::{segment_path, HttpTransport, Method, Transport};
pub use types::{Conversation, ConversationId, Message, Sender, Session, Status};

use serde_json::Value;

/// Pull a list out of a payload that is either a bare array or an object
/// wrapping the array under `key`.
pub(crate) fn list_payload(value: Value, key: &str) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}
