// src/client/types.rs — Session, conversation and message types

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Timestamps arrive either as RFC 3339 or as naive ISO 8601 (assumed UTC).
/// Anything else is dropped rather than failing the whole record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// A backend-issued session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// The value handed back when session creation fails.
    pub fn degraded() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        !self.session_id.trim().is_empty()
    }
}

/// Conversation identifier. Some backends use integers, others strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationId {
    Number(i64),
    Text(String),
}

impl ConversationId {
    /// Parse a persisted id. Integers come back as `Number`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<i64>() {
            Ok(n) => ConversationId::Number(n),
            Err(_) => ConversationId::Text(raw.to_string()),
        })
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationId::Number(n) => write!(f, "{n}"),
            ConversationId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ConversationId {
    fn from(n: i64) -> Self {
        ConversationId::Number(n)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        ConversationId::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled conversation")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Backend `role` → sender. Only `"assistant"` maps to the assistant.
    pub fn from_role(role: &str) -> Self {
        if role == "assistant" {
            Sender::Assistant
        } else {
            Sender::User
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Sending,
    Pending,
    Finished,
    Failed,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Sending => "Sending...",
            Status::Pending => "Pending",
            Status::Finished => "Delivered",
            Status::Failed => "Failed",
        }
    }
}

/// Structured fields attached to a confirmation request.
///
/// Kept as an open map: the backend may send fields beyond the known ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationData(pub Map<String, Value>);

impl ConfirmationData {
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|m| Self(m.clone()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn age(&self) -> Option<u64> {
        self.0.get("age").and_then(number_like)
    }

    pub fn desired_pension(&self) -> Option<f64> {
        self.0.get("desired_pension").and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn query_type(&self) -> Option<&str> {
        self.0.get("query_type").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

fn number_like(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A chat message as the client keeps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content: String,
    pub sender: Sender,
    pub status: Status,
    #[serde(default)]
    pub requires_confirmation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_data: Option<ConfirmationData>,
}

impl Message {
    pub fn user(content: impl Into<String>, status: Status) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
            status,
            requires_confirmation: false,
            confirmation_data: None,
        }
    }

    /// A finished assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Assistant,
            status: Status::Finished,
            requires_confirmation: false,
            confirmation_data: None,
        }
    }

    pub fn with_confirmation(mut self, data: Option<ConfirmationData>) -> Self {
        self.requires_confirmation = true;
        self.confirmation_data = data;
        self
    }

    pub fn is_assistant(&self) -> bool {
        self.sender == Sender::Assistant
    }
}

// -- Outbound payloads --

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub message: &'a str,
    pub session_id: &'a str,
    pub conversation_id: Option<&'a ConversationId>,
    pub scheme_type: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproveCredentialRequest<'a> {
    pub session_id: &'a str,
    pub conversation_id: &'a ConversationId,
    pub approved: bool,
    pub modified_email: Option<&'a str>,
    pub modified_password: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AbortRequest<'a> {
    pub session_id: &'a str,
    pub conversation_id: &'a ConversationId,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateConversationRequest<'a> {
    pub session_id: &'a str,
}
