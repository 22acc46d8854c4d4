// src/client/chat.rs — Chat client: history, sending, confirmation, abort
//
// History and abort fail soft (greeting-only history, empty abort reply).
// Sending a message or a confirmation propagates errors so the caller can
// mark its optimistic message as failed.

use serde_json::Value;
use std::sync::Arc;

use super::context::ClientContext;
use super::list_payload;
use super::transport::{segment_path, Transport};
use super::types::{
    AbortRequest, ApproveCredentialRequest, ConfirmationData, ConversationId, Message,
    SendMessageRequest, Sender,
};
use crate::infra::config::ChatConfig;
use crate::infra::errors::{ClientError, Result};
use crate::util::preview;

const HISTORY_PATH: &str = "/chat/history";
const MESSAGE_PATH: &str = "/chat/message";
const APPROVE_PATH: &str = "/chat/approve-credential";
const ABORT_PATH: &str = "/chat/abort";

/// Keys the reply text may live under, in priority order.
const CONTENT_KEYS: &[&str] = &["response", "content", "message", "answer"];
const CONFIRM_FLAG_KEYS: &[&str] = &[
    "requires_approval",
    "requires_confirmation",
    "requiresConfirmation",
];
const CONFIRM_DATA_KEYS: &[&str] = &["query_params", "confirmation_data", "confirmationData"];

pub struct ChatClient {
    transport: Arc<dyn Transport>,
    ctx: ClientContext,
    scheme_type: String,
    greeting: String,
}

impl ChatClient {
    pub fn new(transport: Arc<dyn Transport>, ctx: ClientContext, config: &ChatConfig) -> Self {
        Self {
            transport,
            ctx,
            scheme_type: config.scheme_type.clone(),
            greeting: config.greeting.clone(),
        }
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    /// The synthetic assistant message shown above every history.
    pub fn greeting(&self) -> Message {
        Message::assistant(self.greeting.clone())
    }

    /// History of the active conversation, greeting first.
    ///
    /// Without an active conversation no request is made. Any failure
    /// yields the greeting alone.
    pub async fn fetch_history(&self) -> Vec<Message> {
        let mut messages = vec![self.greeting()];

        let Some(conversation_id) = self.ctx.active_conversation_id() else {
            return messages;
        };

        match self.fetch_history_for(&conversation_id).await {
            Ok(history) => messages.extend(history),
            Err(e) => tracing::warn!("Failed to fetch history for {conversation_id}: {e}"),
        }
        messages
    }

    async fn fetch_history_for(&self, conversation_id: &ConversationId) -> Result<Vec<Message>> {
        let path = segment_path(HISTORY_PATH, &conversation_id.to_string())?;
        let resp = self.transport.get(&path).await?;
        let records =
            list_payload(resp, "messages").ok_or_else(|| ClientError::UnexpectedResponse {
                path: path.clone(),
                message: "expected a list of messages".into(),
            })?;

        Ok(records.iter().map(message_from_record).collect())
    }

    /// Send `text` (trimmed) and return the assistant's reply.
    pub async fn send_message(
        &self,
        text: &str,
        session_id: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<Message> {
        let message = text.trim();
        let body = serde_json::to_value(SendMessageRequest {
            message,
            session_id,
            conversation_id,
            scheme_type: &self.scheme_type,
        })?;

        tracing::debug!("Sending message: {}", preview(message, 80));
        let reply = self.transport.post(MESSAGE_PATH, body).await?;
        Ok(message_from_reply(&reply))
    }

    /// Answer a confirmation request, optionally with edited credentials.
    pub async fn send_confirmation(
        &self,
        session_id: &str,
        conversation_id: &ConversationId,
        approved: bool,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Message> {
        let body = serde_json::to_value(ApproveCredentialRequest {
            session_id,
            conversation_id,
            approved,
            modified_email: email,
            modified_password: password,
        })?;

        tracing::debug!("Sending confirmation (approved={approved}) for {conversation_id}");
        let reply = self.transport.post(APPROVE_PATH, body).await?;
        Ok(message_from_reply(&reply))
    }

    /// Ask the backend to stop work on a conversation. Returns the backend's
    /// textual reply, or an empty string on failure.
    pub async fn abort_conversation(
        &self,
        session_id: &str,
        conversation_id: &ConversationId,
    ) -> String {
        let body = match serde_json::to_value(AbortRequest {
            session_id,
            conversation_id,
        }) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("Failed to encode abort request: {e}");
                return String::new();
            }
        };

        match self.transport.post(ABORT_PATH, body).await {
            Ok(reply) => abort_text(reply),
            Err(e) => {
                tracing::warn!("Failed to abort conversation {conversation_id}: {e}");
                String::new()
            }
        }
    }
}

/// Map a send/confirm reply into a finished assistant message.
pub fn message_from_reply(reply: &Value) -> Message {
    let content = match reply {
        Value::String(s) => s.clone(),
        _ => first_str(reply, CONTENT_KEYS).unwrap_or_default(),
    };
    apply_confirmation(Message::assistant(content), reply)
}

/// Map one history record. Every fetched message counts as finished.
pub fn message_from_record(record: &Value) -> Message {
    let sender = Sender::from_role(record.get("role").and_then(Value::as_str).unwrap_or("user"));
    let content = first_str(record, CONTENT_KEYS).unwrap_or_default();

    let mut msg = Message::assistant(content);
    msg.sender = sender;
    apply_confirmation(msg, record)
}

fn apply_confirmation(msg: Message, value: &Value) -> Message {
    let metadata = value.get("metadata");
    let scopes = [metadata, Some(value)];

    let requires = scopes
        .iter()
        .flatten()
        .any(|scope| CONFIRM_FLAG_KEYS.iter().any(|k| is_truthy(scope.get(*k))));

    let data = scopes.iter().flatten().find_map(|scope| {
        CONFIRM_DATA_KEYS
            .iter()
            .find_map(|k| scope.get(*k).and_then(ConfirmationData::from_value))
    });

    if requires {
        msg.with_confirmation(data)
    } else {
        Message {
            confirmation_data: data,
            ..msg
        }
    }
}

fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(Value::as_str))
        .map(String::from)
}

fn is_truthy(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn abort_text(reply: Value) -> String {
    match reply {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => first_str(&other, &["message", "status", "detail"])
            .unwrap_or_else(|| other.to_string()),
    }
}
