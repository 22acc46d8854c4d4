// src/client/session.rs — Session and conversation management
//
// Reads (session creation, conversation listing) fail soft: they log and
// return an empty value so the caller can keep going. Creating a
// conversation is a write and propagates errors.

use serde_json::{json, Value};
use std::sync::Arc;

use super::context::ClientContext;
use super::list_payload;
use super::transport::{segment_path, Transport};
use super::types::{Conversation, ConversationId, CreateConversationRequest, Session};
use crate::infra::errors::{ClientError, Result};

const SESSION_CREATE_PATH: &str = "/session/create";
const CONVERSATIONS_PATH: &str = "/chat/conversations";

/// Session id plus the conversation every subsequent call will target.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub session_id: String,
    pub conversation_id: ConversationId,
}

pub struct SessionClient {
    transport: Arc<dyn Transport>,
    ctx: ClientContext,
}

impl SessionClient {
    pub fn new(transport: Arc<dyn Transport>, ctx: ClientContext) -> Self {
        Self { transport, ctx }
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    /// Ask the backend for a new session. Returns [`Session::degraded`] on
    /// any failure; check [`Session::is_valid`].
    pub async fn create_session(&self) -> Session {
        let result = self
            .transport
            .post(SESSION_CREATE_PATH, json!({}))
            .await
            .and_then(|v| serde_json::from_value::<Session>(v).map_err(ClientError::from));

        match result {
            Ok(session) => {
                tracing::debug!("Created session {}", session.session_id);
                session
            }
            Err(e) => {
                tracing::warn!("Failed to create session: {e}");
                Session::degraded()
            }
        }
    }

    /// Conversations owned by `session_id`. Empty on error. When the list is
    /// non-empty the first conversation becomes the active one.
    pub async fn fetch_conversations_for_session(&self, session_id: &str) -> Vec<Conversation> {
        let conversations = match self.fetch_conversations_at(session_id).await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Failed to fetch conversations for session {session_id}: {e}");
                return Vec::new();
            }
        };

        if let Some(first) = conversations.first() {
            if let Err(e) = self.ctx.set_active_conversation_id(&first.id) {
                tracing::warn!("Could not persist active conversation {}: {e}", first.id);
            }
        }

        conversations
    }

    /// Create a conversation for the stored session and make it active.
    /// The caller should reload history afterwards.
    pub async fn create_conversation(&self) -> Result<Conversation> {
        let session_id = self.ctx.session_id().ok_or(ClientError::InvalidSession)?;
        let body = serde_json::to_value(CreateConversationRequest {
            session_id: &session_id,
        })?;

        let resp = self.transport.post(CONVERSATIONS_PATH, body).await?;
        let conversation = conversation_from_reply(resp).ok_or_else(|| {
            ClientError::UnexpectedResponse {
                path: CONVERSATIONS_PATH.into(),
                message: "no conversation id in reply".into(),
            }
        })?;

        self.ctx.set_active_conversation_id(&conversation.id)?;
        tracing::info!("Created conversation {}", conversation.id);
        Ok(conversation)
    }

    /// Every conversation the backend knows about, for a selector. Does not
    /// touch the active conversation.
    pub async fn list_all_conversations(&self) -> Vec<Conversation> {
        self.fetch_conversation_list(CONVERSATIONS_PATH)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to list conversations: {e}");
                Vec::new()
            })
    }

    /// Make `id` the active conversation.
    pub fn switch_conversation(&self, id: &ConversationId) -> Result<()> {
        self.ctx.set_active_conversation_id(id)
    }

    /// Start-up flow: reuse or create the session, then make sure some
    /// conversation is active, creating one if the session has none.
    pub async fn bootstrap(&self) -> Result<ActiveSession> {
        let session_id = match self.ctx.session_id() {
            Some(id) => id,
            None => {
                let session = self.create_session().await;
                if !session.is_valid() {
                    return Err(ClientError::InvalidSession);
                }
                self.ctx.set_session_id(&session.session_id)?;
                session.session_id
            }
        };

        if let Some(conversation_id) = self.ctx.active_conversation_id() {
            return Ok(ActiveSession {
                session_id,
                conversation_id,
            });
        }

        let conversation_id = match self
            .fetch_conversations_for_session(&session_id)
            .await
            .into_iter()
            .next()
        {
            Some(first) => first.id,
            None => self.create_conversation().await?.id,
        };

        Ok(ActiveSession {
            session_id,
            conversation_id,
        })
    }

    async fn fetch_conversations_at(&self, session_id: &str) -> Result<Vec<Conversation>> {
        let path = segment_path(CONVERSATIONS_PATH, session_id)?;
        self.fetch_conversation_list(&path).await
    }

    /// Records that do not decode are logged and skipped so one bad entry
    /// does not hide the rest of the listing.
    async fn fetch_conversation_list(&self, path: &str) -> Result<Vec<Conversation>> {
        let resp = self.transport.get(path).await?;
        let items = list_payload(resp, "conversations").ok_or_else(|| {
            ClientError::UnexpectedResponse {
                path: path.to_string(),
                message: "expected a list of conversations".into(),
            }
        })?;

        Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(idx, item)| match serde_json::from_value::<Conversation>(item) {
                Ok(conversation) => Some(conversation),
                Err(e) => {
                    tracing::warn!("Skipping malformed conversation #{idx} from {path}: {e}");
                    None
                }
            })
            .collect())
    }
}

/// Accepts a conversation object, `{conversation: {...}}`, or
/// `{conversation_id: ...}`.
fn conversation_from_reply(value: Value) -> Option<Conversation> {
    if value.get("id").is_some() {
        return serde_json::from_value(value).ok();
    }
    if let Some(inner) = value.get("conversation").filter(|c| c.is_object()) {
        return serde_json::from_value(inner.clone()).ok();
    }
    let id: ConversationId = serde_json::from_value(value.get("conversation_id")?.clone()).ok()?;
    Some(Conversation {
        id,
        title: value
            .get("title")
            .and_then(Value::as_str)
            .map(String::from),
        created_at: None,
        updated_at: None,
    })
}
