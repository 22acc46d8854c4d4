// src/client/context.rs — Persisted client identifiers
//
// The session id and the active conversation id live in a key-value store
// shared by the session and chat clients. The store is injected here rather
// than reached for globally, so tests can hand in a `MemoryStore`.

use std::sync::Arc;

use super::types::ConversationId;
use crate::infra::errors::Result;
use crate::infra::store::{KeyValueStore, MemoryStore};

pub const SESSION_ID_KEY: &str = "sessionId";
pub const CONVERSATION_ID_KEY: &str = "ConversationId";

#[derive(Clone)]
pub struct ClientContext {
    store: Arc<dyn KeyValueStore>,
}

impl ClientContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Context over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn session_id(&self) -> Option<String> {
        self.store
            .get(SESSION_ID_KEY)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn set_session_id(&self, session_id: &str) -> Result<()> {
        self.store.set(SESSION_ID_KEY, session_id)
    }

    /// The conversation every send/fetch targets. Not checked against the
    /// current session.
    pub fn active_conversation_id(&self) -> Option<ConversationId> {
        self.store
            .get(CONVERSATION_ID_KEY)
            .and_then(|raw| ConversationId::parse(&raw))
    }

    pub fn set_active_conversation_id(&self, id: &ConversationId) -> Result<()> {
        self.store.set(CONVERSATION_ID_KEY, &id.to_string())
    }

    /// Forget both identifiers.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(CONVERSATION_ID_KEY)?;
        self.store.remove(SESSION_ID_KEY)
    }
}
