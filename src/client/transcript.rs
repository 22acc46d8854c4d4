// src/client/transcript.rs — Optimistic message bookkeeping for a front-end
//
// A sent message is appended as `Sending`, then flipped to `Finished` (with
// the reply appended) or `Failed` once the backend answers. Nothing here
// deduplicates or cancels sends.

use super::types::{Message, Status};
use crate::infra::errors::ClientError;

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop everything and load `history`, e.g. after switching conversation.
    pub fn replace(&mut self, history: Vec<Message>) {
        self.messages = history;
    }

    /// Append a user message in `Sending` status; returns its index.
    pub fn push_pending(&mut self, text: &str) -> usize {
        self.messages.push(Message::user(text.trim(), Status::Sending));
        self.messages.len() - 1
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn mark_pending(&mut self, idx: usize) {
        self.set_status(idx, Status::Pending);
    }

    /// Settle the message at `idx` with the backend outcome. On success the
    /// reply is appended and returned.
    pub fn resolve(
        &mut self,
        idx: usize,
        outcome: Result<Message, ClientError>,
    ) -> Result<&Message, ClientError> {
        match outcome {
            Ok(reply) => {
                self.set_status(idx, Status::Finished);
                self.messages.push(reply);
                Ok(&self.messages[self.messages.len() - 1])
            }
            Err(e) => {
                self.set_status(idx, Status::Failed);
                Err(e)
            }
        }
    }

    /// Latest assistant message still waiting for an approve/reject answer.
    pub fn pending_confirmation(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_assistant())
            .filter(|m| m.requires_confirmation)
    }

    /// Mark the pending confirmation as answered. User messages held as
    /// `Pending` behind it become `Finished`.
    pub fn answer_confirmation(&mut self) {
        for msg in self
            .messages
            .iter_mut()
            .filter(|m| !m.is_assistant() && m.status == Status::Pending)
        {
            msg.status = Status::Finished;
        }

        if let Some(msg) = self
            .messages
            .iter_mut()
            .rev()
            .find(|m| m.is_assistant())
            .filter(|m| m.requires_confirmation)
        {
            msg.requires_confirmation = false;
        }
    }

    fn set_status(&mut self, idx: usize, status: Status) {
        if let Some(msg) = self.messages.get_mut(idx) {
            msg.status = status;
        }
    }
}
