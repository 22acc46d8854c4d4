// src/cli/render.rs — Plain-text rendering of messages and conversations

use crate::client::types::{ConfirmationData, Conversation, ConversationId, Message, Sender, Status};

pub fn format_message(msg: &Message) -> String {
    let who = match msg.sender {
        Sender::Assistant => "Assistant",
        Sender::User => "You",
    };
    let mut out = format!("{who}: {}", msg.content);
    if msg.sender == Sender::User && msg.status != Status::Finished {
        out.push_str(&format!("  [{}]", msg.status.label()));
    }
    if msg.requires_confirmation {
        out.push_str("\n  (confirmation required: /approve or /reject)");
    }
    if let Some(ref data) = msg.confirmation_data {
        out.push_str(&format_confirmation(data));
    }
    out
}

/// Known fields first, in a fixed order, then whatever else the backend sent.
pub fn format_confirmation(data: &ConfirmationData) -> String {
    let mut out = String::new();
    if let Some(age) = data.age() {
        out.push_str(&format!("\n  Age: {age}"));
    }
    if let Some(p) = data.desired_pension() {
        out.push_str(&format!("\n  Desired pension: {p}"));
    }
    if let Some(q) = data.query_type() {
        out.push_str(&format!("\n  Query type: {q}"));
    }
    if let Some(d) = data.description() {
        out.push_str(&format!("\n  Description: {d}"));
    }
    for (key, value) in data.iter() {
        if matches!(
            key.as_str(),
            "age" | "desired_pension" | "query_type" | "description"
        ) {
            continue;
        }
        let shown = value
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| value.to_string());
        out.push_str(&format!("\n  {key}: {shown}"));
    }
    out
}

pub fn format_conversation(c: &Conversation, active: Option<&ConversationId>) -> String {
    let marker = if active == Some(&c.id) { "*" } else { " " };
    let updated = c
        .updated_at
        .or(c.created_at)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!("{marker} {:<10} {:<40} {updated}", c.id.to_string(), c.display_title())
}

pub fn print_messages(messages: &[Message]) {
    for msg in messages {
        println!("{}\n", format_message(msg));
    }
}
