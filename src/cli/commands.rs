// src/cli/commands.rs — One-shot subcommands

use super::render::{format_conversation, format_message, print_messages};
use super::Clients;
use crate::client::types::ConversationId;
use crate::infra::errors::ClientError;

pub async fn run_history(clients: &Clients) -> anyhow::Result<()> {
    let history = clients.chat.fetch_history().await;
    print_messages(&history);
    Ok(())
}

pub async fn run_send(clients: &Clients, text: &str) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Nothing to send");
    }
    let active = clients.sessions.bootstrap().await?;
    let reply = clients
        .chat
        .send_message(text, &active.session_id, Some(&active.conversation_id))
        .await?;
    println!("{}", format_message(&reply));
    Ok(())
}

pub async fn run_confirmation(
    clients: &Clients,
    approved: bool,
    email: Option<&str>,
    password: Option<&str>,
) -> anyhow::Result<()> {
    let active = clients.sessions.bootstrap().await?;
    let reply = clients
        .chat
        .send_confirmation(
            &active.session_id,
            &active.conversation_id,
            approved,
            email,
            password,
        )
        .await?;
    println!("{}", format_message(&reply));
    Ok(())
}

pub async fn run_abort(clients: &Clients) -> anyhow::Result<()> {
    let ctx = clients.context();
    let (Some(session_id), Some(conversation_id)) =
        (ctx.session_id(), ctx.active_conversation_id())
    else {
        return Err(ClientError::NoActiveConversation.into());
    };

    let reply = clients
        .chat
        .abort_conversation(&session_id, &conversation_id)
        .await;
    if reply.is_empty() {
        eprintln!("Abort request sent (no confirmation from backend).");
    } else {
        println!("{reply}");
    }
    Ok(())
}

pub async fn run_conversations(clients: &Clients, all: bool) -> anyhow::Result<()> {
    let ctx = clients.context();
    let previous = ctx.active_conversation_id();

    let conversations = if all {
        clients.sessions.list_all_conversations().await
    } else {
        let active = clients.sessions.bootstrap().await?;
        let list = clients
            .sessions
            .fetch_conversations_for_session(&active.session_id)
            .await;
        // Listing makes the first conversation active; keep an explicit choice.
        if let Some(ref id) = previous {
            clients.sessions.switch_conversation(id)?;
        }
        list
    };

    if conversations.is_empty() {
        eprintln!("No conversations.");
        return Ok(());
    }

    let active = ctx.active_conversation_id();
    for c in &conversations {
        println!("{}", format_conversation(c, active.as_ref()));
    }
    Ok(())
}

pub async fn run_new(clients: &Clients) -> anyhow::Result<()> {
    clients.sessions.bootstrap().await?;
    let conversation = clients.sessions.create_conversation().await?;
    eprintln!(
        "Created conversation {} ({})",
        conversation.id,
        conversation.display_title()
    );
    Ok(())
}

pub fn run_switch(clients: &Clients, raw_id: &str) -> anyhow::Result<()> {
    let id = ConversationId::parse(raw_id)
        .ok_or_else(|| anyhow::anyhow!("Invalid conversation id '{raw_id}'"))?;
    clients.sessions.switch_conversation(&id)?;
    eprintln!("Active conversation: {id}");
    Ok(())
}

pub fn run_status(clients: &Clients) -> anyhow::Result<()> {
    let ctx = clients.context();
    println!("Backend:       {}", clients.base_url);
    println!("State file:    {}", clients.state_file.display());
    println!(
        "Session:       {}",
        ctx.session_id().unwrap_or_else(|| "(none)".into())
    );
    println!(
        "Conversation:  {}",
        ctx.active_conversation_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "(none)".into())
    );
    Ok(())
}

pub fn run_reset(clients: &Clients) -> anyhow::Result<()> {
    clients.context().clear()?;
    eprintln!("Forgot stored session and conversation.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientContext, HttpTransport, Transport};
    use crate::infra::config::Config;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn offline_clients(ctx: &ClientContext) -> Clients {
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new("http://127.0.0.1:9/api/v1/").unwrap());
        Clients::with_parts(
            transport,
            ctx.clone(),
            &Config::default(),
            "http://127.0.0.1:9/api/v1/".into(),
            PathBuf::from("state.json"),
        )
    }

    #[tokio::test]
    async fn test_abort_without_conversation() {
        let ctx = ClientContext::in_memory();
        ctx.set_session_id("sid").unwrap();
        let clients = offline_clients(&ctx);

        let err = run_abort(&clients).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::NoActiveConversation)
        ));
    }

    #[test]
    fn test_switch_rejects_blank_id() {
        let ctx = ClientContext::in_memory();
        let clients = offline_clients(&ctx);

        assert!(run_switch(&clients, "   ").is_err());
        run_switch(&clients, "42").unwrap();
        assert_eq!(ctx.active_conversation_id(), Some(ConversationId::Number(42)));
    }
}
