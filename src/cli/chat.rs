// src/cli/chat.rs — Interactive REPL

use super::render::{format_confirmation, format_conversation, format_message, print_messages};
use super::Clients;
use crate::client::session::ActiveSession;
use crate::client::types::ConversationId;
use crate::client::Transcript;

/// Mutable session state that slash commands can modify.
struct ChatState {
    active: ActiveSession,
    transcript: Transcript,
}

/// Run the interactive chat REPL.
pub async fn run_chat(clients: &Clients) -> anyhow::Result<()> {
    let active = clients.sessions.bootstrap().await?;

    eprintln!(
        "pension-chat v{} | {} | conversation {}\n",
        env!("CARGO_PKG_VERSION"),
        clients.base_url,
        active.conversation_id,
    );

    let mut state = ChatState {
        active,
        transcript: Transcript::new(),
    };
    reload(clients, &mut state).await;
    print_messages(state.transcript.messages());

    while let Some(input) = read_input() {
        let trimmed = input.trim();

        if trimmed == "quit" || trimmed == "exit" || trimmed == "/quit" {
            break;
        }

        if trimmed.starts_with('/') {
            handle_slash_command(trimmed, clients, &mut state).await;
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        let idx = state.transcript.push_pending(trimmed);
        let outcome = clients
            .chat
            .send_message(
                trimmed,
                &state.active.session_id,
                Some(&state.active.conversation_id),
            )
            .await;

        let settled = state.transcript.resolve(idx, outcome).map(|reply| {
            println!("{}\n", format_message(reply));
            reply.requires_confirmation
        });

        match settled {
            Ok(true) => state.transcript.mark_pending(idx),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Send failed: {e}");
                eprintln!("  [Failed] {e}. Your message was not delivered; send it again to retry.");
            }
        }
    }

    Ok(())
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}

async fn reload(clients: &Clients, state: &mut ChatState) {
    let history = clients.chat.fetch_history().await;
    state.transcript.replace(history);
}

async fn handle_slash_command(input: &str, clients: &Clients, state: &mut ChatState) {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" => {
            eprintln!("  /new              Start a new conversation");
            eprintln!("  /list [all]       List conversations");
            eprintln!("  /switch <id>      Switch to another conversation");
            eprintln!("  /history          Reload and print this conversation");
            eprintln!("  /approve          Approve the pending confirmation");
            eprintln!("  /reject           Reject the pending confirmation");
            eprintln!("  /abort            Stop the assistant's current work");
            eprintln!("  /quit             Leave");
        }

        "/new" => match clients.sessions.create_conversation().await {
            Ok(conversation) => {
                state.active.conversation_id = conversation.id.clone();
                reload(clients, state).await;
                eprintln!("  Started conversation {}", conversation.id);
                print_messages(state.transcript.messages());
            }
            Err(e) => eprintln!("  Could not create conversation: {e}"),
        },

        "/list" => {
            let conversations = if arg == "all" {
                clients.sessions.list_all_conversations().await
            } else {
                let list = clients
                    .sessions
                    .fetch_conversations_for_session(&state.active.session_id)
                    .await;
                // Keep the conversation we are in.
                if let Err(e) = clients
                    .sessions
                    .switch_conversation(&state.active.conversation_id)
                {
                    tracing::warn!("Could not restore active conversation: {e}");
                }
                list
            };
            if conversations.is_empty() {
                eprintln!("  No conversations.");
            }
            for c in &conversations {
                eprintln!(
                    "  {}",
                    format_conversation(c, Some(&state.active.conversation_id))
                );
            }
        }

        "/switch" => {
            let Some(id) = ConversationId::parse(arg) else {
                eprintln!("  Usage: /switch <conversation id>");
                return;
            };
            if let Err(e) = clients.sessions.switch_conversation(&id) {
                eprintln!("  Could not switch: {e}");
                return;
            }
            state.active.conversation_id = id;
            reload(clients, state).await;
            print_messages(state.transcript.messages());
        }

        "/history" => {
            reload(clients, state).await;
            print_messages(state.transcript.messages());
        }

        "/approve" | "/reject" => {
            let approved = cmd == "/approve";
            if let Some(pending) = state.transcript.pending_confirmation() {
                if let Some(ref data) = pending.confirmation_data {
                    eprintln!("  Confirming:{}", format_confirmation(data));
                }
            } else {
                eprintln!("  No confirmation is pending; sending anyway.");
            }

            let (email, password) = if approved {
                prompt_credentials()
            } else {
                (None, None)
            };

            let outcome = clients
                .chat
                .send_confirmation(
                    &state.active.session_id,
                    &state.active.conversation_id,
                    approved,
                    email.as_deref(),
                    password.as_deref(),
                )
                .await;

            match outcome {
                Ok(reply) => {
                    state.transcript.answer_confirmation();
                    println!("{}\n", format_message(&reply));
                    state.transcript.push(reply);
                }
                Err(e) => eprintln!("  Confirmation failed: {e}"),
            }
        }

        "/abort" => {
            let reply = clients
                .chat
                .abort_conversation(&state.active.session_id, &state.active.conversation_id)
                .await;
            if reply.is_empty() {
                eprintln!("  Abort sent.");
            } else {
                eprintln!("  {reply}");
            }
        }

        _ => {
            eprintln!("  Unknown command: {cmd}. Type /help for commands.");
        }
    }
}

/// Optional credential sub-form. Blank answers leave the backend's values
/// unchanged.
fn prompt_credentials() -> (Option<String>, Option<String>) {
    let change = inquire::Confirm::new("Change the email or password before approving?")
        .with_default(false)
        .prompt()
        .unwrap_or(false);
    if !change {
        return (None, None);
    }

    let email = inquire::Text::new("Email (blank to keep):")
        .prompt()
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let password = inquire::Password::new("Password (blank to keep):")
        .without_confirmation()
        .prompt()
        .ok()
        .filter(|s| !s.is_empty());

    (email, password)
}
