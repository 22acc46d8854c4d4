// src/cli/mod.rs — CLI definition (clap derive) and client wiring

pub mod chat;
pub mod commands;
pub mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::client::{ChatClient, ClientContext, HttpTransport, SessionClient, Transport};
use crate::infra::config::Config;
use crate::infra::store::FileStore;

#[derive(Parser)]
#[command(
    name = "pension-chat",
    about = "Chat with the pension-advisory assistant",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    /// Backend base URL (overrides config and PENSION_CHAT_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Interactive chat session (default)
    Chat,
    /// Print the active conversation's history
    History,
    /// Send one message and print the reply
    Send {
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },
    /// Approve the pending confirmation, optionally changing credentials
    Approve {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Reject the pending confirmation
    Reject,
    /// Ask the backend to stop work on the active conversation
    Abort,
    /// List conversations for the current session
    Conversations {
        /// List every conversation the backend knows about
        #[arg(long)]
        all: bool,
    },
    /// Start a new conversation and make it active
    New,
    /// Make another conversation active
    Switch { id: String },
    /// Show backend, state file and stored identifiers
    Status,
    /// Forget the stored session and conversation ids
    Reset,
}

/// Everything a command needs to talk to the backend.
pub struct Clients {
    pub sessions: SessionClient,
    pub chat: ChatClient,
    pub base_url: String,
    pub state_file: PathBuf,
}

impl Clients {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let state_file = config.storage.state_file_path();
        let store = Arc::new(FileStore::open(&state_file)?);
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::from_config(&config.backend)?);
        Ok(Self::with_parts(
            transport,
            ClientContext::new(store),
            config,
            config.backend.base_url.clone(),
            state_file,
        ))
    }

    pub fn with_parts(
        transport: Arc<dyn Transport>,
        ctx: ClientContext,
        config: &Config,
        base_url: String,
        state_file: PathBuf,
    ) -> Self {
        Self {
            sessions: SessionClient::new(transport.clone(), ctx.clone()),
            chat: ChatClient::new(transport, ctx, &config.chat),
            base_url,
            state_file,
        }
    }

    pub fn context(&self) -> &ClientContext {
        self.chat.context()
    }
}
