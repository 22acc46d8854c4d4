// src/infra/errors.rs — Error types for pension-chat

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    // Backend errors
    #[error("Backend returned {status} for {method} {path}: {body}")]
    Http {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response from {path}: {message}")]
    UnexpectedResponse { path: String, message: String },

    #[error("Failed to decode JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("'{0}' cannot be used as a request path segment")]
    InvalidPathSegment(String),

    // Client state
    #[error("Backend did not return a usable session id")]
    InvalidSession,

    #[error("No active conversation. Run `pension-chat new` or `pension-chat switch <id>`.")]
    NoActiveConversation,

    #[error("Local state store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Status code of a backend rejection, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
