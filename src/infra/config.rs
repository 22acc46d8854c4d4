// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infra::paths;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1/";
pub const DEFAULT_SCHEME_TYPE: &str = "pension";
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your pension advisory assistant. How can I help you plan your retirement today?";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Origin plus API prefix every request path is joined onto.
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Tag sent with every chat message so the backend picks the right scheme.
    pub scheme_type: String,
    /// Synthetic assistant message shown at the top of every history.
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            scheme_type: DEFAULT_SCHEME_TYPE.into(),
            greeting: DEFAULT_GREETING.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the location of the persisted session/conversation ids.
    #[serde(default)]
    pub state_file: Option<String>,
}

impl StorageConfig {
    pub fn state_file_path(&self) -> PathBuf {
        match self.state_file {
            Some(ref p) => PathBuf::from(p),
            None => paths::state_file_path(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PENSION_CHAT_BASE_URL") {
            self.backend.base_url = url;
        }
        if let Ok(scheme) = std::env::var("PENSION_CHAT_SCHEME_TYPE") {
            self.chat.scheme_type = scheme;
        }
        if let Ok(file) = std::env::var("PENSION_CHAT_STATE_FILE") {
            self.storage.state_file = Some(file);
        }
    }
}
