// src/infra/paths.rs — XDG-compliant path management
//
// All paths respect the PENSION_CHAT_HOME environment variable for isolation.
// When PENSION_CHAT_HOME is set, config and state live under that directory.
// When unset, config uses ~/.pension-chat/ and state uses XDG_DATA_HOME/pension-chat.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const APP_NAME: &str = "pension-chat";

/// Returns the PENSION_CHAT_HOME override, if set.
fn app_home() -> Option<PathBuf> {
    std::env::var_os("PENSION_CHAT_HOME").map(PathBuf::from)
}

/// Home directory, falling back to the working directory on systems
/// without one (containers, CI).
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $PENSION_CHAT_HOME/ or ~/.pension-chat/
pub fn config_dir() -> PathBuf {
    if let Some(home) = app_home() {
        return home;
    }
    dirs_home().join(format!(".{APP_NAME}"))
}

/// Data directory: $PENSION_CHAT_HOME/data/ or ~/.local/share/pension-chat/
pub fn data_dir() -> PathBuf {
    if let Some(home) = app_home() {
        return home.join("data");
    }
    match ProjectDirs::from("", "", APP_NAME) {
        Some(dirs) => dirs.data_local_dir().to_path_buf(),
        None => config_dir().join("data"),
    }
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Persisted session/conversation identifiers.
pub fn state_file_path() -> PathBuf {
    data_dir().join("state.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert!(config_file_path().ends_with("config.toml"));
        assert!(state_file_path().ends_with("state.json"));
    }
}
