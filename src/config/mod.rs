//! Configuration management for mcp-chat
//!
//! Read from `<config dir>/mcp-chat/config.toml` when present; every field
//! falls back to its default. Command-line flags are applied on top in `main`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub connection: ConnectionConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Origin serving the chat endpoint; the socket lives at `/ws` on it
    pub origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Fixed delay before reconnecting after a close
    pub reconnect_delay_ms: u64,
    /// Queue chat input while disconnected and send it on reconnect
    /// (off: input is rejected while disconnected)
    pub queue_while_disconnected: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: 3000,
            queue_while_disconnected: false,
        }
    }
}

impl ConnectionConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Audible cues (terminal bell)
    pub sound: bool,
    /// Send action stays disabled this long after a message goes out
    pub send_cooldown_ms: u64,
    /// How often the header's "last updated" clock refreshes
    pub timestamp_refresh_secs: u64,
    /// Character count above which the counter turns yellow
    pub char_warn_threshold: usize,
    /// Character count above which the counter turns red
    pub char_alert_threshold: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sound: true,
            send_cooldown_ms: 1000,
            timestamp_refresh_secs: 60,
            char_warn_threshold: 1500,
            char_alert_threshold: 1800,
        }
    }
}

impl UiConfig {
    pub fn send_cooldown(&self) -> Duration {
        Duration::from_millis(self.send_cooldown_ms)
    }

    pub fn timestamp_refresh(&self) -> Duration {
        // interval() panics on a zero period
        Duration::from_secs(self.timestamp_refresh_secs.max(1))
    }
}

impl Config {
    /// Load configuration from the default location or fall back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "mcp-chat") {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            Ok(config_dir.join("config.toml"))
        } else {
            Ok(PathBuf::from("config.toml"))
        }
    }

    /// Directory for the log file
    pub fn log_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "mcp-chat")
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.origin, "http://localhost:8000");
        assert_eq!(config.connection.reconnect_delay(), Duration::from_secs(3));
        assert!(!config.connection.queue_while_disconnected);
        assert!(config.ui.sound);
        assert_eq!(config.ui.send_cooldown(), Duration::from_secs(1));
        assert_eq!(config.ui.timestamp_refresh(), Duration::from_secs(60));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_merges_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\norigin = \"https://chat.example.com\"\n\n[ui]\nsound = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.origin, "https://chat.example.com");
        assert!(!config.ui.sound);
        assert_eq!(config.ui.char_alert_threshold, 1800);
        assert_eq!(config.connection.reconnect_delay_ms, 3000);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.connection.queue_while_disconnected = true;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = 5").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_zero_refresh_is_clamped() {
        let ui = UiConfig {
            timestamp_refresh_secs: 0,
            ..UiConfig::default()
        };
        assert_eq!(ui.timestamp_refresh(), Duration::from_secs(1));
    }
}
