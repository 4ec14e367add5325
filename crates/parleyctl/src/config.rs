//! Front-end configuration
//!
//! Lives in $XDG_CONFIG_HOME/parley/config.toml unless overridden with
//! --config or $PARLEY_CONFIG. A missing default file means defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parley_shared::Mode;
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = "parley";
const CONFIG_FILE: &str = "config.toml";

/// Environment override for the config path
pub const CONFIG_ENV: &str = "PARLEY_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    pub chat: ChatSettings,
    pub log: LogSettings,
}

/// Conversation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Starting mode
    pub mode: Mode,

    /// Fixed RNG seed for reproducible replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Rule file replacing the built-in tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    /// tracing filter directive, e.g. "warn" or "parley_shared=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ParleyConfig {
    /// Default config location: $PARLEY_CONFIG, then the XDG config dir.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load config. An explicit path must exist; the default path may not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = ParleyConfig::from_toml_str("").unwrap();
        assert_eq!(config, ParleyConfig::default());
        assert_eq!(config.chat.mode, Mode::Normal);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_full_config() {
        let config = ParleyConfig::from_toml_str(
            r#"
[chat]
mode = "faq"
seed = 42
rules_file = "/tmp/rules.toml"

[log]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.chat.mode, Mode::Faq);
        assert_eq!(config.chat.seed, Some(42));
        assert_eq!(config.chat.rules_file, Some(PathBuf::from("/tmp/rules.toml")));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(ParleyConfig::from_toml_str("[chat]\nmode = \"trivia\"").is_err());
    }
}
