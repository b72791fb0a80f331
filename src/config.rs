//! Engine configuration loaded from TOML.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_quest_dir() -> PathBuf {
    PathBuf::from("data/quests")
}

fn default_player_placeholder() -> String {
    "%player%".to_string()
}

fn default_indicator_ttl_ms() -> u64 {
    3000
}

fn default_bonus_message() -> String {
    "You completed every quest today!".to_string()
}

fn default_bonus_commands() -> Vec<String> {
    vec!["give %player% diamond_block 64".to_string()]
}

/// Granted once per cycle when a player finishes the whole pool
#[derive(Debug, Clone, Deserialize)]
pub struct BonusConfig {
    #[serde(default = "default_bonus_message")]
    pub message: String,
    #[serde(default = "default_bonus_commands")]
    pub commands: Vec<String>,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            message: default_bonus_message(),
            commands: default_bonus_commands(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Directory scanned recursively for quest TOML files
    #[serde(default = "default_quest_dir")]
    pub quest_dir: PathBuf,
    #[serde(default = "default_player_placeholder")]
    pub player_placeholder: String,
    #[serde(default = "default_indicator_ttl_ms")]
    pub indicator_ttl_ms: u64,
    /// Watch `quest_dir` and reload on change
    #[serde(default)]
    pub hot_reload: bool,
    #[serde(default)]
    pub bonus: BonusConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quest_dir: default_quest_dir(),
            player_placeholder: default_player_placeholder(),
            indicator_ttl_ms: default_indicator_ttl_ms(),
            hot_reload: false,
            bonus: BonusConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn indicator_ttl(&self) -> Duration {
        Duration::from_millis(self.indicator_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config.quest_dir, PathBuf::from("data/quests"));
        assert_eq!(config.player_placeholder, "%player%");
        assert_eq!(config.indicator_ttl(), Duration::from_secs(3));
        assert!(!config.hot_reload);
        assert_eq!(config.bonus.commands, vec!["give %player% diamond_block 64"]);
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
quest_dir = "quests/daily"
indicator_ttl_ms = 1500
hot_reload = true

[bonus]
commands = ["eco give %player% 1000", "broadcast %player% cleared the board"]
"#,
        )
        .unwrap();

        assert_eq!(config.quest_dir, PathBuf::from("quests/daily"));
        assert_eq!(config.indicator_ttl(), Duration::from_millis(1500));
        assert!(config.hot_reload);
        assert_eq!(config.bonus.commands.len(), 2);
        assert_eq!(config.bonus.message, "You completed every quest today!");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = EngineConfig::load(&temp_dir.path().join("quests.toml")).unwrap();
        assert_eq!(config.indicator_ttl_ms, 3000);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            EngineConfig::from_toml_str("indicator_ttl_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
