//! Centralized configuration for questctl.
//!
//! Loaded from ~/.questctl/config.toml; credentials can be overridden via
//! QUESTCTL_USER_ID / QUESTCTL_API_TOKEN so the file never has to hold
//! secrets on shared machines. The whole struct is passed explicitly into
//! core entry points rather than living in process-wide state.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QuestError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestConfig {
    pub credentials: Credentials,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub party: PartyConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub pending: PendingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub api_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyConfig {
    #[serde(default = "default_group_id")]
    pub group_id: String,
    /// Optional second group the report is mirrored to with --secondary.
    #[serde(default)]
    pub secondary_group_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_header")]
    pub header: String,
    /// Which completed quest to report on; 1 is the most recent.
    #[serde(default = "default_history")]
    pub history: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingConfig {
    #[serde(default = "default_pending_header")]
    pub header: String,
    /// Hours a pending notice may age before the force-start attempt.
    #[serde(default = "default_timer_hours")]
    pub timer_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_queue_file")]
    pub queue_file: PathBuf,
}

fn default_base_url() -> String {
    "https://habitica.com/api/v3".to_string()
}

fn default_group_id() -> String {
    "party".to_string()
}

fn default_report_header() -> String {
    "Quest Report".to_string()
}

fn default_history() -> usize {
    1
}

fn default_pending_header() -> String {
    "Quest Pending".to_string()
}

fn default_timer_hours() -> f64 {
    24.0
}

fn default_queue_file() -> PathBuf {
    config_dir().join("quest-queue.jsonl")
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".questctl")
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            group_id: default_group_id(),
            secondary_group_id: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            header: default_report_header(),
            history: default_history(),
        }
    }
}

impl Default for PendingConfig {
    fn default() -> Self {
        Self {
            header: default_pending_header(),
            timer_hours: default_timer_hours(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            queue_file: default_queue_file(),
        }
    }
}

impl QuestConfig {
    /// Load config from ~/.questctl/config.toml.
    ///
    /// Fails hard with an actionable error if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Err(QuestError::config(format!(
                "config not found at {:?}\n\nRun: questctl config init",
                config_path
            )));
        }

        let content = fs::read_to_string(&config_path)?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| QuestError::config(format!("invalid TOML: {}", e)))?;

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Get config file path: ~/.questctl/config.toml
    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(user_id) = env::var("QUESTCTL_USER_ID") {
            self.credentials.user_id = user_id
                .parse()
                .map_err(|_| QuestError::config("QUESTCTL_USER_ID is not a UUID"))?;
        }
        if let Ok(token) = env::var("QUESTCTL_API_TOKEN") {
            self.credentials.api_token = token;
        }
        Ok(())
    }

    /// Parse a config from TOML text, env overrides included. Used by
    /// tests and by `config show`.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)
            .map_err(|e| QuestError::config(format!("invalid TOML: {}", e)))?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Commented template written by `questctl config init`.
    pub fn template() -> &'static str {
        r#"# questctl configuration

[credentials]
# Your account's API credentials (Settings -> API on the website).
user_id = "00000000-0000-0000-0000-000000000000"
api_token = "replace-me"

[api]
base_url = "https://habitica.com/api/v3"

[party]
group_id = "party"
# secondary_group_id = "some-guild-uuid"

[report]
header = "Quest Report"
history = 1

[pending]
header = "Quest Pending"
timer_hours = 24.0

# [paths]
# queue_file = "/home/you/.questctl/quest-queue.jsonl"
"#
    }

    /// Write the template to the config path, refusing to clobber an
    /// existing file.
    pub fn init() -> Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Err(QuestError::config(format!(
                "config already exists at {:?}",
                path
            )));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, Self::template())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_with_defaults() {
        let config = QuestConfig::from_toml(QuestConfig::template()).unwrap();
        assert_eq!(config.party.group_id, "party");
        assert_eq!(config.report.history, 1);
        assert_eq!(config.pending.timer_hours, 24.0);
        assert!(config.api.base_url.starts_with("https://"));
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config = QuestConfig::from_toml(
            r#"
            [credentials]
            user_id = "9a2f1f7e-3a57-4c2e-8a30-111111111111"
            api_token = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.report.header, "Quest Report");
        assert_eq!(config.pending.header, "Quest Pending");
        assert!(config.paths.queue_file.ends_with("quest-queue.jsonl"));
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = QuestConfig::from_toml("not toml at all [[[").unwrap_err();
        assert!(matches!(err, QuestError::Config { .. }));
    }
}
