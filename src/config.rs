use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::TelelogError;
use crate::event::DeployRecord;
use crate::render::{Format, RenderConfig, DEFAULT_OPTIONS};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
}

#[derive(Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Chat that receives the logs; 0 keeps logging local
    #[serde(default)]
    pub log_chat_id: i64,
    /// Overrides the username reported by the Bot API
    #[serde(default)]
    pub bot_username: Option<String>,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("log_chat_id", &self.log_chat_id)
            .field("bot_username", &self.bot_username)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: Format,
    #[serde(default = "default_true")]
    pub include_emojis: bool,
    #[serde(default = "default_true")]
    pub include_date: bool,
    #[serde(default = "default_true")]
    pub include_user: bool,
    #[serde(default = "default_true")]
    pub include_chat: bool,
    #[serde(default = "default_true")]
    pub include_media: bool,
    #[serde(default = "default_true")]
    pub colorize: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_OPTIONS.format,
            include_emojis: DEFAULT_OPTIONS.include_emojis,
            include_date: DEFAULT_OPTIONS.include_date,
            include_user: DEFAULT_OPTIONS.include_user,
            include_chat: DEFAULT_OPTIONS.include_chat,
            include_media: DEFAULT_OPTIONS.include_media,
            colorize: DEFAULT_OPTIONS.colorize,
        }
    }
}

impl LoggingConfig {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            format: self.format,
            include_emojis: self.include_emojis,
            include_date: self.include_date,
            include_user: self.include_user,
            include_chat: self.include_chat,
            include_media: self.include_media,
            colorize: self.colorize,
            ..DEFAULT_OPTIONS
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DeployConfig {
    /// Announce the running version in the log chat at startup
    #[serde(default)]
    pub notify_on_start: bool,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub commit_hash: Option<String>,
    #[serde(default)]
    pub deployer: Option<String>,
    /// Extra `key = value` pairs listed under "Additional info"
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl DeployConfig {
    /// Deploy record for `version`, with the configured fields and extras.
    pub fn record(&self, version: &str) -> DeployRecord {
        let mut record = DeployRecord::new().with("version", version);
        let known = [
            ("environment", &self.environment),
            ("branch", &self.branch),
            ("commit_hash", &self.commit_hash),
            ("deployer", &self.deployer),
        ];
        for (key, value) in known {
            if let Some(value) = value {
                record.insert(key, value.as_str());
            }
        }
        for (key, value) in &self.extra {
            record.insert(key.as_str(), value.as_str());
        }
        record
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;

        if config.telegram.bot_token.trim().is_empty() {
            return Err(
                TelelogError::Config("telegram.bot_token must not be empty".to_string()).into(),
            );
        }

        Ok(config)
    }
}
