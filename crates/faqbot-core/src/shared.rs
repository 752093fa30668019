//! Configuration shared by every front door.

use crate::error::ChatbotError;
use crate::matcher::DEFAULT_CUTOFF;
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_CONFIG_PATH: &str = "FAQBOT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/faqbot.toml";

/// Application configuration. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Display name (greeting, status endpoint, logs).
    pub app_name: String,
    /// Interface the HTTP gateway binds to.
    pub host: String,
    pub port: u16,
    /// JSON knowledge file; created on the first learned answer.
    pub knowledge_path: String,
    /// Banned words, one per line. Unset means nothing is banned.
    #[serde(default)]
    pub banned_words_path: Option<String>,
    /// Technical keywords, one per line, reported as turn topics.
    #[serde(default)]
    pub keywords_path: Option<String>,
    /// Minimum similarity for a fuzzy match, in (0, 1].
    #[serde(default = "default_cutoff")]
    pub match_cutoff: f64,
}

fn default_cutoff() -> f64 {
    DEFAULT_CUTOFF
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            app_name: "FAQ Bot".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            knowledge_path: "knowledge_base.json".to_string(),
            banned_words_path: None,
            keywords_path: None,
            match_cutoff: DEFAULT_CUTOFF,
        }
    }
}

impl BotConfig {
    /// Load config from file and environment.
    /// Precedence: env `FAQBOT__*` > file at `FAQBOT_CONFIG` (default `config/faqbot.toml`) > defaults.
    pub fn load() -> Result<Self, ChatbotError> {
        let config_path = std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&config_path))
    }

    /// Same as [`BotConfig::load`] with an explicit file path. A missing file is skipped.
    pub fn load_from(path: &Path) -> Result<Self, ChatbotError> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("app_name", defaults.app_name)?
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("knowledge_path", defaults.knowledge_path)?
            .set_default("match_cutoff", defaults.match_cutoff)?;

        let builder = if path.exists() {
            tracing::debug!(target: "faqbot::config", path = %path.display(), "Reading config file");
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("FAQBOT").separator("__"))
            .build()?;

        let config: Self = built.try_deserialize()?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ChatbotError> {
        if !(self.match_cutoff > 0.0 && self.match_cutoff <= 1.0) {
            return Err(config::ConfigError::Message(format!(
                "match_cutoff must be in (0, 1], got {}",
                self.match_cutoff
            ))
            .into());
        }
        if self.knowledge_path.trim().is_empty() {
            return Err(config::ConfigError::Message("knowledge_path must not be empty".to_string()).into());
        }
        Ok(self)
    }
}
