use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::RemiError;

/// Top-level Remi configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub remi: RemiConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// General agent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemiConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RemiConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default = "default_provider")]
    pub default: String,
    pub openai: Option<OpenAiConfig>,
}

/// OpenAI-compatible provider config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            model: default_openai_model(),
            base_url: default_openai_base_url(),
        }
    }
}

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub line: Option<LineConfig>,
}

/// LINE Messaging API channel config.
///
/// `channel_secret` is consumed by the external webhook transport for
/// signature verification; the core only needs the access token.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LineConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub channel_access_token: String,
    #[serde(default)]
    pub channel_secret: String,
}

/// Memory config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Reasoning loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Hard cap on think/act/observe cycles per turn.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Deadline for a single model call, in seconds.
    #[serde(default = "default_model_timeout_secs")]
    pub model_timeout_secs: u64,
    /// Persona directive injected into every prompt.
    #[serde(default = "default_tone_of_voice")]
    pub tone_of_voice: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            model_timeout_secs: default_model_timeout_secs(),
            tone_of_voice: default_tone_of_voice(),
        }
    }
}

/// Delivery scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between due-reminder scans.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Channel used for reminder delivery.
    #[serde(default = "default_delivery_channel")]
    pub channel: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: default_poll_interval(),
            channel: default_delivery_channel(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_name() -> String {
    "remi".to_string()
}

fn default_data_dir() -> String {
    "~/.remi".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_db_path() -> String {
    "~/.remi/remi.db".to_string()
}

fn default_max_steps() -> usize {
    15
}

fn default_model_timeout_secs() -> u64 {
    60
}

fn default_tone_of_voice() -> String {
    "friendly and concise".to_string()
}

fn default_poll_interval() -> u64 {
    60
}

fn default_delivery_channel() -> String {
    "line".to_string()
}

/// Expand a leading `~` to the user's home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}{}", home.to_string_lossy(), rest);
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// A missing file is not an error: defaults are used, so `remi ask`
/// works out of the box. Callers that care (the binary does) should
/// check existence themselves and log — this runs before any
/// subscriber is installed, so logging here would be dropped.
pub fn load(path: &str) -> Result<Config, RemiError> {
    let path = Path::new(path);

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| RemiError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| RemiError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_defaults() {
        let agent = AgentConfig::default();
        assert_eq!(agent.max_steps, 15);
        assert_eq!(agent.model_timeout_secs, 60);
        assert!(!agent.tone_of_voice.is_empty());
    }

    #[test]
    fn test_scheduler_defaults() {
        let sched = SchedulerConfig::default();
        assert!(sched.enabled);
        assert_eq!(sched.poll_interval_secs, 60);
        assert_eq!(sched.channel, "line");
    }

    #[test]
    fn test_agent_from_toml() {
        let toml_str = r#"
            max_steps = 8
            model_timeout_secs = 30
        "#;
        let agent: AgentConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(agent.max_steps, 8);
        assert_eq!(agent.model_timeout_secs, 30);
        assert_eq!(agent.tone_of_voice, default_tone_of_voice());
    }

    #[test]
    fn test_full_config_from_toml() {
        let toml_str = r#"
            [remi]
            name = "remi"
            log_level = "debug"

            [provider]
            default = "openai"

            [provider.openai]
            enabled = true
            api_key = "sk-test"
            model = "gpt-4o"

            [channel.line]
            enabled = true
            channel_access_token = "token"
            channel_secret = "secret"

            [scheduler]
            poll_interval_secs = 30
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.remi.log_level, "debug");
        assert_eq!(cfg.provider.openai.as_ref().unwrap().model, "gpt-4o");
        assert!(cfg.channel.line.as_ref().unwrap().enabled);
        assert_eq!(cfg.scheduler.poll_interval_secs, 30);
        // Untouched sections fall back to defaults.
        assert_eq!(cfg.memory.db_path, default_db_path());
        assert_eq!(cfg.agent.max_steps, 15);
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.remi.name, "remi");
        assert!(cfg.provider.openai.is_none());
        assert!(cfg.channel.line.is_none());
        assert!(cfg.scheduler.enabled);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let cfg = load("/definitely/not/a/real/config.toml").unwrap();
        assert_eq!(cfg.remi.name, "remi");
        assert_eq!(cfg.agent.max_steps, 15);
        assert!(cfg.scheduler.enabled);
    }

    #[test]
    fn test_shellexpand() {
        std::env::set_var("HOME", "/home/test");
        assert_eq!(shellexpand("~/.remi"), "/home/test/.remi");
        assert_eq!(shellexpand("/abs/path"), "/abs/path");
    }
}
