use serde::{Deserialize, Serialize};

use crate::agent::{ANALYST_INSTRUCTIONS, DEFAULT_AGENT_NAME, DEFAULT_MODEL};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "sheet_analyst_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub organization: Option<String>,

    /// Per-request timeout; polling has its own deadline.
    #[serde(default = "default_request_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    120_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            organization: None,
            timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_instructions")]
    pub instructions: String,
}

fn default_agent_name() -> String {
    DEFAULT_AGENT_NAME.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_instructions() -> String {
    ANALYST_INSTRUCTIONS.to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            model: default_model(),
            instructions: default_instructions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_interval_ms() -> u64 {
    1_000
}

fn default_timeout_secs() -> u64 {
    30 * 60
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination for downloaded artifacts. Current directory when unset.
    #[serde(default)]
    pub directory: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.service.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.agent.name, "Spreadsheet Analyst");
        assert_eq!(cfg.agent.model, "gpt-4.1");
        assert_eq!(cfg.agent.instructions, ANALYST_INSTRUCTIONS);
        assert_eq!(cfg.polling.interval_ms, 1_000);
        assert!(cfg.output.directory.is_none());
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
[agent]
model = "gpt-4o"

[polling]
timeout_secs = 60
"#,
        )
        .unwrap();
        assert_eq!(cfg.agent.model, "gpt-4o");
        assert_eq!(cfg.agent.name, "Spreadsheet Analyst");
        assert_eq!(cfg.polling.timeout_secs, 60);
        assert_eq!(cfg.polling.interval_ms, 1_000);
    }
}
