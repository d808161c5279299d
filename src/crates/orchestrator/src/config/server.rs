//! Server configuration for orchestrator-server
//!
//! Layered: built-in defaults, then an optional TOML file, then environment
//! variables. CLI flags are applied on top by the binary.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [gemini]
//! model = "gemini-2.0-flash-exp"
//! api_key_env = "GEMINI_API_KEY"
//!
//! [mcp]
//! command = "node"
//! args = ["mcp-server/index.js"]
//! api_base_url = "http://localhost:8000/api"
//!
//! [workflow]
//! default_max_iterations = 10
//! ```
//!
//! The Gemini API key itself never lives in the file; only the name of the
//! variable holding it does.

use std::path::Path;
use std::time::Duration;

use llm::remote::gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use llm::RemoteLlmConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tooling::config::{get_env_list, get_env_nonempty, get_env_parse};
use tooling::gateway::{McpServerConfig, API_BASE_URL_ENV};
use tooling::ToolingError;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(toml::de::Error),
    #[error("Invalid environment override: {0}")]
    EnvError(#[from] ToolingError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
    /// Filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_filter: "info".to_string(),
        }
    }
}

/// Reasoning model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub temperature: f32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
            max_retries: 2,
            temperature: 0.1,
        }
    }
}

impl GeminiConfig {
    /// Current API key; blank or non-UTF-8 counts as missing.
    pub fn api_key(&self) -> Option<String> {
        match get_env_nonempty(&self.api_key_env) {
            Ok(key) => key,
            Err(e) => {
                warn!(env = %self.api_key_env, error = %e, "ignoring unreadable API key");
                None
            }
        }
    }

    /// Client settings for a session holding `api_key`.
    pub fn client_config(&self, api_key: impl Into<String>) -> RemoteLlmConfig {
        RemoteLlmConfig::new(api_key, self.base_url.clone(), self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_retries(self.max_retries)
    }
}

/// Feedback loop defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Budget used when a start command omits `max_iterations`.
    pub default_max_iterations: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_max_iterations: 10,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ListenConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub mcp: McpServerConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServerConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ServerConfigError::ReadError)?;
        Self::from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ServerConfigError> {
        toml::from_str(content).map_err(ServerConfigError::ParseError)
    }

    /// Defaults or `path`, then environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ServerConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `GEMINI_MODEL`, `GEMINI_BASE_URL`,
    /// `MCP_SERVER_COMMAND`, `MCP_SERVER_ARGS` and `API_BASE_URL`.
    pub fn apply_env(&mut self) -> Result<(), ServerConfigError> {
        if let Some(host) = get_env_nonempty("HOST")? {
            self.server.host = host;
        }
        if let Some(port) = get_env_parse("PORT")? {
            self.server.port = port;
        }
        if let Some(model) = get_env_nonempty("GEMINI_MODEL")? {
            self.gemini.model = model;
        }
        if let Some(url) = get_env_nonempty("GEMINI_BASE_URL")? {
            self.gemini.base_url = url;
        }
        if let Some(command) = get_env_nonempty("MCP_SERVER_COMMAND")? {
            self.mcp.command = command;
        }
        if let Some(args) = get_env_list("MCP_SERVER_ARGS")? {
            self.mcp.args = args;
        }
        if let Some(url) = get_env_nonempty(API_BASE_URL_ENV)? {
            self.mcp.api_base_url = url;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.server.port == 0 {
            return Err(ServerConfigError::InvalidConfig("server.port must be non-zero".into()));
        }
        if self.mcp.command.trim().is_empty() {
            return Err(ServerConfigError::InvalidConfig("mcp.command must not be empty".into()));
        }
        if self.workflow.default_max_iterations == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "workflow.default_max_iterations must be at least 1".into(),
            ));
        }
        if self.gemini.api_key_env.trim().is_empty() {
            return Err(ServerConfigError::InvalidConfig("gemini.api_key_env must not be empty".into()));
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.gemini.model, "gemini-2.0-flash-exp");
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.mcp.command, "node");
        assert_eq!(config.mcp.args, vec!["mcp-server/index.js"]);
        assert_eq!(config.workflow.default_max_iterations, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ServerConfig::from_toml(
            r#"
[server]
port = 9100

[mcp]
command = "python3"
args = ["-m", "store_tools"]
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.mcp.command, "python3");
        assert_eq!(config.mcp.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.gemini.timeout_secs, 60);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = ServerConfig::from_toml("[server\nport = 1").unwrap_err();
        assert!(matches!(err, ServerConfigError::ParseError(_)));
    }

    #[test]
    fn validation() {
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.mcp.command = "  ".into();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.workflow.default_max_iterations = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_max_iterations"));
    }

    #[test]
    fn client_config_carries_timeouts() {
        let gemini = GeminiConfig {
            timeout_secs: 5,
            max_retries: 0,
            ..GeminiConfig::default()
        };
        let client = gemini.client_config("k");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.max_retries, 0);
        assert_eq!(client.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn api_key_reads_the_named_variable() {
        let gemini = GeminiConfig {
            api_key_env: "ORCHESTRATOR_CONFIG_TEST_KEY".into(),
            ..GeminiConfig::default()
        };
        std::env::remove_var("ORCHESTRATOR_CONFIG_TEST_KEY");
        assert_eq!(gemini.api_key(), None);
        std::env::set_var("ORCHESTRATOR_CONFIG_TEST_KEY", "   ");
        assert_eq!(gemini.api_key(), None);
        std::env::set_var("ORCHESTRATOR_CONFIG_TEST_KEY", "secret");
        assert_eq!(gemini.api_key().as_deref(), Some("secret"));
        std::env::remove_var("ORCHESTRATOR_CONFIG_TEST_KEY");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_api_key_counts_as_missing() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let gemini = GeminiConfig {
            api_key_env: "ORCHESTRATOR_CONFIG_TEST_BAD_KEY".into(),
            ..GeminiConfig::default()
        };
        std::env::set_var("ORCHESTRATOR_CONFIG_TEST_BAD_KEY", OsStr::from_bytes(b"key\xff"));
        assert_eq!(gemini.api_key(), None);
        std::env::remove_var("ORCHESTRATOR_CONFIG_TEST_BAD_KEY");
    }

    #[test]
    fn env_overrides() {
        std::env::set_var("PORT", "9200");
        std::env::set_var("MCP_SERVER_ARGS", "dist/server.js --stdio");
        let mut config = ServerConfig::default();
        let outcome = config.apply_env();
        std::env::remove_var("PORT");
        std::env::remove_var("MCP_SERVER_ARGS");

        outcome.unwrap();
        assert_eq!(config.server.port, 9200);
        assert_eq!(config.mcp.args, vec!["dist/server.js", "--stdio"]);
    }
}
