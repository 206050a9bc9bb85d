//! VoteGate configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::logging::LogFormat;
use crate::workflow::WorkflowOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("cannot serialize config: {0}")]
    Serialize(String),
}

/// Where vote records live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    /// Local LMDB environment under `data_dir`.
    Lmdb,
    /// Remote document store at `documents_url`.
    Remote,
}

/// Configuration for the `votegate` driver.
///
/// Can be loaded from a TOML file via [`VoteGateConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteGateConfig {
    /// Data directory for the local ledger.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_ledger_backend")]
    pub ledger_backend: LedgerBackend,

    /// LMDB map size in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    /// Base URL of the identity REST API.
    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    /// Base URL of the document store holding `votes` and `users`.
    #[serde(default)]
    pub documents_url: String,

    /// API key appended to identity requests.
    #[serde(default)]
    pub api_key: String,

    /// Bearer token for document store requests.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Per-call deadline for collaborator calls, in milliseconds. `0` disables it.
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./votegate_data")
}

fn default_ledger_backend() -> LedgerBackend {
    LedgerBackend::Lmdb
}

fn default_lmdb_map_size() -> usize {
    64 * 1024 * 1024
}

fn default_identity_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_call_timeout_ms() -> u64 {
    10_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl VoteGateConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Parsed `log_format`.
    pub fn log_format(&self) -> Result<LogFormat, ConfigError> {
        self.log_format.parse().map_err(ConfigError::Parse)
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_ms > 0).then(|| Duration::from_millis(self.call_timeout_ms))
    }

    pub fn workflow_options(&self) -> WorkflowOptions {
        WorkflowOptions {
            call_timeout: self.call_timeout(),
        }
    }
}

impl Default for VoteGateConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            ledger_backend: default_ledger_backend(),
            lmdb_map_size: default_lmdb_map_size(),
            identity_url: default_identity_url(),
            documents_url: String::new(),
            api_key: String::new(),
            auth_token: None,
            call_timeout_ms: default_call_timeout_ms(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = VoteGateConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = VoteGateConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.lmdb_map_size, config.lmdb_map_size);
        assert_eq!(parsed.ledger_backend, LedgerBackend::Lmdb);
        assert_eq!(parsed.call_timeout_ms, config.call_timeout_ms);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = VoteGateConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.data_dir, PathBuf::from("./votegate_data"));
        assert_eq!(config.log_format, "human");
        assert_eq!(config.call_timeout(), Some(Duration::from_secs(10)));
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            ledger_backend = "remote"
            documents_url = "https://docs.example/v1"
            call_timeout_ms = 0
            log_format = "json"
        "#;
        let config = VoteGateConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.ledger_backend, LedgerBackend::Remote);
        assert_eq!(config.documents_url, "https://docs.example/v1");
        assert_eq!(config.call_timeout(), None);
        assert_eq!(config.workflow_options().call_timeout, None);
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn unknown_backend_is_a_parse_error() {
        let err = VoteGateConfig::from_toml_str(r#"ledger_backend = "postgres""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bad_log_format_rejected() {
        let config = VoteGateConfig {
            log_format: "xml".into(),
            ..VoteGateConfig::default()
        };
        assert!(matches!(config.log_format(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_returns_read_error() {
        let result = VoteGateConfig::from_toml_file("/nonexistent/votegate.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
