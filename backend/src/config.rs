//! Server configuration.
//!
//! Settings come either from environment variables ([`ServerConfig::from_env`])
//! or from the `[server]` and `[logging]` sections of a TOML file
//! ([`ServerConfig::from_file`]). The same file may also carry the
//! `[repository]` and `[postgres]` sections read by
//! [`crate::db::RepositoryConfig`].
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log filter (default: info)
//! - `LOG_FORMAT`: `json` or `pretty` (default: json)
//! - `ERROR_STATUS_POLICY`: `mapped` or `uniform` (default: mapped)

use std::env;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_APP_NAME: &str = "Commenting Service";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to install logger: {0}")]
    Logging(String),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable lines.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// How handler errors map to HTTP status codes.
///
/// The response body is `{"Message", "Error"}` under both policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStatusPolicy {
    /// Bad input is 400, a missing comment is 404, anything else is 500.
    #[default]
    Mapped,
    /// Every error is 500.
    Uniform,
}

impl FromStr for ErrorStatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mapped" => Ok(Self::Mapped),
            "uniform" | "legacy" => Ok(Self::Uniform),
            _ => Err(format!("Unknown error status policy: {}", s)),
        }
    }
}

impl fmt::Display for ErrorStatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapped => write!(f, "mapped"),
            Self::Uniform => write!(f, "uniform"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `comments_service=debug,tower_http=info`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Listener and HTTP behavior settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub app_name: String,
    pub app_version: String,
    pub host: String,
    pub port: u16,
    pub error_status_policy: ErrorStatusPolicy,
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            error_status_policy: ErrorStatusPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    error_status_policy: Option<ErrorStatusPolicy>,
}

impl ServerConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for unset ones. Set-but-invalid values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|e| ConfigError::invalid("PORT", &port, e))?;
        }
        if let Ok(level) = env::var("RUST_LOG") {
            config.logging.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            config.logging.format = format
                .parse()
                .map_err(|e: String| ConfigError::invalid("LOG_FORMAT", &format, e))?;
        }
        if let Ok(policy) = env::var("ERROR_STATUS_POLICY") {
            config.error_status_policy = policy
                .parse()
                .map_err(|e: String| ConfigError::invalid("ERROR_STATUS_POLICY", &policy, e))?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(host) = file.server.host {
            config.host = host;
        }
        if let Some(port) = file.server.port {
            config.port = port;
        }
        if let Some(policy) = file.server.error_status_policy {
            config.error_status_policy = policy;
        }
        config.logging = file.logging;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve the socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|e| ConfigError::invalid("HOST", &self.host, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listener() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.app_name, "Commenting Service");
        assert_eq!(config.error_status_policy, ErrorStatusPolicy::Mapped);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_from_toml_overrides() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9090
error_status_policy = "uniform"

[logging]
level = "debug"
format = "pretty"

[repository]
type = "local"
"#;
        let config = ServerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.error_status_policy, ErrorStatusPolicy::Uniform);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_from_toml_partial_keeps_defaults() {
        let config = ServerConfig::from_toml_str("[server]\nport = 3000\n").unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_from_toml_rejects_unknown_policy() {
        let result = ServerConfig::from_toml_str("[server]\nerror_status_policy = \"loud\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let result = ServerConfig::from_file("/nonexistent/comments.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_bind_addr_rejects_bad_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(
            "uniform".parse::<ErrorStatusPolicy>().unwrap(),
            ErrorStatusPolicy::Uniform
        );
        assert!("sometimes".parse::<ErrorStatusPolicy>().is_err());
    }
}
