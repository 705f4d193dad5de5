//! Configuration loading and constants.
//!
//! Loads the status service configuration from a TOML file and defines the
//! fixed inputs of the deployment validator (required artifacts, required
//! scripts, workflow schema keys). `AppConfig` is the root configuration
//! struct; the validator inputs are deliberately constants and cannot be
//! changed from the config file.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Response Headers
// =============================================================================

/// Status and health responses are always computed fresh
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Status Service Defaults
// =============================================================================

/// Default bind address for the status service
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default port for the status service
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Environment variable that overrides the configured port
pub const PORT_ENV_VAR: &str = "PORT";

/// Message reported by the status endpoint
pub const DEFAULT_SERVICE_MESSAGE: &str = "Manifest Deployment Application";

/// Seconds to wait for in-flight requests on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// Deployment Validator Inputs
// =============================================================================

/// Package manifest declaring the project's scripts
pub const MANIFEST_PATH: &str = "package.json";

/// CI workflow definition that builds and deploys the image
pub const WORKFLOW_PATH: &str = ".github/workflows/deploy-manifest.yml";

/// Files that must exist before the project can be deployed, in report order
pub const REQUIRED_ARTIFACTS: &[&str] = &[
    MANIFEST_PATH,
    "index.js",
    "Dockerfile",
    "k8s-manifest.yaml",
    WORKFLOW_PATH,
];

/// Scripts the manifest must declare under `scripts`
pub const REQUIRED_SCRIPTS: &[&str] = &["start", "build"];

/// Workflow job that builds and pushes the container image
pub const BUILD_JOB: &str = "build-and-push-image";

/// Workflow job that applies the Kubernetes manifest
pub const DEPLOY_JOB: &str = "deploy-manifest";

/// Secret reference the deploy job is expected to use (matched lowercased)
pub const KUBECONFIG_SECRET_MARKER: &str = "secrets.kubeconfig_data";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Tracing target of this crate
const CRATE_TARGET: &str = "manifest_deploy";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info,tower_http=info", CRATE_TARGET);

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Content reported by the status endpoint
    #[serde(default)]
    pub service: ServiceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "ServiceConfig::default_message")]
    pub message: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            message: Self::default_message(),
        }
    }
}

impl ServiceConfig {
    fn default_message() -> String {
        DEFAULT_SERVICE_MESSAGE.to_string()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration, falling back to built-in defaults when the file
    /// is absent. Used for the default config path only; an explicitly
    /// requested file must exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply the `PORT` environment variable over the configured port.
    pub fn apply_port_override(&mut self, value: Option<String>) -> Result<(), ConfigError> {
        if let Some(raw) = value {
            let port = raw.trim().parse::<u16>().map_err(|e| {
                ConfigError::Validation(format!("{} must be a port number, got {:?}: {}", PORT_ENV_VAR, raw, e))
            })?;
            self.http.port = port;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation(
                "http.port must be non-zero".to_string(),
            ));
        }
        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.http.host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
        assert_eq!(config.service.message, DEFAULT_SERVICE_MESSAGE);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::from_toml(
            r#"
[http]
port = 8080

[logging]
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.http.host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http.port, 8080);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let err = AppConfig::from_toml("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = AppConfig::from_toml("[http]\nport = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_port_override() {
        let mut config = AppConfig::default();
        config.apply_port_override(Some("4000".to_string())).unwrap();
        assert_eq!(config.http.port, 4000);

        config.apply_port_override(None).unwrap();
        assert_eq!(config.http.port, 4000);
    }

    #[test]
    fn test_port_override_rejects_garbage() {
        let mut config = AppConfig::default();
        let err = config
            .apply_port_override(Some("not-a-port".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_missing_default_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_required_artifacts_include_manifest_and_workflow() {
        assert_eq!(REQUIRED_ARTIFACTS.first(), Some(&MANIFEST_PATH));
        assert_eq!(REQUIRED_ARTIFACTS.last(), Some(&WORKFLOW_PATH));
    }

    #[test]
    fn test_default_log_filter() {
        assert_eq!(DEFAULT_LOG_FILTER, "manifest_deploy=info,tower_http=info");
    }
}
