//! Configuration loading and typed config structures for Showcase.
//!
//! The configuration lives in `showcase-config.yaml` next to the binary.
//! Every section and field is optional; anything omitted takes the default
//! listed on its field.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: HttpConfig,

    /// Remote catalog provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Coverage pass limits.
    #[serde(default)]
    pub coverage: CoverageConfig,

    /// Infrastructure connection strings.
    #[serde(default)]
    pub infrastructure: InfrastructureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CatalogConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `DRAGONFLY_URL` overrides `infrastructure.dragonfly_url`
    /// - `TVMAZE_BASE_URL` overrides `provider.base_url`
    /// - `SHOWCASE_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override selected values with environment variables when set.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DRAGONFLY_URL") {
            self.infrastructure.dragonfly_url = Some(val);
        }
        if let Ok(val) = std::env::var("TVMAZE_BASE_URL") {
            self.provider.base_url = val;
        }
        if let Ok(val) = std::env::var("SHOWCASE_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => tracing::warn!(value = val, error = %e, "Ignoring invalid SHOWCASE_PORT"),
            }
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    /// Address to bind (default `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port (default `3000`).
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Remote catalog provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the show API (default `https://api.tvmaze.com`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds (default `10000`).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Limits for a cold-fill coverage pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CoverageConfig {
    /// Shows every observed genre needs before a cold fill stops
    /// (default `10`).
    #[serde(default = "default_min_per_genre")]
    pub min_per_genre: u64,

    /// Most provider pages a cold fill will fetch (default `10`).
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            min_per_genre: default_min_per_genre(),
            max_pages: default_max_pages(),
        }
    }
}

/// Infrastructure connection strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InfrastructureConfig {
    /// Dragonfly (Redis-compatible) URL. When unset the cache is kept in
    /// process memory.
    #[serde(default)]
    pub dragonfly_url: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    String::from("https://api.tvmaze.com")
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

const fn default_min_per_genre() -> u64 {
    10
}

const fn default_max_pages() -> u32 {
    10
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = CatalogConfig::default();
        assert_eq!(config.coverage.min_per_genre, 10);
        assert_eq!(config.coverage.max_pages, 10);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.provider.base_url, "https://api.tvmaze.com");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.infrastructure.dragonfly_url.is_none());
    }

    #[test]
    fn parse_partial_yaml_fills_defaults() {
        let yaml = r"
coverage:
  min_per_genre: 4
logging:
  format: json
";
        let config: CatalogConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.coverage.min_per_genre, 4);
        assert_eq!(config.coverage.max_pages, 10);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.provider.request_timeout_ms, 10_000);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 8088
provider:
  base_url: "http://localhost:9999"
  request_timeout_ms: 2500
coverage:
  min_per_genre: 12
  max_pages: 3
infrastructure:
  dragonfly_url: "redis://localhost:6379"
logging:
  level: debug
  format: pretty
"#;
        let config: CatalogConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.provider.request_timeout_ms, 2500);
        assert_eq!(config.coverage.max_pages, 3);
        assert_eq!(
            config.infrastructure.dragonfly_url.as_deref(),
            Some("redis://localhost:6379")
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn empty_document_is_default() {
        let config: CatalogConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = CatalogConfig::parse("coverage: [unterminated");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }
}
