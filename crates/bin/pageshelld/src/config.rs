//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `pageshell.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use pageshell_app::services::icon_cache::{DEFAULT_WRITE_DEBOUNCE, IconCacheConfig};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Glyph catalog and icon cache settings.
    pub icons: IconsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Glyph catalog configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IconsConfig {
    /// Base URL of the server hosting `static/mdi/<file>.json` chunks.
    pub upstream_url: String,
    /// Local directory of chunk files to serve under `/static/mdi`.
    pub catalog_dir: Option<PathBuf>,
    /// Catalog metadata (`{ "version", "parts" }`) describing the chunks.
    pub metadata_path: PathBuf,
    /// Delay before fetched chunks are persisted, in milliseconds.
    pub write_debounce_ms: u64,
}

impl Config {
    /// Load configuration from `pageshell.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("pageshell.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PAGESHELL_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PAGESHELL_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("PAGESHELL_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("PAGESHELL_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("PAGESHELL_UPSTREAM_URL") {
            self.icons.upstream_url = val;
        }
        if let Ok(val) = std::env::var("PAGESHELL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.icons.upstream_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "icons.upstream_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Icon cache tuning derived from the `icons` section.
    #[must_use]
    pub fn icon_cache(&self) -> IconCacheConfig {
        IconCacheConfig {
            write_debounce: Duration::from_millis(self.icons.write_debounce_ms),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:pageshell.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "pageshelld=info,pageshell_app=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            upstream_url: "http://127.0.0.1:8123".to_string(),
            catalog_dir: None,
            metadata_path: PathBuf::from("static/mdi/iconMetadata.json"),
            write_debounce_ms: u64::try_from(DEFAULT_WRITE_DEBOUNCE.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
