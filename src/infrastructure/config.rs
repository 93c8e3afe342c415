//! # Configuration
//!
//! Layered application configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. Serde defaults on every section
//! 2. An optional TOML file (`--config <path>`, else `lookup-race.toml`)
//! 3. Environment variables prefixed `LOOKUP_RACE__`, nested with `__`
//!    (e.g. `LOOKUP_RACE__QUOTE__FETCH_TIMEOUT_MS=500`)
//!
//! `.env` files are loaded into the process environment by the binary
//! before [`AppConfig::load`] runs.
//!
//! # Examples
//!
//! ```ignore
//! use lookup_race::infrastructure::config::AppConfig;
//!
//! let config = AppConfig::load(None)?;
//! assert_eq!(config.cep.timeout_ms, 1000);
//! ```

use crate::domain::entities::DEFAULT_PAIR;
use crate::infrastructure::providers::awesome_api::AWESOME_API_BASE_URL;
use crate::infrastructure::providers::brasil_api::BRASIL_API_BASE_URL;
use crate::infrastructure::providers::via_cep::VIA_CEP_BASE_URL;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "LOOKUP_RACE";

/// Separator between the prefix and nested keys.
pub const ENV_SEPARATOR: &str = "__";

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "lookup-race.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range.
    #[error("invalid configuration: {field}: {message}")]
    Invalid {
        /// The offending key.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CEP lookup race.
    pub cep: CepConfig,
    /// Server-side quote pipeline.
    pub quote: QuoteConfig,
    /// Client-side quote export.
    pub client: ClientConfig,
    /// HTTP server.
    pub server: ServerConfig,
    /// Quote database.
    pub database: DatabaseConfig,
    /// Logging.
    pub log: LogConfig,
}

/// CEP lookup settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CepConfig {
    /// Shared deadline for the whole race.
    pub timeout_ms: u64,
    /// BrasilAPI base URL.
    pub brasil_api_url: String,
    /// ViaCEP base URL.
    pub via_cep_url: String,
}

impl Default for CepConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            brasil_api_url: BRASIL_API_BASE_URL.to_string(),
            via_cep_url: VIA_CEP_BASE_URL.to_string(),
        }
    }
}

impl CepConfig {
    /// Returns the race timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Server-side quote settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Budget for fetching from the upstream provider.
    pub fetch_timeout_ms: u64,
    /// Budget for storing the fetched quote.
    pub persist_timeout_ms: u64,
    /// Currency pair, e.g. `USD-BRL`.
    pub pair: String,
    /// AwesomeAPI base URL.
    pub awesome_api_url: String,
    /// Fail the request when the quote could not be stored.
    pub require_durable: bool,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 200,
            persist_timeout_ms: 10,
            pair: DEFAULT_PAIR.to_string(),
            awesome_api_url: AWESOME_API_BASE_URL.to_string(),
            require_durable: false,
        }
    }
}

/// Client-side export settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the quote server.
    pub server_url: String,
    /// Budget for fetching from the quote server.
    pub timeout_ms: u64,
    /// Budget for writing the output file.
    pub write_timeout_ms: u64,
    /// Output file.
    pub output: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            timeout_ms: 300,
            write_timeout_ms: 100,
            output: PathBuf::from("cotacao.txt"),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServerConfig {
    /// Parses the listen address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `bind` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|e| ConfigError::invalid("server.bind", format!("{}: {}", self.bind, e)))
    }
}

/// Database settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx connection URL.
    pub url: String,
    /// Pool size.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://cotacoes.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the file at `path` (or
    /// [`DEFAULT_CONFIG_FILE`] if present) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit file is missing, a source is
    /// malformed, or a value fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), reading variables from `env` instead of
    /// the process environment when given.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: AppConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for the first out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeouts = [
            ("cep.timeout_ms", self.cep.timeout_ms),
            ("quote.fetch_timeout_ms", self.quote.fetch_timeout_ms),
            ("quote.persist_timeout_ms", self.quote.persist_timeout_ms),
            ("client.timeout_ms", self.client.timeout_ms),
            ("client.write_timeout_ms", self.client.write_timeout_ms),
        ];
        for (field, value) in timeouts {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be greater than zero"));
            }
        }

        if self.quote.pair.trim().is_empty() {
            return Err(ConfigError::invalid("quote.pair", "must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid(
                "database.max_connections",
                "must be greater than zero",
            ));
        }
        self.server.socket_addr()?;

        Ok(())
    }
}
