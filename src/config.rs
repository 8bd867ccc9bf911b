//! Configuration module for anonboard.

use serde::Deserialize;
use std::path::Path;

use crate::board::BoardName;
use crate::{BoardError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection string for the document store.
    #[serde(default = "default_db_url")]
    pub url: String,
    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_url() -> String {
    "sqlite://data/anonboard.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Delete-password hashing configuration.
///
/// These are the Argon2id cost parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Time cost (iterations).
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
    /// Upper bound for a single hash or verify call, in milliseconds.
    #[serde(default = "default_hash_timeout")]
    pub hash_timeout_ms: u64,
}

fn default_memory_kib() -> u32 {
    19456 // 19 MiB
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

fn default_hash_timeout() -> u64 {
    5000
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
            hash_timeout_ms: default_hash_timeout(),
        }
    }
}

/// Board namespace configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardsConfig {
    /// Allowed board names. Empty means any valid name may be provisioned.
    #[serde(default)]
    pub allowed: Vec<String>,
    /// Maximum number of boards the store will provision (0 = unlimited).
    #[serde(default = "default_max_boards")]
    pub max_boards: u32,
    /// Upper bound for a single store call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

fn default_max_boards() -> u32 {
    1000
}

fn default_store_timeout() -> u64 {
    3000
}

impl Default for BoardsConfig {
    fn default() -> Self {
        Self {
            allowed: vec![],
            max_boards: default_max_boards(),
            store_timeout_ms: default_store_timeout(),
        }
    }
}

/// Web layer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve the board views from `static_path`.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_static_path() -> String {
    "public".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty logs to the console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Password hashing configuration.
    #[serde(default)]
    pub password: PasswordConfig,
    /// Board namespace configuration.
    #[serde(default)]
    pub boards: BoardsConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BoardError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BoardError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `ANONBOARD_DATABASE_URL`: store connection string
    /// - `ANONBOARD_HASH_COST`: Argon2 iteration count
    /// - `ANONBOARD_PORT`: listen port
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("ANONBOARD_DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = url;
        }
        if let Some(cost) = lookup("ANONBOARD_HASH_COST").filter(|v| !v.is_empty()) {
            self.password.iterations = cost.parse().map_err(|_| {
                BoardError::Config(format!("ANONBOARD_HASH_COST is not a number: {cost}"))
            })?;
        }
        if let Some(port) = lookup("ANONBOARD_PORT").filter(|v| !v.is_empty()) {
            self.server.port = port.parse().map_err(|_| {
                BoardError::Config(format!("ANONBOARD_PORT is not a port: {port}"))
            })?;
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            return Err(BoardError::Config("database.url must be set".to_string()));
        }
        if self.password.iterations == 0 || self.password.parallelism == 0 {
            return Err(BoardError::Config(
                "password.iterations and password.parallelism must be positive".to_string(),
            ));
        }
        if self.password.memory_kib < 8 * self.password.parallelism {
            return Err(BoardError::Config(
                "password.memory_kib must be at least 8 * parallelism".to_string(),
            ));
        }
        if self.password.hash_timeout_ms == 0 || self.boards.store_timeout_ms == 0 {
            return Err(BoardError::Config("timeouts must be positive".to_string()));
        }
        for name in &self.boards.allowed {
            BoardName::parse(name)
                .map_err(|_| BoardError::Config(format!("invalid board name in allow-list: {name}")))?;
        }
        Ok(())
    }
}
