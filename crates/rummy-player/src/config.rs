use rummy_bot::search::SearchConfig;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 11100;
const DEFAULT_SEED: u64 = 0x5EED_CAFE;
const NAME_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root player configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerConfig {
    pub player: PlayerSection,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PlayerConfig {
    /// Defaults for everything but the player name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            player: PlayerSection { name: name.into() },
            server: ServerConfig::default(),
            search: SearchSection::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: PlayerConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.player.validate()?;
        self.server.validate()?;
        self.search.validate()?;
        self.logging.normalize();
        Ok(())
    }

    /// Search settings: values from the file win over `RUMMY_MCTS_*` variables,
    /// which win over built-in defaults.
    pub fn search_config(&self) -> SearchConfig {
        self.search
            .overlay(SearchConfig::from_reader(|key| std::env::var(key).ok()))
    }

    pub fn seed(&self) -> u64 {
        self.search.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerSection {
    pub name: String,
}

impl PlayerSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "player.name".to_string(),
                message: "player name must not be empty".to_string(),
            });
        }

        if !self.name.chars().all(|c| NAME_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: "player.name".to_string(),
                message: "player name may only contain alphanumeric characters, '.', '_' or '-'"
                    .to_string(),
            });
        }

        Ok(())
    }
}

/// Where the player listens for the game server.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.host.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "server.host".to_string(),
                message: "host must not be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(ValidationError::InvalidField {
                field: "server.port".to_string(),
                message: "port must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Search block; unset fields fall through to the environment and defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SearchSection {
    #[serde(default)]
    pub iterations: Option<u32>,
    #[serde(default)]
    pub exploration: Option<f64>,
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SearchSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(exploration) = self.exploration {
            if !exploration.is_finite() || exploration < 0.0 {
                return Err(ValidationError::InvalidField {
                    field: "search.exploration".to_string(),
                    message: "exploration must be a non-negative number".to_string(),
                });
            }
        }
        Ok(())
    }

    fn overlay(&self, mut base: SearchConfig) -> SearchConfig {
        if let Some(iterations) = self.iterations {
            base.iterations = iterations;
        }
        if let Some(exploration) = self.exploration {
            base.exploration = exploration;
        }
        if let Some(time_budget_ms) = self.time_budget_ms {
            base.time_budget_ms = time_budget_ms;
        }
        base
    }
}

/// Logging configuration defaults to human-readable stderr output.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            file: default_log_file(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self.file.as_os_str().is_empty() {
            self.file = default_log_file();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("rummy-player.jsonl")
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
