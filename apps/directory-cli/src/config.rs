//! Centralized configuration for the directory binary.
//!
//! All environment variables are loaded and validated at startup to fail fast
//! on misconfiguration rather than halfway through a command.

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Storage backend provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    /// In-memory storage (data lost on exit)
    Memory,
    /// SQLite file-based storage
    Sqlite,
}

impl StorageProvider {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// How new restaurant ids are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdStrategy {
    /// Random v4 UUIDs
    Uuid,
    /// Base36 counter seeded past the ids already stored
    Sequential,
}

impl IdStrategy {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uuid" => Some(Self::Uuid),
            "sequential" => Some(Self::Sequential),
            _ => None,
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error for {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage provider (default: sqlite)
    pub storage_provider: StorageProvider,
    /// SQLite database path (default: ./data/directory.db)
    pub db_path: PathBuf,
    /// Log format
    pub log_format: LogFormat,
    /// Id generation strategy (default: uuid)
    pub id_strategy: IdStrategy,
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage_provider = match var("STORAGE_PROVIDER") {
            None => StorageProvider::Sqlite,
            Some(s) => StorageProvider::parse(&s).ok_or_else(|| ConfigError {
                field: "STORAGE_PROVIDER",
                message: format!("expected 'sqlite' or 'memory', got '{}'", s),
            })?,
        };

        let db_path = var("DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/directory.db"));

        let log_format = match var("LOG_FORMAT") {
            None => LogFormat::Pretty,
            Some(s) => LogFormat::parse(&s).ok_or_else(|| ConfigError {
                field: "LOG_FORMAT",
                message: format!("expected 'pretty' or 'json', got '{}'", s),
            })?,
        };

        let id_strategy = match var("ID_STRATEGY") {
            None => IdStrategy::Uuid,
            Some(s) => IdStrategy::parse(&s).ok_or_else(|| ConfigError {
                field: "ID_STRATEGY",
                message: format!("expected 'uuid' or 'sequential', got '{}'", s),
            })?,
        };

        Ok(Self {
            storage_provider,
            db_path,
            log_format,
            id_strategy,
        })
    }

    /// Log a warning when data will not outlive the process.
    pub fn warn_if_ephemeral(&self) {
        if self.storage_provider == StorageProvider::Memory {
            tracing::warn!(
                "STORAGE_PROVIDER=memory: restaurants are kept in memory and lost on exit."
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.storage_provider, StorageProvider::Sqlite);
        assert_eq!(cfg.db_path, PathBuf::from("./data/directory.db"));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.id_strategy, IdStrategy::Uuid);
    }

    #[test]
    fn explicit_values_are_honored() {
        let cfg = load(&[
            ("STORAGE_PROVIDER", "MEMORY"),
            ("DB_PATH", "/tmp/x.db"),
            ("LOG_FORMAT", "json"),
            ("ID_STRATEGY", "sequential"),
        ])
        .unwrap();
        assert_eq!(cfg.storage_provider, StorageProvider::Memory);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.id_strategy, IdStrategy::Sequential);
    }

    #[test]
    fn unknown_provider_fails_fast() {
        let err = load(&[("STORAGE_PROVIDER", "dynamo")]).unwrap_err();
        assert_eq!(err.field, "STORAGE_PROVIDER");
        let err = load(&[("ID_STRATEGY", "random")]).unwrap_err();
        assert_eq!(err.field, "ID_STRATEGY");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = load(&[("STORAGE_PROVIDER", "  "), ("DB_PATH", "")]).unwrap();
        assert_eq!(cfg.storage_provider, StorageProvider::Sqlite);
        assert_eq!(cfg.db_path, PathBuf::from("./data/directory.db"));
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("jsn"), None);
        let err = load(&[("LOG_FORMAT", "jsn")]).unwrap_err();
        assert_eq!(err.field, "LOG_FORMAT");
        assert!(err.to_string().contains("'jsn'"));
    }
}
