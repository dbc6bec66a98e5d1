//! # Configuration
//!
//! Layered runtime configuration for the Skillboard binary.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. TOML file (`--config <file>`, or `./skillboard.toml` when present)
//! 3. `SKILLBOARD_*` environment variables
//! 4. Command-line flags (applied by the CLI)
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! cors_origins = ["http://localhost:5173"]
//! rate_limit = 100
//!
//! [storage]
//! backend = "redb"
//! database = "skillboard.redb"
//! seed_demo = true
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use skillboard_core::SkillboardError;
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "skillboard.toml";

/// Which store backs the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Disk-backed redb database.
    #[default]
    Redb,
    /// Volatile in-memory store.
    Memory,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Redb => f.write_str("redb"),
            Backend::Memory => f.write_str("memory"),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. `None` allows localhost only; `["*"]` allows all.
    pub cors_origins: Option<Vec<String>>,
    /// Requests per second across all clients. 0 disables the limiter.
    pub rate_limit: u32,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: None,
            rate_limit: 100,
            body_limit: 2 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: Backend,
    /// redb database file (ignored by the memory backend).
    pub database: PathBuf,
    /// Load the demo team on server start when the store is empty.
    pub seed_demo: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Redb,
            database: PathBuf::from("skillboard.redb"),
            seed_demo: false,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, SkillboardError> {
        toml::from_str(text)
            .map_err(|e| SkillboardError::SerializationError(format!("Invalid configuration: {}", e)))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SkillboardError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SkillboardError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Defaults merged with the explicit file, or `./skillboard.toml` if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SkillboardError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// `load` followed by the process environment.
    pub fn from_environment(explicit: Option<&Path>) -> Result<Self, SkillboardError> {
        let mut config = Self::load(explicit)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay `SKILLBOARD_*` variables obtained through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SkillboardError> {
        if let Some(host) = lookup("SKILLBOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SKILLBOARD_PORT") {
            self.server.port = parse_env("SKILLBOARD_PORT", &port)?;
        }
        if let Some(origins) = lookup("SKILLBOARD_CORS_ORIGINS") {
            self.server.cors_origins = Some(
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }
        if let Some(limit) = lookup("SKILLBOARD_RATE_LIMIT") {
            self.server.rate_limit = parse_env("SKILLBOARD_RATE_LIMIT", &limit)?;
        }
        if let Some(database) = lookup("SKILLBOARD_DATABASE") {
            self.storage.database = PathBuf::from(database);
        }
        if let Some(backend) = lookup("SKILLBOARD_BACKEND") {
            self.storage.backend = Backend::from_str(backend.trim(), true).map_err(|_| {
                SkillboardError::SerializationError(format!(
                    "SKILLBOARD_BACKEND: unknown backend '{}' (expected redb or memory)",
                    backend
                ))
            })?;
        }
        if let Some(seed) = lookup("SKILLBOARD_SEED_DEMO") {
            self.storage.seed_demo = parse_flag("SKILLBOARD_SEED_DEMO", &seed)?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, SkillboardError> {
    raw.trim().parse().map_err(|_| {
        SkillboardError::SerializationError(format!("{}: invalid value '{}'", name, raw))
    })
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, SkillboardError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SkillboardError::SerializationError(format!(
            "{}: invalid value '{}'",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.server.addr(), "127.0.0.1:8080");
        assert_eq!(config.server.rate_limit, 100);
        assert_eq!(config.storage.backend, Backend::Redb);
        assert!(!config.storage.seed_demo);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 9000

            [storage]
            backend = "memory"
            "#,
        )
        .expect("parse");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.backend, Backend::Memory);
        assert_eq!(config.storage.database, PathBuf::from("skillboard.redb"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("[server]\nprot = 1\n").expect_err("typo");
        assert!(matches!(err, SkillboardError::SerializationError(_)));
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = Config::from_toml_str("[server]\nport = 9000\n").expect("parse");
        config
            .apply_env(env(&[
                ("SKILLBOARD_PORT", "7000"),
                ("SKILLBOARD_BACKEND", "MEMORY"),
                ("SKILLBOARD_CORS_ORIGINS", "http://a.test, http://b.test,"),
                ("SKILLBOARD_SEED_DEMO", "yes"),
                ("SKILLBOARD_RATE_LIMIT", "0"),
            ]))
            .expect("env");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.storage.backend, Backend::Memory);
        assert_eq!(
            config.server.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
        assert!(config.storage.seed_demo);
        assert_eq!(config.server.rate_limit, 0);
    }

    #[test]
    fn bad_environment_values_are_errors() {
        let mut config = Config::default();
        assert!(config.apply_env(env(&[("SKILLBOARD_PORT", "eighty")])).is_err());
        assert!(config.apply_env(env(&[("SKILLBOARD_BACKEND", "sqlite")])).is_err());
        assert!(config.apply_env(env(&[("SKILLBOARD_SEED_DEMO", "maybe")])).is_err());
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("board.toml");
        std::fs::write(&path, "[storage]\nseed_demo = true\n").expect("write");
        let config = Config::load(Some(&path)).expect("load");
        assert!(config.storage.seed_demo);

        let missing = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(missing, Err(SkillboardError::IoError(_))));
    }
}
