//! Configuration loading from campus.toml.

use policy::AccessPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the database location.
pub const DB_ENV: &str = "CAMPUS_DB";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Access rules for views.
    #[serde(default)]
    pub access: AccessPolicy,
}

/// Where the catalog lives.
#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Database file. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config
            .access
            .validate()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Resolve the database path: environment, then config, then data dir.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(DB_ENV) {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }
        dirs_data_dir()
            .map(|dir| dir.join("campus.db"))
            .ok_or(ConfigError::NoDataDir)
    }
}

fn dirs_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share/campus"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
            .map(|p| p.join("campus"))
    }
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|h| PathBuf::from(h).join("campus"))
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("no data directory found: set storage.path or CAMPUS_DB")]
    NoDataDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.storage.path.is_none());
        assert_eq!(config.access, AccessPolicy::default());
    }

    #[test]
    fn test_parse_storage_and_access() {
        let config = Config::parse(
            r#"
[storage]
path = "/tmp/campus-test.db"

[access]
public_paths = ["/", "/login", "/about"]
"#,
        )
        .unwrap();

        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/campus-test.db")));
        assert!(config.access.is_public("/about"));
        assert_eq!(config.access.login_path, "/login");
    }

    #[test]
    fn test_rejects_unreachable_login() {
        let result = Config::parse(
            r#"
[access]
public_paths = ["/"]
"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
