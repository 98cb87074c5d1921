//! Application settings loaded from an optional TOML file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::data::{CONNECT_ATTEMPTS, CONNECT_RETRY_DELAY};
use crate::util::paths;

/// Resolved application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allow any origin (development default)
    pub cors_permissive: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Database file path; defaults to ~/.storefront/storefront.db
    pub path: PathBuf,
    /// Bootstrap open attempts before giving up
    pub connect_attempts: u32,
    /// Delay between bootstrap attempts
    pub retry_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
                cors_permissive: true,
            },
            database: DatabaseSettings {
                path: paths::database_path(),
                connect_attempts: CONNECT_ATTEMPTS,
                retry_delay: CONNECT_RETRY_DELAY,
            },
        }
    }
}

/// Partial settings as they appear in the TOML file; every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct TomlSettings {
    #[serde(default)]
    server: TomlServerSettings,
    #[serde(default)]
    database: TomlDatabaseSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlServerSettings {
    host: Option<String>,
    port: Option<u16>,
    cors_permissive: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlDatabaseSettings {
    path: Option<PathBuf>,
    connect_attempts: Option<u32>,
    retry_delay_secs: Option<u64>,
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map(PathBuf::from).unwrap_or_else(paths::config_path);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        let parsed: TomlSettings = toml::from_str(&raw)?;
        tracing::debug!(path = %path.display(), "Loaded settings file");
        Ok(Self::from_toml(parsed))
    }

    fn from_toml(toml: TomlSettings) -> Self {
        let defaults = Self::default();
        Self {
            server: ServerSettings {
                host: toml.server.host.unwrap_or(defaults.server.host),
                port: toml.server.port.unwrap_or(defaults.server.port),
                cors_permissive: toml
                    .server
                    .cors_permissive
                    .unwrap_or(defaults.server.cors_permissive),
            },
            database: DatabaseSettings {
                path: toml.database.path.unwrap_or(defaults.database.path),
                connect_attempts: toml
                    .database
                    .connect_attempts
                    .unwrap_or(defaults.database.connect_attempts),
                retry_delay: toml
                    .database
                    .retry_delay_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.database.retry_delay),
            },
        }
    }
}
