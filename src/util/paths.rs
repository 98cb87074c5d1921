//! Path utilities for storefront data directories

use std::path::PathBuf;

/// Get the base data directory (~/.storefront)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".storefront"))
        .unwrap_or_else(|| PathBuf::from(".storefront"))
}

/// Get the database file path (~/.storefront/storefront.db)
pub fn database_path() -> PathBuf {
    data_dir().join("storefront.db")
}

/// Get the default settings file path (~/.storefront/config.toml)
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
