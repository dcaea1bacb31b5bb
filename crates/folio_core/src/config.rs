//! Runtime configuration for folio consumers.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory.

use crate::logging::default_log_level;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "./data/folio.sqlite3";

/// Folio configuration resolved from `FOLIO_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolioConfig {
    /// SQLite file backing key-value storage (`FOLIO_DB_PATH`).
    pub db_path: PathBuf,
    /// Log level, `trace|debug|info|warn|error` (`FOLIO_LOG_LEVEL`).
    pub log_level: String,
    /// Absolute log directory; file logging is off when unset (`FOLIO_LOG_DIR`).
    pub log_dir: Option<PathBuf>,
    /// Admin password; admin login always fails when unset
    /// (`FOLIO_ADMIN_PASSWORD`).
    pub admin_password: Option<String>,
}

impl FolioConfig {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            db_path: read("FOLIO_DB_PATH")
                .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
                .into(),
            log_level: read("FOLIO_LOG_LEVEL")
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read("FOLIO_LOG_DIR").map(PathBuf::from),
            admin_password: read("FOLIO_ADMIN_PASSWORD"),
        }
    }
}
