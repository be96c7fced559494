//! Application configuration.
//!
//! # Responsibility
//! - Resolve where notes, theme and logs live, and the log level.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - Resolution never fails; every setting has a default except `log_dir`,
//!   whose absence leaves file logging off.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const NOTES_DIR_ENV: &str = "STICKY_NOTES_DIR";
pub const THEME_FILE_ENV: &str = "STICKY_THEME_FILE";
pub const LOG_LEVEL_ENV: &str = "STICKY_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "STICKY_LOG_DIR";

const DEFAULT_NOTES_DIR: &str = "my_notes";
const DEFAULT_THEME_FILE: &str = "theme.json";

/// Resolved runtime settings for the application shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub notes_dir: PathBuf,
    pub theme_file: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logs.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Resolves settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup` (key -> raw value).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            notes_dir: read(NOTES_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NOTES_DIR)),
            theme_file: read(THEME_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_THEME_FILE)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
