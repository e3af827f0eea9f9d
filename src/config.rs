//! Runtime settings read from the environment.

use std::path::PathBuf;

pub const MODEL_DIR_ENV: &str = "OBESCREEN_MODEL_DIR";
pub const LOG_MODE_ENV: &str = "OBESCREEN_LOG_MODE";
pub const LOG_FILE_ENV: &str = "OBESCREEN_LOG_FILE";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    File,
    Stdout,
    /// File when stdout is a terminal (the TUI owns the screen), stdout otherwise.
    Auto,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(&self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding `model.json` and `metadata.json`.
    pub model_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Settings {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            model_dir: lookup(MODEL_DIR_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| PathBuf::from("models"), PathBuf::from),
            log_mode: lookup(LOG_MODE_ENV).map_or(LogMode::Auto, |v| LogMode::parse(&v)),
            log_file: lookup(LOG_FILE_ENV)
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| PathBuf::from("obescreen.log"), PathBuf::from),
        }
    }
}
