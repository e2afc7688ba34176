// RUNTIME PREFERENCES (User Experience)

use crate::logging::codes::{self, Code};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to write log events to stderr
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,

    /// Optional file that receives a copy of every log event
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            log_file: env::var(env_vars::LOGGING_FILE)
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderPreferences {
    /// Whether rendered tokens carry their `@varid` suffix
    pub show_var_id: bool,

    /// Optional banner printed above the rendering
    pub title: Option<String>,
}

impl Default for RenderPreferences {
    fn default() -> Self {
        Self {
            show_var_id: env::var(env_vars::RENDER_SHOW_VARID)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            title: env::var(env_vars::RENDER_TITLE)
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpPreferences {
    /// Whether the reader pairs `()`, `[]` and `{}` with bracket links
    pub link_brackets: bool,

    /// Whether the chain is validated after loading
    pub validate_after_load: bool,
}

impl Default for DumpPreferences {
    fn default() -> Self {
        Self {
            link_brackets: env::var(env_vars::DUMP_LINK_BRACKETS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            validate_after_load: env::var(env_vars::DUMP_VALIDATE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Errors raised while loading a runtime configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                codes::file_processing::FILE_NOT_FOUND
            }
            Self::Io { .. } => codes::file_processing::IO_ERROR,
            Self::Parse(_) => codes::file_processing::INVALID_CONFIG,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub logging: LoggingPreferences,
    pub render: RenderPreferences,
    pub dump: DumpPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; missing sections and keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "TOKCHAIN_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "TOKCHAIN_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "TOKCHAIN_LOGGING_MIN_LEVEL";
    pub const LOGGING_FILE: &str = "TOKCHAIN_LOGGING_FILE";

    // Render
    pub const RENDER_SHOW_VARID: &str = "TOKCHAIN_RENDER_SHOW_VARID";
    pub const RENDER_TITLE: &str = "TOKCHAIN_RENDER_TITLE";

    // Dump
    pub const DUMP_LINK_BRACKETS: &str = "TOKCHAIN_DUMP_LINK_BRACKETS";
    pub const DUMP_VALIDATE: &str = "TOKCHAIN_DUMP_VALIDATE";
}
