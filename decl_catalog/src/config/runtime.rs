// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors raised while loading a runtime configuration file
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid configuration in {path}: {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Reject inputs that are not `.c` or `.h` files
    pub require_c_extension: bool,

    /// Whether to log size/throughput details after reading a file
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_c_extension: env::var(env_vars::REQUIRE_C_EXTENSION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            enable_performance_logging: env::var(env_vars::ENABLE_PERFORMANCE_LOGGING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanPreferences {
    /// Surface skipped constructs (truncated declarations, unterminated bodies and comments)
    /// as warnings instead of debug events
    pub report_skipped_constructs: bool,

    /// Attach record spans to scan log events
    pub include_positions_in_logs: bool,
}

impl Default for ScanPreferences {
    fn default() -> Self {
        Self {
            report_skipped_constructs: env::var(env_vars::SCAN_REPORT_SKIPPED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            include_positions_in_logs: env::var(env_vars::SCAN_INCLUDE_POSITIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

/// Catalog output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One text file per declaration kind
    Text,
    /// Text files plus a `catalog.json` manifest
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

pub fn parse_output_format(format: &str) -> Option<OutputFormat> {
    match format.to_lowercase().as_str() {
        "text" | "txt" => Some(OutputFormat::Text),
        "json" => Some(OutputFormat::Json),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPreferences {
    /// Directory receiving the constants/functions/variables files
    pub output_dir: PathBuf,

    pub format: OutputFormat,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            output_dir: env::var(env_vars::OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output_files")),
            format: env::var(env_vars::OUTPUT_FORMAT)
                .ok()
                .and_then(|v| parse_output_format(&v))
                .unwrap_or(OutputFormat::Text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    pub min_log_level: LogLevel,

    /// Print the cargo-style error summary at the end of a run
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            enable_cargo_style_output: env::var(env_vars::LOGGING_CARGO_STYLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_file_context: env::var(env_vars::LOGGING_INCLUDE_FILE_CONTEXT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub scanning: ScanPreferences,
    pub output: OutputPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; tables and keys that are absent keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_C_EXTENSION: &str = "CATALOG_REQUIRE_C_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "CATALOG_ENABLE_PERFORMANCE_LOGGING";

    // Scanning
    pub const SCAN_REPORT_SKIPPED: &str = "CATALOG_SCAN_REPORT_SKIPPED";
    pub const SCAN_INCLUDE_POSITIONS: &str = "CATALOG_SCAN_INCLUDE_POSITIONS";

    // Output
    pub const OUTPUT_DIR: &str = "CATALOG_OUTPUT_DIR";
    pub const OUTPUT_FORMAT: &str = "CATALOG_OUTPUT_FORMAT";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "CATALOG_LOGGING_USE_STRUCTURED";
    pub const LOGGING_MIN_LEVEL: &str = "CATALOG_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "CATALOG_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "CATALOG_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(parse_output_format("text"), Some(OutputFormat::Text));
        assert_eq!(parse_output_format("TXT"), Some(OutputFormat::Text));
        assert_eq!(parse_output_format("json"), Some(OutputFormat::Json));
        assert_eq!(parse_output_format("yaml"), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [output]
            output_dir = "catalog_out"
            format = "json"

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.output.output_dir, PathBuf::from("catalog_out"));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = RuntimeConfig::from_toml_str("[output]\nformat = \"xml\"\n");
        assert_matches!(result, Err(ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = RuntimeConfig::from_toml_file(&dir.path().join("absent.toml"));
        assert_matches!(result, Err(ConfigError::Io { .. }));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(
            &path,
            "[file_processor]\nrequire_c_extension = false\n\n[scanning]\nreport_skipped_constructs = true\n",
        )
        .unwrap();

        let config = RuntimeConfig::from_toml_file(&path).unwrap();
        assert!(!config.file_processor.require_c_extension);
        assert!(config.scanning.report_skipped_constructs);
    }
}
