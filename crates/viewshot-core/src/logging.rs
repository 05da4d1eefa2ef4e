//! Logging infrastructure for viewshot
//!
//! Structured logging with rotated file output, built on `tracing`,
//! `tracing-subscriber`, and `tracing-appender`.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default log file name
pub const DEFAULT_LOG_FILE: &str = "viewshot.log";

/// Errors that can occur during logger initialization
#[derive(Debug, Error)]
pub enum LoggerError {
    /// Failed to create log directory
    #[error("Failed to create log directory: {0}")]
    DirectoryCreationFailed(String),

    /// A global subscriber is already installed
    #[error("Logger has already been initialized")]
    AlreadyInitialized,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Critical failures
    Error,
    /// Warnings and recoverable issues
    Warn,
    /// General information (default)
    #[default]
    Info,
    /// Detailed debugging information
    Debug,
    /// Very detailed tracing
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Configuration for the viewshot logger
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Log level filter
    pub level: LogLevel,
    /// Whether to also log to stdout
    pub log_to_stdout: bool,
}

impl LoggerConfig {
    /// Creates a new LoggerConfig with the specified log directory
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            log_dir,
            level: LogLevel::Info,
            log_to_stdout: false,
        }
    }

    /// Sets the log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Enables logging to stdout in addition to file
    pub fn with_stdout(mut self, enabled: bool) -> Self {
        self.log_to_stdout = enabled;
        self
    }

    /// Returns the log directory path
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Guard that keeps the logger alive.
///
/// When dropped, buffered log output is flushed.
pub struct LoggerGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Initializes the viewshot logger with the given configuration.
///
/// # Returns
/// A `LoggerGuard` that must be kept alive for the duration of the program.
///
/// # Errors
/// Returns `LoggerError` if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init_logger(config: LoggerConfig) -> Result<LoggerGuard, LoggerError> {
    use std::fs;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    if !config.log_dir.exists() {
        fs::create_dir_all(&config.log_dir).map_err(|e| {
            LoggerError::DirectoryCreationFailed(format!("{}: {}", config.log_dir.display(), e))
        })?;
    }

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, DEFAULT_LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("viewshot={}", config.level)));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if config.log_to_stdout {
        let stdout_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true);

        // try_init only fails when a global subscriber is already set
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stdout_layer)
            .try_init()
            .map_err(|_| LoggerError::AlreadyInitialized)?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .try_init()
            .map_err(|_| LoggerError::AlreadyInitialized)?;
    }

    tracing::info!(
        log_dir = %config.log_dir.display(),
        level = %config.level,
        "viewshot logger initialized"
    );

    Ok(LoggerGuard { _guard: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Error.to_string(), "error");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Trace.to_string(), "trace");
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("error".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
    }

    #[test]
    fn test_log_level_from_str_invalid() {
        let result = "verbose".parse::<LogLevel>();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unknown log level"));
    }

    #[test]
    fn test_logger_error_already_initialized_display() {
        let err = LoggerError::AlreadyInitialized;
        assert!(err.to_string().contains("already been initialized"));
    }

    #[test]
    fn test_logger_config_builder() {
        let config = LoggerConfig::new(PathBuf::from("/tmp/viewshot-logs"))
            .with_level(LogLevel::Debug)
            .with_stdout(true);

        assert_eq!(config.log_dir(), Path::new("/tmp/viewshot-logs"));
        assert_eq!(config.level, LogLevel::Debug);
        assert!(config.log_to_stdout);
    }
}
