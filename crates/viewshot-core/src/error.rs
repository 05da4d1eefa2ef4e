//! Common error types for viewshot
//!
//! Domain-specific errors live next to their modules and are re-exported
//! here; `ViewshotError` wraps them for callers that want one error type.

use thiserror::Error;

pub use crate::capture::CaptureError;
pub use crate::command::CommandError;
pub use crate::logging::LoggerError;
pub use crate::ports::render::RenderError;

/// Top-level error type for viewshot operations.
///
/// Wraps the domain-specific errors with automatic conversion via `From`,
/// enabling propagation with `?`.
#[derive(Debug, Error)]
pub enum ViewshotError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Capture-related errors
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Command boundary errors
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Logger errors
    #[error("Logger error: {0}")]
    Logger(#[from] LoggerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Parse error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
