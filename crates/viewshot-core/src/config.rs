//! Configuration management for viewshot
//!
//! Handles loading and validation of TOML configuration files.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for viewshot
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Capture-related settings
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Capture configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// PNG compression level 0-9 (default: 6)
    #[serde(default = "default_compression")]
    pub compression: u8,

    /// Default capture target when none is given: "scene" or "display"
    #[serde(default = "default_target")]
    pub default_target: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            default_target: default_target(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Directory for log files (default: ~/.viewshot/logs)
    #[serde(default = "default_log_dir", deserialize_with = "deserialize_dir")]
    pub dir: PathBuf,

    /// Log level: error, warn, info, debug, trace (default: info)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to also log to stdout (default: false)
    #[serde(default)]
    pub stdout: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            level: default_log_level(),
            stdout: false,
        }
    }
}

// Default value functions
fn default_compression() -> u8 {
    6
}

fn default_target() -> String {
    "display".to_string()
}

fn default_log_dir() -> PathBuf {
    data_dir().join("logs")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Returns the viewshot data directory (~/.viewshot)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".viewshot")
}

/// Returns the default configuration file path (~/.viewshot/config.toml)
pub fn get_default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// Expands a leading tilde (~) to the home directory
fn expand_tilde(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if path_str.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path_str.trim_start_matches("~/"));
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    path.to_path_buf()
}

/// Custom deserializer for directory paths that expands tilde
fn deserialize_dir<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let path_str = String::deserialize(deserializer)?;
    Ok(expand_tilde(Path::new(&path_str)))
}

impl Config {
    /// Validates configuration values.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` for out-of-range or unrecognized
    /// values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capture.compression > 9 {
            return Err(ConfigError::InvalidValue(format!(
                "capture.compression must be 0-9, got {}",
                self.capture.compression
            )));
        }
        match self.capture.default_target.to_lowercase().as_str() {
            "scene" | "display" | "game" => {}
            other => {
                return Err(ConfigError::InvalidValue(format!(
                    "capture.default_target must be 'scene' or 'display', got '{}'",
                    other
                )));
            }
        }
        match self.log.level.to_lowercase().as_str() {
            "error" | "warn" | "warning" | "info" | "debug" | "trace" => {}
            other => {
                return Err(ConfigError::InvalidValue(format!(
                    "log.level '{}' is not a valid log level",
                    other
                )));
            }
        }
        Ok(())
    }
}

/// Loads configuration from the default path.
///
/// A missing file is not an error; defaults are used instead.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = get_default_config_path();
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config_from_path(&path)
}

/// Loads and validates configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    let contents = fs::read_to_string(path)?;
    let config: Config =
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.capture.compression, 6);
        assert_eq!(config.capture.default_target, "display");
        assert_eq!(config.log.level, "info");
        assert!(!config.log.stdout);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_config_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[capture]
compression = 9
default_target = "scene"

[log]
level = "debug"
stdout = true
"#
        )
        .unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.capture.compression, 9);
        assert_eq!(config.capture.default_target, "scene");
        assert_eq!(config.log.level, "debug");
        assert!(config.log.stdout);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[capture]\ncompression = 3\n").unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.capture.compression, 3);
        assert_eq!(config.capture.default_target, "display");
    }

    #[test]
    fn test_invalid_compression_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[capture]\ncompression = 12\n").unwrap();

        let err = load_config_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("compression"));
    }

    #[test]
    fn test_invalid_target_rejected() {
        let config = Config {
            capture: CaptureConfig {
                compression: 6,
                default_target: "window".to_string(),
            },
            log: LogConfig::default(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_config_from_path(Path::new("/nonexistent/viewshot.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_parse_error_reported() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[").unwrap();

        let err = load_config_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde(Path::new("~/captures"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("captures"));
        }
    }
}
