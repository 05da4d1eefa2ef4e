//! Application initialization
//!
//! Centralized startup sequence for the viewshot CLI: configuration load
//! plus logger setup.

use anyhow::{Context, Result};
use viewshot_core::{
    init_logger, load_config, Config, LogLevel, LoggerConfig, LoggerError, LoggerGuard,
};

/// Application context holding initialized components
pub struct AppContext {
    /// Application configuration
    pub config: Config,
    /// Logger guard (keeps the logger alive)
    #[allow(dead_code)]
    logger_guard: Option<LoggerGuard>,
}

/// Application initialization options
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Log to stdout at debug level
    pub verbose: bool,
}

/// Initializes the viewshot application.
///
/// Loads configuration from `~/.viewshot/config.toml` (defaults when the
/// file is missing) and installs the tracing logger. A second init attempt
/// inside one process is tolerated; any other logger failure is surfaced.
pub fn initialize(options: InitOptions) -> Result<AppContext> {
    let config = load_config().context("Failed to load configuration")?;
    let logger_config = logger_config_for(&options, &config);

    let logger_guard = match init_logger(logger_config) {
        Ok(guard) => Some(guard),
        Err(LoggerError::AlreadyInitialized) => None,
        Err(e) => return Err(e).context("Failed to initialize logger"),
    };

    Ok(AppContext {
        config,
        logger_guard,
    })
}

/// Resolves the effective log level; `--verbose` overrides the config
fn log_level_for(options: &InitOptions, config: &Config) -> LogLevel {
    if options.verbose {
        LogLevel::Debug
    } else {
        config.log.level.parse().unwrap_or_default()
    }
}

/// Builds the logger configuration from options and loaded config
fn logger_config_for(options: &InitOptions, config: &Config) -> LoggerConfig {
    LoggerConfig::new(config.log.dir.clone())
        .with_level(log_level_for(options, config))
        .with_stdout(config.log.stdout || options.verbose)
}
