//! viewshot-core - Frame capture and encode service
//!
//! Captures a rendered frame from an editor-automation host (an interactive
//! 3D viewport or the primary presented framebuffer), encodes it as PNG, and
//! packages it for a bridge-style caller. The rendering runtime is reached
//! only through the [`ports::RenderSourcePort`] capability trait, following
//! the Hexagonal Architecture pattern.

pub mod capture;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod ports;
pub mod scope;

// Re-export primary types for convenient access
pub use capture::{CaptureError, CaptureService, CaptureSource, EncodedImage};
pub use command::{
    handle_command, Action, CapturePayload, CommandError, CommandRequest, CommandResponse,
};
pub use config::{
    get_default_config_path, load_config, load_config_from_path, CaptureConfig, Config, LogConfig,
};
pub use error::{ConfigError, ViewshotError};
pub use logging::{init_logger, LogLevel, LoggerConfig, LoggerError, LoggerGuard};
pub use ports::render::{ChannelLayout, PixelBuffer, RenderError, ViewportHandle};
pub use ports::RenderSourcePort;
pub use scope::ScopedRestore;
