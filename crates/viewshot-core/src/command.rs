//! Transport boundary for bridge-style capture commands
//!
//! The host bridge hands over two informal strings, an action and a target.
//! Both are converted into closed variants here, once, so the capture
//! service itself never sees raw strings. Responses mirror the bridge's
//! success/error envelope: a human-readable message plus an optional
//! base64 payload.

use crate::capture::{CaptureService, CaptureSource, EncodedImage};
use crate::ports::render::RenderSourcePort;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Action requested by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Capture one frame and return it
    Capture,
}

impl Action {
    /// Parses an action string, case-insensitively.
    ///
    /// # Errors
    /// Returns `CommandError::UnknownAction` naming the offending value for
    /// anything other than `"capture"`.
    pub fn parse(action: &str) -> Result<Self, CommandError> {
        match action.to_lowercase().as_str() {
            "capture" => Ok(Action::Capture),
            other => Err(CommandError::UnknownAction(other.to_string())),
        }
    }
}

/// Errors raised at the command boundary, before any capture is attempted
#[derive(Debug, Error)]
pub enum CommandError {
    /// The action string is not recognized
    #[error("Unknown action: '{0}'. Valid action is 'capture'.")]
    UnknownAction(String),
}

/// Resolves a target string to a capture source.
///
/// `"scene"` (case-insensitive) selects the viewport; anything else,
/// including an absent target, falls back to the primary display. Unknown
/// targets log a warning but do not error.
pub fn resolve_target(target: Option<&str>) -> CaptureSource {
    match target.map(str::to_lowercase).as_deref() {
        Some("scene") => CaptureSource::Viewport,
        Some(other) if other != "game" && other != "display" => {
            warn!(requested = other, "Unknown capture target, using primary display");
            CaptureSource::PrimaryDisplay
        }
        _ => CaptureSource::PrimaryDisplay,
    }
}

/// A capture request as received from the bridge
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommandRequest {
    /// Requested action; absent defaults to `"capture"`
    #[serde(default)]
    pub action: Option<String>,
    /// Requested target; absent defaults to the primary display
    #[serde(default)]
    pub target: Option<String>,
}

/// Payload of a successful capture response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CapturePayload {
    /// Base64-encoded PNG bytes
    pub base64: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Bridge-style response envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandResponse {
    /// Whether the command succeeded
    pub success: bool,
    /// Human-readable outcome description
    pub message: String,
    /// Capture payload; present only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CapturePayload>,
}

impl CommandResponse {
    /// Builds a success response with the given payload
    pub fn ok(message: impl Into<String>, image: &EncodedImage) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(CapturePayload {
                base64: BASE64.encode(&image.bytes),
                width: image.width,
                height: image.height,
            }),
        }
    }

    /// Builds an error response; no payload is ever attached
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Handles one bridge command end to end.
///
/// Unknown actions are rejected before any capture is attempted. Capture
/// failures are converted into structured error responses; nothing
/// propagates as a fault.
pub fn handle_command<R: RenderSourcePort>(
    service: &CaptureService<R>,
    request: &CommandRequest,
) -> CommandResponse {
    let action = match request.action.as_deref() {
        Some(raw) => match Action::parse(raw) {
            Ok(action) => action,
            Err(err) => return CommandResponse::error(err.to_string()),
        },
        None => Action::Capture,
    };

    match action {
        Action::Capture => {
            let source = resolve_target(request.target.as_deref());
            match service.capture(source) {
                Ok(image) => CommandResponse::ok("Captured screenshot.", &image),
                Err(err) => CommandResponse::error(err.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureError;

    #[test]
    fn test_action_parse_capture() {
        assert_eq!(Action::parse("capture").unwrap(), Action::Capture);
        assert_eq!(Action::parse("CAPTURE").unwrap(), Action::Capture);
    }

    #[test]
    fn test_action_parse_unknown_names_offender() {
        let err = Action::parse("snapshot").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("snapshot"));
        assert!(msg.contains("capture"));
    }

    #[test]
    fn test_resolve_target_scene() {
        assert_eq!(resolve_target(Some("scene")), CaptureSource::Viewport);
        assert_eq!(resolve_target(Some("Scene")), CaptureSource::Viewport);
    }

    #[test]
    fn test_resolve_target_defaults_to_display() {
        assert_eq!(resolve_target(None), CaptureSource::PrimaryDisplay);
        assert_eq!(resolve_target(Some("game")), CaptureSource::PrimaryDisplay);
        assert_eq!(resolve_target(Some("window")), CaptureSource::PrimaryDisplay);
    }

    #[test]
    fn test_error_response_has_no_payload() {
        let response = CommandResponse::error(CaptureError::NoActiveViewport.to_string());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response.message.contains("viewport"));
    }

    #[test]
    fn test_ok_response_encodes_base64() {
        let image = EncodedImage {
            bytes: vec![1, 2, 3],
            width: 2,
            height: 2,
        };
        let response = CommandResponse::ok("Captured screenshot.", &image);
        let payload = response.data.unwrap();
        assert_eq!(payload.base64, BASE64.encode([1u8, 2, 3]));
        assert_eq!(payload.width, 2);
        assert_eq!(payload.height, 2);
    }
}
