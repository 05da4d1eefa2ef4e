//! End-to-end tests for the viewshot capture service
//!
//! These exercise the full path a bridge request takes: boundary parsing,
//! source selection, render/readback over the mock source, PNG encoding,
//! and the base64 response envelope. The platform ScreenCaptureKit backend
//! needs screen recording permission and is not used here.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::sync::Arc;
use viewshot_adapters::MockRenderSource;
use viewshot_core::{
    handle_command, CaptureError, CaptureService, CaptureSource, CommandRequest, ViewportHandle,
};

fn request(action: Option<&str>, target: Option<&str>) -> CommandRequest {
    CommandRequest {
        action: action.map(str::to_string),
        target: target.map(str::to_string),
    }
}

fn decode_png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let decoder = png::Decoder::new(bytes);
    let reader = decoder.read_info().expect("payload must be decodable PNG");
    let info = reader.info();
    (info.width, info.height)
}

#[test]
fn test_scene_capture_returns_viewport_sized_png() {
    let mock = Arc::new(MockRenderSource::with_viewport(800.0, 600.0));
    let service = CaptureService::new(Arc::clone(&mock));

    let response = handle_command(&service, &request(Some("capture"), Some("scene")));

    assert!(response.success, "message: {}", response.message);
    let payload = response.data.expect("success must carry a payload");
    assert_eq!((payload.width, payload.height), (800, 600));

    let bytes = BASE64.decode(&payload.base64).expect("valid base64");
    assert!(!bytes.is_empty());
    assert_eq!(decode_png_dimensions(&bytes), (800, 600));
}

#[test]
fn test_missing_target_defaults_to_display() {
    let mock = Arc::new(MockRenderSource::new());
    mock.set_display_size(1920, 1080);
    let service = CaptureService::new(Arc::clone(&mock));

    let response = handle_command(&service, &request(Some("capture"), None));

    assert!(response.success);
    let payload = response.data.unwrap();
    assert_eq!((payload.width, payload.height), (1920, 1080));
}

#[test]
fn test_unknown_target_falls_back_to_display() {
    let mock = Arc::new(MockRenderSource::new());
    mock.set_display_size(1280, 720);
    let service = CaptureService::new(Arc::clone(&mock));

    let response = handle_command(&service, &request(Some("capture"), Some("window")));

    assert!(response.success);
    assert_eq!(response.data.unwrap().width, 1280);
    // The viewport path was never taken
    assert_eq!(mock.renders(), 0);
}

#[test]
fn test_unknown_action_names_offender_and_never_captures() {
    let mock = Arc::new(MockRenderSource::with_viewport(800.0, 600.0));
    let service = CaptureService::new(Arc::clone(&mock));

    let response = handle_command(&service, &request(Some("snapshot"), Some("scene")));

    assert!(!response.success);
    assert!(response.message.contains("snapshot"));
    assert!(response.data.is_none());
    assert_eq!(mock.renders(), 0);
}

#[test]
fn test_no_viewport_yields_structured_error_without_payload() {
    let mock = Arc::new(MockRenderSource::new());
    let service = CaptureService::new(Arc::clone(&mock));

    let response = handle_command(&service, &request(Some("capture"), Some("scene")));

    assert!(!response.success);
    assert!(response.message.contains("viewport"));
    assert!(response.data.is_none());
}

#[test]
fn test_render_failure_yields_render_failed() {
    let mock = Arc::new(MockRenderSource::with_viewport(640.0, 480.0));
    mock.fail_next_renders(1);
    let service = CaptureService::new(Arc::clone(&mock));

    let err = service.capture(CaptureSource::Viewport).unwrap_err();
    assert!(matches!(err, CaptureError::RenderFailed(_)));
}

#[test]
fn test_target_state_clean_after_mixed_success_and_failure() {
    let mock = Arc::new(MockRenderSource::with_viewport(320.0, 240.0));
    let service = CaptureService::new(Arc::clone(&mock));

    for i in 0..6 {
        if i % 2 == 0 {
            mock.fail_next_renders(1);
        }
        let _ = service.capture(CaptureSource::Viewport);
        assert!(
            mock.active_target().is_none(),
            "render target still redirected after call {}",
            i
        );
    }
    assert_eq!(mock.renders(), 6);
}

#[test]
fn test_repeated_captures_of_static_source_match_dimensions() {
    let mock = Arc::new(MockRenderSource::with_viewport(1024.0, 768.0));
    let service = CaptureService::new(mock);

    let first = service.capture(CaptureSource::Viewport).unwrap();
    let second = service.capture(CaptureSource::Viewport).unwrap();

    assert_eq!((first.width, first.height), (second.width, second.height));
    // Static content, same compression: identical encodings
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_viewport_size_change_is_reflected_at_call_time() {
    let mock = Arc::new(MockRenderSource::with_viewport(800.0, 600.0));
    let service = CaptureService::new(Arc::clone(&mock));

    let before = service.capture(CaptureSource::Viewport).unwrap();
    assert_eq!((before.width, before.height), (800, 600));

    mock.set_viewport(Some(ViewportHandle::new(1, 400.0, 300.0)));
    let after = service.capture(CaptureSource::Viewport).unwrap();
    assert_eq!((after.width, after.height), (400, 300));
}

#[test]
fn test_response_envelope_serializes_like_the_bridge() {
    let mock = Arc::new(MockRenderSource::with_viewport(8.0, 8.0));
    let service = CaptureService::new(mock);

    let ok = handle_command(&service, &request(Some("capture"), Some("scene")));
    let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&ok).unwrap()).unwrap();
    assert_eq!(json["success"], true);
    assert!(json["data"]["base64"].is_string());
    assert_eq!(json["data"]["width"], 8);

    let err = handle_command(&service, &request(Some("bogus"), None));
    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&err).unwrap()).unwrap();
    assert_eq!(json["success"], false);
    // No payload key at all on errors
    assert!(json.get("data").is_none());
}
