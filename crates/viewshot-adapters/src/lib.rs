//! viewshot-adapters - Render source implementations
//!
//! Concrete implementations of the `RenderSourcePort` defined in
//! viewshot-core: the ScreenCaptureKit display source on macOS, and an
//! in-memory mock source for tests and offline use.

pub mod mock;
pub mod render;

pub use mock::MockRenderSource;

#[cfg(target_os = "macos")]
pub use render::ScreenCaptureKitSource;
