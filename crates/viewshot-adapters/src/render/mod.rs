//! Platform render source implementations
//!
//! Contains the ScreenCaptureKit source for macOS display capture.

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "macos")]
pub use macos::ScreenCaptureKitSource;

// Provide a stub for non-macOS platforms
#[cfg(not(target_os = "macos"))]
pub struct ScreenCaptureKitSource;

#[cfg(not(target_os = "macos"))]
impl ScreenCaptureKitSource {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_os = "macos"))]
impl Default for ScreenCaptureKitSource {
    fn default() -> Self {
        Self::new()
    }
}
