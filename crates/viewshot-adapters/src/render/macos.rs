//! ScreenCaptureKit render source for macOS
//!
//! Supplies the primary-display buffer through Apple's ScreenCaptureKit
//! framework. Requires macOS 14.0+ for the SCScreenshotManager API. This
//! source has no embedded 3D engine, so it never reports a viewport;
//! viewport capture is only available through a host-provided source.

use screencapturekit::prelude::*;
use screencapturekit::screenshot_manager::SCScreenshotManager;
use std::process::Command;
use tracing::{debug, info};
use viewshot_core::ports::render::{
    ChannelLayout, PixelBuffer, RenderError, RenderSourcePort, ViewportHandle,
};

/// Minimum macOS version required for SCScreenshotManager (14.0)
const MIN_SCREENSHOT_MAJOR: u32 = 14;
const MIN_SCREENSHOT_MINOR: u32 = 0;

/// ScreenCaptureKit display source for macOS
pub struct ScreenCaptureKitSource;

impl ScreenCaptureKitSource {
    /// Creates a new ScreenCaptureKit source
    pub fn new() -> Self {
        Self
    }

    /// Get the current macOS version
    fn get_macos_version() -> Result<(u32, u32, u32), RenderError> {
        let output = Command::new("sw_vers")
            .arg("-productVersion")
            .output()
            .map_err(|e| RenderError::Backend(format!("Failed to get macOS version: {}", e)))?;

        let version_str = String::from_utf8_lossy(&output.stdout);
        let version_str = version_str.trim();

        let parts: Vec<&str> = version_str.split('.').collect();
        if parts.is_empty() {
            return Err(RenderError::Backend(format!(
                "Invalid macOS version format: {}",
                version_str
            )));
        }

        let major: u32 = parts.first().and_then(|s| s.parse().ok()).unwrap_or(0);
        let minor: u32 = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
        let patch: u32 = parts.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);

        Ok((major, minor, patch))
    }

    /// Check that the current macOS version meets the minimum requirement
    fn check_macos_version() -> Result<String, RenderError> {
        let (major, minor, patch) = Self::get_macos_version()?;
        let version_str = format!("{}.{}.{}", major, minor, patch);

        if major < MIN_SCREENSHOT_MAJOR
            || (major == MIN_SCREENSHOT_MAJOR && minor < MIN_SCREENSHOT_MINOR)
        {
            return Err(RenderError::Backend(format!(
                "SCScreenshotManager requires macOS 14.0 or later (current: {})",
                version_str
            )));
        }

        Ok(version_str)
    }

    /// Get the main display for capture
    fn get_main_display() -> Result<SCDisplay, RenderError> {
        let content =
            SCShareableContent::get().map_err(|e: screencapturekit::error::SCError| {
                let msg = e.to_string();
                if msg.to_lowercase().contains("permission")
                    || msg.to_lowercase().contains("denied")
                    || msg.to_lowercase().contains("not authorized")
                {
                    RenderError::PermissionDenied
                } else {
                    RenderError::Backend(format!("Failed to get shareable content: {}", msg))
                }
            })?;

        content
            .displays()
            .into_iter()
            .next()
            .ok_or_else(|| RenderError::Backend("No displays found".to_string()))
    }
}

impl Default for ScreenCaptureKitSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSourcePort for ScreenCaptureKitSource {
    fn current_viewport(&self) -> Option<ViewportHandle> {
        // No embedded engine on this backend
        None
    }

    fn render_to_buffer(
        &self,
        _viewport: &ViewportHandle,
        _width: u32,
        _height: u32,
    ) -> Result<PixelBuffer, RenderError> {
        Err(RenderError::Backend(
            "Offscreen viewport rendering is not available on the ScreenCaptureKit backend"
                .to_string(),
        ))
    }

    fn capture_display_buffer(&self) -> Result<PixelBuffer, RenderError> {
        debug!("Checking macOS version...");
        let version = Self::check_macos_version()?;
        debug!("macOS version: {}", version);

        debug!("Getting main display...");
        let display = Self::get_main_display()?;

        let display_width = display.width() as u32;
        let display_height = display.height() as u32;
        info!("Capturing display: {}x{}", display_width, display_height);

        let filter = SCContentFilter::create()
            .with_display(&display)
            .with_excluding_windows(&[])
            .build();

        let config = SCStreamConfiguration::new()
            .with_width(display_width)
            .with_height(display_height)
            .with_shows_cursor(true);

        let image = SCScreenshotManager::capture_image(&filter, &config).map_err(
            |e: screencapturekit::error::SCError| {
                let msg = e.to_string();
                if msg.to_lowercase().contains("permission")
                    || msg.to_lowercase().contains("denied")
                {
                    RenderError::PermissionDenied
                } else {
                    RenderError::Backend(format!("Screenshot capture failed: {}", msg))
                }
            },
        )?;

        // The platform may have adjusted the dimensions; report what it
        // actually produced
        let img_width = image.width() as u32;
        let img_height = image.height() as u32;

        debug!("Reading back RGBA pixels...");
        let rgba_data = image
            .rgba_data()
            .map_err(|e| RenderError::Backend(format!("Failed to get RGBA data: {}", e)))?;

        PixelBuffer::new(rgba_data, img_width, img_height, ChannelLayout::Rgba8)
    }
}
