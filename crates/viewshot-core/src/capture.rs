//! Frame capture service
//!
//! Captures a rendered frame from an injected [`RenderSourcePort`] and
//! encodes it as PNG. Each call is self-contained and synchronous: render,
//! read back, encode, release. No state persists between calls and no
//! retries happen internally; a failed capture is reported immediately.

use crate::ports::render::{ChannelLayout, PixelBuffer, RenderError, RenderSourcePort};
use std::io::BufWriter;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Default PNG compression level (0-9)
pub const DEFAULT_COMPRESSION: u8 = 6;

/// Rendering source to capture from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// The most recently active interactive 3D viewport
    Viewport,
    /// The framebuffer currently presented to the user
    PrimaryDisplay,
}

/// A complete, decodable PNG image produced by a capture.
///
/// `width` and `height` are the dimensions of the pixel buffer that was
/// actually encoded, which may differ from the requested dimensions if the
/// platform adjusted them.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// PNG-encoded image bytes
    pub bytes: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl EncodedImage {
    /// Encoding format of `bytes`
    pub const FORMAT: &'static str = "PNG";
}

/// Errors that can occur during a capture operation
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No interactive viewport is open; expected and recoverable
    #[error("No active viewport found")]
    NoActiveViewport,

    /// The render or readback produced no usable pixel buffer
    #[error("Failed to produce a pixel buffer: {0}")]
    RenderFailed(String),

    /// A pixel buffer was produced but PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodeFailed(String),

    /// Any other failure; the underlying message is preserved verbatim
    #[error("Capture failed: {0}")]
    Unexpected(String),
}

/// Frame capture service over an injected render source.
///
/// The service is synchronous and request-at-a-time: it provides no internal
/// locking, and the viewport path transiently redirects render-target state
/// inside the source, so concurrent captures against one source must be
/// serialized by the caller.
pub struct CaptureService<R: RenderSourcePort> {
    render: Arc<R>,
    /// PNG compression level 0-9
    compression: u8,
}

impl<R: RenderSourcePort> CaptureService<R> {
    /// Creates a capture service over the given render source
    pub fn new(render: Arc<R>) -> Self {
        Self {
            render,
            compression: DEFAULT_COMPRESSION,
        }
    }

    /// Sets the PNG compression level (0-9, clamped)
    pub fn with_compression(mut self, level: u8) -> Self {
        self.compression = level.min(9);
        self
    }

    /// Captures one frame from the selected source and encodes it as PNG.
    ///
    /// # Errors
    /// * `NoActiveViewport` - `Viewport` was requested but no viewport is open
    /// * `RenderFailed` - the source produced no usable pixel buffer
    /// * `EncodeFailed` - the buffer could not be encoded
    /// * `Unexpected` - the source faulted; the fault message is preserved
    pub fn capture(&self, source: CaptureSource) -> Result<EncodedImage, CaptureError> {
        // A faulting source implementation (e.g. an FFI-backed adapter that
        // panics mid-render) must surface as a structured error at this
        // boundary, not unwind into the host bridge.
        match catch_unwind(AssertUnwindSafe(|| self.capture_inner(source))) {
            Ok(result) => result,
            Err(payload) => Err(CaptureError::Unexpected(panic_message(&payload))),
        }
    }

    fn capture_inner(&self, source: CaptureSource) -> Result<EncodedImage, CaptureError> {
        let buffer = match source {
            CaptureSource::Viewport => {
                let viewport = self
                    .render
                    .current_viewport()
                    .ok_or(CaptureError::NoActiveViewport)?;
                let (width, height) = viewport.pixel_size();
                debug!(
                    viewport = viewport.id,
                    width, height, "Rendering viewport to offscreen surface"
                );
                self.render
                    .render_to_buffer(&viewport, width, height)
                    .map_err(render_failure)?
            }
            CaptureSource::PrimaryDisplay => {
                debug!("Capturing primary display buffer");
                self.render.capture_display_buffer().map_err(render_failure)?
            }
        };

        if buffer.is_empty() {
            return Err(CaptureError::RenderFailed(
                "render produced an empty buffer".to_string(),
            ));
        }

        let image = self.encode_png(&buffer)?;
        info!(
            width = image.width,
            height = image.height,
            bytes = image.bytes.len(),
            "Frame captured"
        );
        Ok(image)
    }

    /// Encodes a pixel buffer as PNG, taking the output dimensions from the
    /// buffer itself
    fn encode_png(&self, buffer: &PixelBuffer) -> Result<EncodedImage, CaptureError> {
        let mut bytes = Vec::new();
        {
            let writer = BufWriter::new(&mut bytes);
            let mut encoder = png::Encoder::new(writer, buffer.width(), buffer.height());
            encoder.set_color(match buffer.layout() {
                ChannelLayout::Rgb8 => png::ColorType::Rgb,
                ChannelLayout::Rgba8 => png::ColorType::Rgba,
            });
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_compression(compression_for(self.compression));

            let mut writer = encoder
                .write_header()
                .map_err(|e| CaptureError::EncodeFailed(format!("PNG header error: {}", e)))?;
            writer
                .write_image_data(buffer.data())
                .map_err(|e| CaptureError::EncodeFailed(format!("PNG data error: {}", e)))?;
        }

        Ok(EncodedImage {
            bytes,
            width: buffer.width(),
            height: buffer.height(),
        })
    }
}

fn render_failure(err: RenderError) -> CaptureError {
    CaptureError::RenderFailed(err.to_string())
}

/// Maps a 0-9 compression level onto the png crate's presets
fn compression_for(level: u8) -> png::Compression {
    match level {
        0..=2 => png::Compression::Fast,
        3..=7 => png::Compression::Default,
        _ => png::Compression::Best,
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown fault in render source".to_string()
    }
}
