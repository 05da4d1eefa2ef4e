//! Render source port definition
//!
//! The capture service never talks to a rendering runtime directly. Hosts
//! implement [`RenderSourcePort`] against their engine (or a platform
//! screenshot facility) and inject it into the service.

use thiserror::Error;

/// Handle to an interactive, camera-driven 3D viewport.
///
/// Dimensions are the viewport's current on-screen size as reported by the
/// host, which may be fractional (e.g. on scaled displays).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportHandle {
    /// Host-assigned viewport identifier
    pub id: u64,
    /// On-screen width in (possibly fractional) pixels
    pub width: f32,
    /// On-screen height in (possibly fractional) pixels
    pub height: f32,
}

impl ViewportHandle {
    /// Creates a handle with the given id and on-screen size
    pub fn new(id: u64, width: f32, height: f32) -> Self {
        Self { id, width, height }
    }

    /// Returns the viewport size rounded to the nearest integer pixel
    pub fn pixel_size(&self) -> (u32, u32) {
        let width = self.width.round().max(0.0) as u32;
        let height = self.height.round().max(0.0) as u32;
        (width, height)
    }
}

/// Sample layout of a pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// 8-bit RGB, no alpha
    Rgb8,
    /// 8-bit RGBA
    Rgba8,
}

impl ChannelLayout {
    /// Bytes occupied by one pixel sample
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ChannelLayout::Rgb8 => 3,
            ChannelLayout::Rgba8 => 4,
        }
    }
}

/// CPU-readable pixel data produced by a render or readback.
///
/// A `PixelBuffer` is only constructible through [`PixelBuffer::new`], which
/// checks that the data length matches the declared dimensions, so a buffer
/// in hand is always fully initialized.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    layout: ChannelLayout,
}

impl PixelBuffer {
    /// Creates a pixel buffer, validating the data length against the
    /// declared dimensions and layout.
    ///
    /// # Errors
    /// Returns `RenderError::Backend` if `data.len()` does not equal
    /// `width * height * bytes_per_pixel`.
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        layout: ChannelLayout,
    ) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize * layout.bytes_per_pixel();
        if data.len() != expected {
            return Err(RenderError::Backend(format!(
                "pixel buffer length {} does not match {}x{} {:?} (expected {})",
                data.len(),
                width,
                height,
                layout,
                expected
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            layout,
        })
    }

    /// Buffer width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample layout of the buffer
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Raw sample data, row-major, tightly packed
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True when the buffer contains no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Errors that can occur inside a render source implementation
#[derive(Debug, Error)]
pub enum RenderError {
    /// The render or readback produced no buffer
    #[error("Render produced no pixel buffer")]
    NoBuffer,

    /// Screen recording permission was denied by the platform
    #[error("Screen recording permission denied")]
    PermissionDenied,

    /// Backend-specific failure
    #[error("{0}")]
    Backend(String),
}

/// Port supplying rendered frames to the capture service.
///
/// Implementations wrap a host rendering runtime or a platform screenshot
/// facility. Calls are synchronous and must be issued from the thread that
/// owns the rendering context; the port provides no internal locking, so
/// concurrent calls against one source must be serialized by the caller.
pub trait RenderSourcePort: Send + Sync {
    /// Returns the most recently active interactive viewport, if any.
    ///
    /// `None` is a normal condition (no viewport open), not a failure.
    fn current_viewport(&self) -> Option<ViewportHandle>;

    /// Renders the given viewport into an offscreen surface of the given
    /// size and reads the pixels back.
    ///
    /// Implementations must restore any redirected render-target state on
    /// every exit path; [`crate::scope::ScopedRestore`] expresses the
    /// redirect-render-read-restore sequence as one scoped acquisition.
    fn render_to_buffer(
        &self,
        viewport: &ViewportHandle,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, RenderError>;

    /// Captures the framebuffer currently presented to the user.
    ///
    /// The buffer size is whatever the platform reports, which may differ
    /// from any previously observed display size.
    fn capture_display_buffer(&self) -> Result<PixelBuffer, RenderError>;
}
