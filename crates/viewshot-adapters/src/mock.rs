//! In-memory mock render source
//!
//! A deterministic `RenderSourcePort` implementation for tests and offline
//! runs. It models the piece of host state a real engine adapter has to
//! protect: an "active render target" that the viewport path transiently
//! redirects and must restore on every exit path.

use std::sync::Mutex;
use tracing::debug;
use viewshot_core::ports::render::{
    ChannelLayout, PixelBuffer, RenderError, RenderSourcePort, ViewportHandle,
};
use viewshot_core::scope::ScopedRestore;

#[derive(Debug)]
struct MockState {
    viewport: Option<ViewportHandle>,
    display_size: (u32, u32),
    fill: [u8; 3],
    /// Remaining injected render failures
    fail_renders: u32,
    /// Render target currently redirected to an offscreen surface
    active_target: Option<u64>,
    renders: u64,
}

/// Mock render source with failure injection and target-restore tracking
pub struct MockRenderSource {
    state: Mutex<MockState>,
}

impl MockRenderSource {
    /// Creates a mock with a 1920x1080 display and no viewport
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                viewport: None,
                display_size: (1920, 1080),
                fill: [0x20, 0x40, 0x60],
                fail_renders: 0,
                active_target: None,
                renders: 0,
            }),
        }
    }

    /// Creates a mock with an active viewport of the given on-screen size
    pub fn with_viewport(width: f32, height: f32) -> Self {
        let mock = Self::new();
        mock.set_viewport(Some(ViewportHandle::new(1, width, height)));
        mock
    }

    /// Sets or clears the active viewport
    pub fn set_viewport(&self, viewport: Option<ViewportHandle>) {
        self.state.lock().unwrap().viewport = viewport;
    }

    /// Sets the reported primary display size
    pub fn set_display_size(&self, width: u32, height: u32) {
        self.state.lock().unwrap().display_size = (width, height);
    }

    /// Sets the solid fill color of produced buffers
    pub fn set_fill(&self, fill: [u8; 3]) {
        self.state.lock().unwrap().fill = fill;
    }

    /// Makes the next `n` render/readback calls fail with `NoBuffer`
    pub fn fail_next_renders(&self, n: u32) {
        self.state.lock().unwrap().fail_renders = n;
    }

    /// Returns the currently redirected render target, if any.
    ///
    /// `None` outside of a capture call means the mock's target state was
    /// restored correctly.
    pub fn active_target(&self) -> Option<u64> {
        self.state.lock().unwrap().active_target
    }

    /// Number of viewport renders attempted so far
    pub fn renders(&self) -> u64 {
        self.state.lock().unwrap().renders
    }

    fn take_injected_failure(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.fail_renders > 0 {
            state.fail_renders -= 1;
            true
        } else {
            false
        }
    }

    fn solid_buffer(&self, width: u32, height: u32) -> Result<PixelBuffer, RenderError> {
        let fill = self.state.lock().unwrap().fill;
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&fill);
        }
        PixelBuffer::new(data, width, height, ChannelLayout::Rgb8)
    }
}

impl Default for MockRenderSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSourcePort for MockRenderSource {
    fn current_viewport(&self) -> Option<ViewportHandle> {
        self.state.lock().unwrap().viewport
    }

    fn render_to_buffer(
        &self,
        viewport: &ViewportHandle,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, RenderError> {
        {
            let mut state = self.state.lock().unwrap();
            state.renders += 1;
            // Redirect the "camera" into an offscreen surface
            state.active_target = Some(viewport.id);
        }
        let _restore = ScopedRestore::new(|| {
            self.state.lock().unwrap().active_target = None;
        });

        if self.take_injected_failure() {
            return Err(RenderError::NoBuffer);
        }

        debug!(viewport = viewport.id, width, height, "Mock viewport render");
        self.solid_buffer(width, height)
    }

    fn capture_display_buffer(&self) -> Result<PixelBuffer, RenderError> {
        if self.take_injected_failure() {
            return Err(RenderError::NoBuffer);
        }
        let (width, height) = self.state.lock().unwrap().display_size;
        self.solid_buffer(width, height)
    }
}
