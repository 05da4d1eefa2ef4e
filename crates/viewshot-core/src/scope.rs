//! Scoped restoration of transiently mutated render state
//!
//! Capturing a viewport redirects a camera into an offscreen surface and
//! flips the active render target. Both must be put back on every exit path,
//! including early error returns and panics mid-render. [`ScopedRestore`]
//! turns the paired mutate/restore calls into one scoped acquisition.

/// Runs a restore closure when dropped.
///
/// Adapters wrap the redirect-render-read-restore sequence in one of these
/// so the restore half cannot be skipped:
///
/// ```
/// use viewshot_core::scope::ScopedRestore;
///
/// let mut active_target = Some("offscreen");
/// {
///     let _restore = ScopedRestore::new(|| active_target = None);
///     // render and read back; any early return or panic still restores
/// }
/// assert!(active_target.is_none());
/// ```
pub struct ScopedRestore<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> ScopedRestore<F> {
    /// Arms a restore closure to run at scope exit
    pub fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }

    /// Runs the restore closure now instead of at scope exit
    pub fn restore_now(mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

impl<F: FnOnce()> Drop for ScopedRestore<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}
