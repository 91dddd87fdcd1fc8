//! Per-invocation session context.

/// Display state shared by the prompt loop and the renderer.
///
/// Constructed once per process invocation and passed explicitly; the
/// `x` and `d` prompt commands flip these flags at runtime.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    /// Show the full result URL under each title.
    pub expand: bool,
    /// Emit debug diagnostics.
    pub debug: bool,
}

impl SessionContext {
    /// Creates a context from the resolved startup settings.
    pub fn new(expand: bool, debug: bool) -> Self {
        Self { expand, debug }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(false, false)
    }
}
