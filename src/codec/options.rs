//! Decoder configuration.

/// Default limit on compound nesting, counting the root compound as depth 1.
///
/// Decoding recurses once per level, so the limit must leave headroom on a
/// 2 MiB thread stack (the default for spawned threads and tokio workers) in
/// unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options controlling how untrusted input is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    max_depth: usize,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum compound nesting depth. Deeper input fails with
    /// `DepthLimitExceeded` instead of exhausting the stack. Raising it above
    /// the default is only safe on threads with a larger stack.
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}
