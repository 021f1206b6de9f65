//! Parser configuration.

/// Limits applied while parsing.
///
/// Recursive descent uses one stack frame per open container, so deeply
/// nested input is rejected once `max_depth` is exceeded rather than
/// exhausting the call stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of simultaneously open arrays/objects.
    pub max_depth: usize,
}

impl ParseOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    pub const fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// No depth limit. Adversarial input can overflow the stack.
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
