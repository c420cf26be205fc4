//! Directory tree rendering with per-file export listings.

mod style;
mod tree;

pub use style::Palette;
pub use tree::TreeRenderer;

use crate::ignore_rules::IgnoreRules;

/// Explicit configuration threaded through one traversal.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Deepest level whose contents are listed; `None` means unbounded.
    pub max_depth: Option<usize>,
    pub ignore: IgnoreRules,
    /// Emit ANSI colors.
    pub color: bool,
}

impl RenderOptions {
    /// Returns true when a directory found at `depth` may be listed.
    pub fn lists_depth(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth <= max)
    }
}
