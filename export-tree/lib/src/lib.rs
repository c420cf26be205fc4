pub mod error;
pub mod file;
pub mod ignore_rules;
pub mod render;
pub mod shared;
pub mod start_dir;

pub use error::ExportTreeError;
pub use file::source_file::SourceFile;
pub use ignore_rules::{DEFAULT_IGNORE_PATTERNS, IgnoreRules};
pub use render::{Palette, RenderOptions, TreeRenderer};
pub use shared::*;
pub use start_dir::resolve_start_dir;
