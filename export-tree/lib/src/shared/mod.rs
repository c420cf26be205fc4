mod dialect;
mod export;

pub use dialect::SourceDialect;
pub use export::{ExportKind, ExportSymbol, SyntaxError};
