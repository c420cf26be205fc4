use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by export-tree operations.
#[derive(Debug, Error)]
pub enum ExportTreeError {
    #[error("Failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The path \"{path}\" does not exist.")]
    PathNotFound { path: PathBuf },

    #[error("\"{path}\" is not a directory.")]
    NotADirectory { path: PathBuf },

    #[error("Unsupported source dialect for `{path}`")]
    UnsupportedDialect { path: PathBuf },

    #[error("Failed to parse `{path}`")]
    ParseFailed { path: PathBuf },

    #[error("Invalid ignore pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(String),
}
