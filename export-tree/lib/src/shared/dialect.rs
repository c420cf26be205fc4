use std::fmt;
use std::path::Path;

use tree_sitter::Language;

/// ECMAScript dialects whose exports can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceDialect {
    JavaScript,
    TypeScript,
    Tsx,
}

impl SourceDialect {
    const ALL: [Self; 3] = [Self::JavaScript, Self::TypeScript, Self::Tsx];

    /// Returns a human-readable name for the dialect.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Tsx => "TSX",
        }
    }

    /// Returns file extensions associated with the dialect.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::JavaScript => &["js", "mjs", "cjs", "jsx"],
            Self::TypeScript => &["ts", "mts", "cts"],
            Self::Tsx => &["tsx"],
        }
    }

    /// Maps a file extension to a supported dialect.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dialect| {
            dialect
                .extensions()
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(extension))
        })
    }

    /// Detects the dialect from a filesystem path.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        Self::from_extension(extension)
    }

    /// Returns the tree-sitter grammar for the dialect.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl fmt::Display for SourceDialect {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}
