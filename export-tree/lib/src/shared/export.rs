use std::fmt;

/// The declaration shape an export name was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// A specifier inside `export { ... }`.
    ExportList,
    Function,
    Variable,
    Class,
    Interface,
    TypeAlias,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ExportList => "export list",
            Self::Function => "function",
            Self::Variable => "variable",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::TypeAlias => "type alias",
        };
        formatter.write_str(label)
    }
}

/// A name exported from a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSymbol {
    pub name: String,
    pub kind: ExportKind,
    /// 1-based line of the exported name.
    pub line: usize,
}

/// A parse error or missing node reported by tree-sitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub missing: bool,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.missing {
            "missing syntax node"
        } else {
            "syntax error"
        };
        write!(formatter, "{label} at {}:{}", self.line, self.column)
    }
}
