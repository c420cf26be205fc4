use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use tree_sitter::{Node, Parser, Tree};

use crate::error::ExportTreeError;
use crate::shared::{ExportKind, ExportSymbol, SourceDialect, SyntaxError};

/// Represents a parsed ECMAScript source file backed by tree-sitter.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file on disk.
    pub file: PathBuf,
    /// The dialect the file was parsed as.
    pub dialect: SourceDialect,
    source: String,
    tree: Tree,
}

impl SourceFile {
    /// Creates a new `SourceFile` by reading and parsing the file on disk.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be read, parsed, or has an
    /// extension outside the ECMAScript family.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ExportTreeError> {
        let file = path.as_ref().to_path_buf();
        let dialect = SourceDialect::from_path(&file)
            .ok_or_else(|| ExportTreeError::UnsupportedDialect { path: file.clone() })?;

        let source = std::fs::read_to_string(&file).map_err(|source| ExportTreeError::Io {
            path: file.clone(),
            source,
        })?;

        Self::from_source(file, source, dialect)
    }

    /// Parses in-memory source text as if it were read from `path`.
    ///
    /// ## Errors
    /// Returns an error if the grammar cannot be loaded or tree-sitter gives
    /// up on the input.
    pub fn from_source<P: Into<PathBuf>, S: Into<String>>(
        path: P,
        source: S,
        dialect: SourceDialect,
    ) -> Result<Self, ExportTreeError> {
        let file = path.into();
        let source = source.into();

        let mut parser = Parser::new();
        parser
            .set_language(&dialect.tree_sitter_language())
            .map_err(|_| ExportTreeError::UnsupportedDialect { path: file.clone() })?;

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| ExportTreeError::ParseFailed { path: file.clone() })?;

        Ok(Self {
            file,
            dialect,
            source,
            tree,
        })
    }

    /// Returns true when tree-sitter had to recover from malformed input.
    pub fn has_syntax_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Lists error and missing nodes in document order.
    pub fn syntax_errors(&self) -> Vec<SyntaxError> {
        let mut errors = Vec::new();

        walk_document_order(self.tree.root_node(), |node| {
            if node.is_error() || node.is_missing() {
                let start = node.start_position();
                errors.push(SyntaxError {
                    line: start.row.saturating_add(1),
                    column: start.column.saturating_add(1),
                    missing: node.is_missing(),
                });
            }
        });

        errors
    }

    /// Provides the exported declarations of this file in document order.
    ///
    /// Every `export` statement in the tree is considered, including ones
    /// nested in namespace or ambient module bodies.
    ///
    /// ## Errors
    /// Returns `ParseFailed` when the file contains syntax errors, since a
    /// recovered tree cannot be trusted to reflect the author's exports.
    pub fn exports(&self) -> Result<Vec<ExportSymbol>, ExportTreeError> {
        if self.has_syntax_errors() {
            return Err(ExportTreeError::ParseFailed {
                path: self.file.clone(),
            });
        }

        let source = self.source.as_bytes();
        let mut exports = Vec::new();

        walk_document_order(self.tree.root_node(), |node| {
            let Some(declaration) = ExportDeclaration::classify(node) else {
                return;
            };

            let kind = declaration.kind();
            for name_node in declaration.name_nodes() {
                let symbol = ExportSymbol {
                    name: export_name_text(name_node, source),
                    kind,
                    line: name_node.start_position().row.saturating_add(1),
                };
                trace!(export = %symbol.name, kind = %symbol.kind, line = symbol.line, "export");
                exports.push(symbol);
            }
        });

        debug!(
            file = %self.file.display(),
            dialect = %self.dialect,
            count = exports.len(),
            "collected exports"
        );

        Ok(exports)
    }

    /// Provides only the exported names, in document order.
    ///
    /// ## Errors
    /// See [`SourceFile::exports`].
    pub fn exported_names(&self) -> Result<Vec<String>, ExportTreeError> {
        Ok(self
            .exports()?
            .into_iter()
            .map(|export| export.name)
            .collect())
    }
}

/// The closed set of export-carrying declaration shapes.
///
/// Each variant holds the node that owns the exported name(s): the
/// `export_clause` for export lists, the declaration itself otherwise.
#[derive(Debug, Clone, Copy)]
enum ExportDeclaration<'tree> {
    ExportList(Node<'tree>),
    Function(Node<'tree>),
    VariableStatement(Node<'tree>),
    Class(Node<'tree>),
    Interface(Node<'tree>),
    TypeAlias(Node<'tree>),
}

impl<'tree> ExportDeclaration<'tree> {
    fn classify(node: Node<'tree>) -> Option<Self> {
        if node.kind() != "export_statement" {
            return None;
        }

        if let Some(clause) = find_child_by_kind(node, "export_clause") {
            return Some(Self::ExportList(clause));
        }

        // `export default <expression>` has a value, not a declaration
        let declaration = node.child_by_field_name("declaration")?;
        let declaration = if declaration.kind() == "ambient_declaration" {
            declaration.named_child(0)?
        } else {
            declaration
        };

        match declaration.kind() {
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                Some(Self::Function(declaration))
            }
            "lexical_declaration" | "variable_declaration" => {
                Some(Self::VariableStatement(declaration))
            }
            "class_declaration" | "abstract_class_declaration" => Some(Self::Class(declaration)),
            "interface_declaration" => Some(Self::Interface(declaration)),
            "type_alias_declaration" => Some(Self::TypeAlias(declaration)),
            _ => None,
        }
    }

    fn kind(&self) -> ExportKind {
        match self {
            Self::ExportList(_) => ExportKind::ExportList,
            Self::Function(_) => ExportKind::Function,
            Self::VariableStatement(_) => ExportKind::Variable,
            Self::Class(_) => ExportKind::Class,
            Self::Interface(_) => ExportKind::Interface,
            Self::TypeAlias(_) => ExportKind::TypeAlias,
        }
    }

    fn name_nodes(&self) -> Vec<Node<'tree>> {
        match *self {
            Self::ExportList(clause) => {
                let mut cursor = clause.walk();
                let names = clause
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() == "export_specifier")
                    .filter_map(|specifier| {
                        specifier
                            .child_by_field_name("alias")
                            .or_else(|| specifier.child_by_field_name("name"))
                    })
                    .collect();
                names
            }
            Self::VariableStatement(statement) => {
                let mut cursor = statement.walk();
                let names = statement
                    .named_children(&mut cursor)
                    .filter(|child| child.kind() == "variable_declarator")
                    .filter_map(|declarator| declarator.child_by_field_name("name"))
                    // destructuring patterns are not expanded
                    .filter(|name| name.kind() == "identifier")
                    .collect();
                names
            }
            Self::Function(declaration)
            | Self::Class(declaration)
            | Self::Interface(declaration)
            | Self::TypeAlias(declaration) => {
                declaration.child_by_field_name("name").into_iter().collect()
            }
        }
    }
}

/// Visits every node of the subtree in pre-order, document order.
fn walk_document_order<'tree>(root: Node<'tree>, mut visit: impl FnMut(Node<'tree>)) {
    let mut cursor = root.walk();

    loop {
        visit(cursor.node());

        if cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Reads a name node, unquoting `export { x as "quoted name" }` forms.
fn export_name_text(node: Node<'_>, source: &[u8]) -> String {
    if node.kind() == "string" {
        return string_contents(node, source);
    }

    node.utf8_text(source).unwrap_or_default().to_string()
}

/// Returns the text between a string literal's delimiters.
///
/// Only the outer quote tokens are dropped, so quotes inside the literal
/// (`"a'"`) survive.
fn string_contents(node: Node<'_>, source: &[u8]) -> String {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();

    let (Some(open), Some(close)) = (children.first(), children.last()) else {
        return String::new();
    };
    if open.id() == close.id() {
        return String::new();
    }

    source
        .get(open.end_byte()..close.start_byte())
        .map(|inner| String::from_utf8_lossy(inner).into_owned())
        .unwrap_or_default()
}

/// Finds the first child node with the given kind.
fn find_child_by_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|child| child.kind() == kind)
}
