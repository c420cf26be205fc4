use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ExportTreeError;
use crate::file::source_file::SourceFile;
use crate::ignore_rules::IgnoreRules;
use crate::render::RenderOptions;
use crate::render::style::Palette;
use crate::shared::SourceDialect;

const TEE: &str = "├── ";
const CORNER: &str = "└── ";
const BAR: &str = "│   ";
const BLANK: &str = "    ";

/// Writes a directory tree, annotating source files with their exports.
///
/// Entries are listed in the order the filesystem returns them. A nested
/// directory that cannot be read is annotated inline and skipped; only a
/// failure on the starting directory or on the output aborts the render.
pub struct TreeRenderer<W: Write> {
    options: RenderOptions,
    palette: Palette,
    out: W,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
    Other,
}

#[derive(Debug)]
struct Entry {
    name: String,
    path: PathBuf,
    kind: EntryKind,
}

impl<W: Write> TreeRenderer<W> {
    pub fn new(options: RenderOptions, out: W) -> Self {
        let palette = Palette::new(options.color);
        Self {
            options,
            palette,
            out,
        }
    }

    /// Renders the tree below `root`, which is depth 0.
    ///
    /// ## Errors
    /// Returns an error if `root` cannot be listed or the output cannot be
    /// written.
    pub fn render(&mut self, root: &Path) -> Result<(), ExportTreeError> {
        let entries = list_entries(root, &self.options.ignore)?;
        self.render_entries(&entries, "", 0)
    }

    /// Consumes the renderer and returns the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_entries(
        &mut self,
        entries: &[Entry],
        prefix: &str,
        depth: usize,
    ) -> Result<(), ExportTreeError> {
        debug!(depth, count = entries.len(), "rendering entries");

        for (index, entry) in entries.iter().enumerate() {
            let is_last = index + 1 == entries.len();
            let line_prefix = format!("{prefix}{}", connector(is_last));
            let child_prefix = format!("{prefix}{}", continuation(is_last));

            match entry.kind {
                EntryKind::Directory => {
                    self.render_directory(entry, &line_prefix, &child_prefix, depth + 1)?;
                }
                EntryKind::File => {
                    let name = self.palette.file(&entry.name);
                    self.emit(&format!("{line_prefix}{name}"))?;
                    self.render_exports(&entry.path, &child_prefix)?;
                }
                EntryKind::Other => {
                    let name = self.palette.other(&entry.name);
                    self.emit(&format!("{line_prefix}{name}"))?;
                }
            }
        }

        Ok(())
    }

    fn render_directory(
        &mut self,
        entry: &Entry,
        line_prefix: &str,
        child_prefix: &str,
        child_depth: usize,
    ) -> Result<(), ExportTreeError> {
        let name = self.palette.directory(&entry.name);

        if !self.options.lists_depth(child_depth) {
            return self.emit(&format!("{line_prefix}{name}"));
        }

        match list_entries(&entry.path, &self.options.ignore) {
            Ok(children) => {
                self.emit(&format!("{line_prefix}{name}"))?;
                self.render_entries(&children, child_prefix, child_depth)
            }
            Err(error) => {
                warn!(path = %entry.path.display(), %error, "skipping unreadable directory");
                let note = self.palette.error(&format!("[{}]", io_reason(&error)));
                self.emit(&format!("{line_prefix}{name} {note}"))
            }
        }
    }

    fn render_exports(&mut self, path: &Path, child_prefix: &str) -> Result<(), ExportTreeError> {
        if SourceDialect::from_path(path).is_none() {
            return Ok(());
        }

        let names = exported_names(path);
        if names.is_empty() {
            return Ok(());
        }

        let export_prefix = format!("{child_prefix}{BLANK}");
        let label = self.palette.label("Exports:");
        self.emit(&format!("{export_prefix}{label}"))?;

        for (index, name) in names.iter().enumerate() {
            let is_last = index + 1 == names.len();
            let line = self.palette.export(&format!("{}{name}", connector(is_last)));
            self.emit(&format!("{export_prefix}{line}"))?;
        }

        Ok(())
    }

    fn emit(&mut self, line: &str) -> Result<(), ExportTreeError> {
        writeln!(self.out, "{line}").map_err(|source| ExportTreeError::Io {
            path: PathBuf::from("<output>"),
            source,
        })
    }
}

fn connector(is_last: bool) -> &'static str {
    if is_last { CORNER } else { TEE }
}

fn continuation(is_last: bool) -> &'static str {
    if is_last { BLANK } else { BAR }
}

/// Parses `path` and returns its export names, or nothing if it cannot be
/// read or parsed.
fn exported_names(path: &Path) -> Vec<String> {
    let file = match SourceFile::new(path) {
        Ok(file) => file,
        Err(error) => {
            warn!(file = %path.display(), %error, "listing no exports");
            return Vec::new();
        }
    };

    match file.exported_names() {
        Ok(names) => names,
        Err(ExportTreeError::ParseFailed { .. }) => {
            let first = file.syntax_errors().into_iter().next();
            warn!(
                file = %path.display(),
                error = ?first.map(|error| error.to_string()),
                "listing no exports for malformed file"
            );
            Vec::new()
        }
        Err(error) => {
            warn!(file = %path.display(), %error, "listing no exports");
            Vec::new()
        }
    }
}

fn list_entries(dir: &Path, ignore: &IgnoreRules) -> Result<Vec<Entry>, ExportTreeError> {
    let io_error = |source| ExportTreeError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if ignore.should_ignore(&name) {
            continue;
        }

        // file_type does not follow symlinks
        let kind = match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => EntryKind::Directory,
            Ok(file_type) if file_type.is_file() => EntryKind::File,
            _ => EntryKind::Other,
        };

        entries.push(Entry {
            name,
            path: entry.path(),
            kind,
        });
    }

    Ok(entries)
}

fn io_reason(error: &ExportTreeError) -> String {
    match error {
        ExportTreeError::Io { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}
