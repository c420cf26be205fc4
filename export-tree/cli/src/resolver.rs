//! Starting-path resolution: from the command line, or from an interactive
//! prompt with Tab completion of filesystem paths.

use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use export_tree_lib::ExportTreeError;
use inquire::autocompletion::{Autocomplete, Replacement};
use inquire::{CustomUserError, Text};

/// Produces the (not yet validated) directory to start from.
pub trait PathResolver {
    fn resolve(&mut self) -> Result<PathBuf, ExportTreeError>;
}

/// Uses a path given on the command line.
#[derive(Debug, Clone)]
pub struct ArgumentResolver {
    path: PathBuf,
}

impl ArgumentResolver {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl PathResolver for ArgumentResolver {
    fn resolve(&mut self) -> Result<PathBuf, ExportTreeError> {
        Ok(self.path.clone())
    }
}

/// Asks for a path on the terminal. An empty answer means the current
/// directory.
#[derive(Debug, Clone)]
pub struct PromptResolver {
    message: String,
}

impl Default for PromptResolver {
    fn default() -> Self {
        Self {
            message: "Enter the path to start from (press Tab for autocomplete):".to_string(),
        }
    }
}

impl PathResolver for PromptResolver {
    fn resolve(&mut self) -> Result<PathBuf, ExportTreeError> {
        let answer = Text::new(&self.message)
            .with_autocomplete(PathCompleter)
            .prompt()
            .map_err(|error| ExportTreeError::Prompt(error.to_string()))?;

        let answer = answer.trim();
        if answer.is_empty() {
            Ok(PathBuf::from("."))
        } else {
            Ok(PathBuf::from(answer))
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PathCompleter;

impl Autocomplete for PathCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(complete_path(input))
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        if highlighted_suggestion.is_some() {
            return Ok(highlighted_suggestion);
        }

        let candidates = complete_path(input);
        let prefix = common_prefix(&candidates);
        if prefix.len() > input.len() {
            Ok(Some(prefix))
        } else {
            Ok(None)
        }
    }
}

/// Lists entries of the typed line's directory whose names start with the
/// typed base name. Directories get a trailing separator.
pub fn complete_path(line: &str) -> Vec<String> {
    let (dir, base) = match line.rfind(['/', MAIN_SEPARATOR]) {
        Some(index) => line.split_at(index + 1),
        None => ("", line),
    };

    let search_dir = if dir.is_empty() {
        Path::new(".")
    } else {
        Path::new(dir)
    };

    let Ok(entries) = fs::read_dir(search_dir) else {
        return Vec::new();
    };

    let mut candidates: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(base) {
                return None;
            }
            let is_dir = entry.file_type().is_ok_and(|file_type| file_type.is_dir());
            let suffix = if is_dir { "/" } else { "" };
            Some(format!("{dir}{name}{suffix}"))
        })
        .collect();

    candidates.sort();
    candidates
}

fn common_prefix(candidates: &[String]) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };

    let mut prefix = first.as_str();
    for candidate in rest {
        let shared = prefix
            .char_indices()
            .zip(candidate.chars())
            .find(|((_, left), right)| left != right)
            .map_or(prefix.len().min(candidate.len()), |((index, _), _)| index);
        prefix = &prefix[..shared];
    }

    prefix.to_string()
}
