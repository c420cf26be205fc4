//! Entry-name exclusion rules.
//!
//! Each rule is a regular expression fragment matched anywhere inside an
//! entry name, so `.git` also hides `.github` and `.gitignore`.

use regex::Regex;

use crate::error::ExportTreeError;

/// Patterns that are always ignored, whatever the user passes.
pub const DEFAULT_IGNORE_PATTERNS: [&str; 5] =
    ["node_modules", ".git", ".husky", "coverage", ".next"];

/// The compiled set of ignore patterns for one run.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    rules: Vec<Regex>,
}

impl IgnoreRules {
    /// Compiles exactly the given patterns, without the defaults.
    ///
    /// ## Errors
    /// Returns `InvalidPattern` for the first pattern that is not a valid
    /// regular expression.
    pub fn new<I, S>(patterns: I) -> Result<Self, ExportTreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| ExportTreeError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Compiles the default patterns followed by `extra`.
    ///
    /// ## Errors
    /// Returns `InvalidPattern` if any user pattern fails to compile.
    pub fn with_defaults<I, S>(extra: I) -> Result<Self, ExportTreeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|pattern| pattern.to_string())
            .chain(extra.into_iter().map(|pattern| pattern.as_ref().to_string()))
            .collect();

        Self::new(patterns)
    }

    /// Returns true when any rule matches somewhere in `name`.
    pub fn should_ignore(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(name))
    }

    /// Returns the source text of every rule, in order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(Regex::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        let rules = DEFAULT_IGNORE_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();
        Self { rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_hide_tooling_directories() {
        let rules = IgnoreRules::default();
        assert_eq!(rules.len(), DEFAULT_IGNORE_PATTERNS.len());
        assert!(rules.should_ignore("node_modules"));
        assert!(rules.should_ignore(".git"));
        assert!(rules.should_ignore(".husky"));
        assert!(rules.should_ignore("coverage"));
        assert!(rules.should_ignore(".next"));
        assert!(!rules.should_ignore("src"));
    }

    #[test]
    fn patterns_match_substrings() {
        let rules = IgnoreRules::new(["dist"]).unwrap();
        assert!(rules.should_ignore("dist"));
        assert!(rules.should_ignore("old-dist-backup"));
        assert!(!rules.should_ignore("dis"));
    }

    #[test]
    fn unescaped_dot_is_a_wildcard() {
        let rules = IgnoreRules::default();
        // `.git` is a regex, so any character may stand in for the dot
        assert!(rules.should_ignore("legit"));
        assert!(rules.should_ignore(".github"));
    }

    #[test]
    fn anchors_are_honored() {
        let rules = IgnoreRules::new([r"\.log$", "^tmp"]).unwrap();
        assert!(rules.should_ignore("server.log"));
        assert!(!rules.should_ignore("server.log.gz"));
        assert!(rules.should_ignore("tmpdir"));
        assert!(!rules.should_ignore("my-tmp"));
    }

    #[test]
    fn user_patterns_extend_defaults() {
        let rules = IgnoreRules::with_defaults(["target"]).unwrap();
        assert_eq!(rules.len(), DEFAULT_IGNORE_PATTERNS.len() + 1);
        assert!(rules.should_ignore("target"));
        assert!(rules.should_ignore("node_modules"));
        assert_eq!(rules.patterns().last(), Some("target"));
    }

    #[test]
    fn empty_rule_set_ignores_nothing() {
        let rules = IgnoreRules::new(Vec::<String>::new()).unwrap();
        assert!(rules.is_empty());
        assert!(!rules.should_ignore("node_modules"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let error = IgnoreRules::with_defaults(["(unclosed"]).unwrap_err();
        match error {
            ExportTreeError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
