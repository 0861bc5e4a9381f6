//! Include/exclude selection of remote paths
//!
//! Patterns have exactly two forms. A pattern starting with `*` matches
//! paths ending with the rest of the pattern (`*.safetensors`). Anything
//! else matches paths containing it (`text_encoder/`). There is no general
//! glob support: `*` anywhere but the front is a literal character.

use std::fmt;

/// Marker that turns a pattern into a suffix match
pub const WILDCARD: char = '*';

/// A single include or exclude pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Leading-wildcard pattern; holds the text after the `*`
    Suffix(String),
    /// Any other pattern; matched by substring containment
    Contains(String),
}

impl Pattern {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(WILDCARD) {
            Some(rest) => Pattern::Suffix(rest.to_string()),
            None => Pattern::Contains(raw.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Pattern::Suffix(suffix) => path.ends_with(suffix.as_str()),
            Pattern::Contains(needle) => path.contains(needle.as_str()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Suffix(suffix) => write!(f, "{}{}", WILDCARD, suffix),
            Pattern::Contains(needle) => f.write_str(needle),
        }
    }
}

/// Include and exclude pattern sets
///
/// An empty include set lets every path through the include stage; an
/// empty exclude set excludes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRules {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl FilterRules {
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            include: include.into_iter().map(|p| Pattern::parse(p.as_ref())).collect(),
            exclude: exclude.into_iter().map(|p| Pattern::parse(p.as_ref())).collect(),
        }
    }

    pub fn include(&self) -> &[Pattern] {
        &self.include
    }

    pub fn exclude(&self) -> &[Pattern] {
        &self.exclude
    }

    /// Whether a remote path is in scope
    pub fn passes(&self, path: &str) -> bool {
        passes_filter(path, &self.include, &self.exclude)
    }
}

/// Whether a path names a hidden file or lives under a hidden directory
pub fn is_hidden(path: &str) -> bool {
    path.starts_with('.') || path.contains("/.")
}

/// Decide whether a remote path is in scope
///
/// Hidden paths are always rejected. Then the path must match an include
/// pattern (when there are any) and must not match an exclude pattern.
pub fn passes_filter(path: &str, include: &[Pattern], exclude: &[Pattern]) -> bool {
    if is_hidden(path) {
        return false;
    }

    if !include.is_empty() && !include.iter().any(|p| p.matches(path)) {
        return false;
    }

    if exclude.iter().any(|p| p.matches(path)) {
        return false;
    }

    true
}
