//! Ordered collections of exclusion patterns.

use std::path::Path;

use crate::gitignore;
use crate::pattern::ExclusionPattern;
use crate::PatternError;

/// Patterns excluded from every sync, ahead of anything user-supplied.
pub const DEFAULT_EXCLUDES: &[&str] = &[".git"];

/// An immutable set of exclusion patterns.
///
/// Evaluation is a logical OR: order only affects which pattern is reported
/// by [`PatternSet::first_match`], never whether a path is excluded.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<ExclusionPattern>,
}

impl PatternSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every pattern, failing on the first invalid glob.
    pub fn try_from_patterns<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(ExclusionPattern::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Compile every pattern, dropping (and logging) invalid globs.
    ///
    /// An invalid glob can never match a path, so dropping it leaves the
    /// exclusion result unchanged.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for pattern in patterns {
            set.push(pattern);
        }
        set
    }

    /// Build the set for a project root: the default excludes, then the
    /// root's `.gitignore` (if readable), then `extra`.
    pub fn from_project<I, S>(root: &Path, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::from_patterns(DEFAULT_EXCLUDES.iter().copied());

        let ignore_file = root.join(gitignore::GITIGNORE_FILE);
        match gitignore::load_gitignore(&ignore_file) {
            Ok(lines) => {
                tracing::debug!(
                    path = %ignore_file.display(),
                    count = lines.len(),
                    "loaded ignore file"
                );
                for line in lines {
                    set.push(line);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %ignore_file.display(),
                    error = %e,
                    "ignore file unreadable, skipping"
                );
            }
        }

        for pattern in extra {
            set.push(pattern);
        }
        set
    }

    /// Append a pattern. Invalid globs are logged and dropped.
    pub fn push(&mut self, raw: impl Into<String>) {
        match ExclusionPattern::new(raw) {
            Ok(pattern) => self.patterns.push(pattern),
            Err(e) => {
                tracing::warn!(pattern = e.pattern(), error = %e, "ignoring exclusion pattern")
            }
        }
    }

    /// Check whether a `/`-separated relative path is excluded.
    pub fn should_exclude(&self, relative: &str, is_dir: bool) -> bool {
        self.first_match(relative, is_dir).is_some()
    }

    /// The first pattern, in set order, that excludes the path.
    pub fn first_match(&self, relative: &str, is_dir: bool) -> Option<&ExclusionPattern> {
        self.patterns.iter().find(|p| p.matches(relative, is_dir))
    }

    /// The compiled patterns in set order.
    pub fn patterns(&self) -> &[ExclusionPattern] {
        &self.patterns
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if the set has no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Check one path against one raw pattern.
///
/// A pattern that does not compile matches nothing.
pub fn matches(relative: &str, pattern: &str, is_dir: bool) -> bool {
    ExclusionPattern::new(pattern).is_ok_and(|p| p.matches(&to_slash(relative), is_dir))
}

/// Check one path against raw patterns: true if any of them matches.
pub fn should_exclude<S: AsRef<str>>(relative: &str, patterns: &[S], is_dir: bool) -> bool {
    let relative = to_slash(relative);
    patterns.iter().any(|p| {
        ExclusionPattern::new(p.as_ref()).is_ok_and(|p| p.matches(&relative, is_dir))
    })
}

#[cfg(windows)]
fn to_slash(relative: &str) -> String {
    relative.replace('\\', "/")
}

#[cfg(not(windows))]
fn to_slash(relative: &str) -> String {
    relative.to_string()
}
