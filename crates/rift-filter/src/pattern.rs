//! A single gitignore-style exclusion pattern.
//!
//! Matching rules, in precedence order:
//!
//! 1. A trailing `/` makes the pattern directory-only. It never matches a
//!    file, whatever the rest of the pattern says.
//! 2. A leading `**/` matches at any depth: the remainder is tested against
//!    every component suffix of the path and against every single component.
//! 3. A pattern without `/` is unrooted: it matches if any path component
//!    (the basename included) matches.
//! 4. Any other pattern is rooted: one optional leading `/` is dropped and the
//!    whole relative path must match.
//!
//! Globs follow shell rules: `*` never crosses a `/`, `?` is one character,
//! and bracket classes are supported. Braces are literal characters, not
//! alternation. A `**` inside a rooted pattern spans any number of
//! components. Negation (`!`) is not interpreted here.

use std::fmt;

use globset::{GlobBuilder, GlobMatcher};

use crate::PatternError;

const DOUBLE_STAR_PREFIX: &str = "**/";

/// A compiled exclusion pattern.
#[derive(Debug, Clone)]
pub struct ExclusionPattern {
    raw: String,
    matcher: GlobMatcher,
}

impl ExclusionPattern {
    /// Compile a raw pattern.
    pub fn new(raw: impl Into<String>) -> Result<Self, PatternError> {
        let raw = normalize_separators(raw.into());
        let glob = escape_braces(glob_text(&raw));
        let matcher = GlobBuilder::new(&glob)
            .literal_separator(true)
            .backslash_escape(!cfg!(windows))
            .build()
            .map_err(|source| PatternError::new(raw.clone(), source))?
            .compile_matcher();
        Ok(Self { raw, matcher })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Trailing separator present: only directories can match.
    pub fn is_dir_only(&self) -> bool {
        self.raw.ends_with('/')
    }

    /// Begins with `**/`: matches at any depth.
    pub fn is_double_star_prefixed(&self) -> bool {
        body(&self.raw).starts_with(DOUBLE_STAR_PREFIX)
    }

    /// Contains an internal separator: anchored at the tree root.
    pub fn is_rooted(&self) -> bool {
        !self.is_double_star_prefixed() && body(&self.raw).contains('/')
    }

    /// Check whether a `/`-separated relative path matches this pattern.
    pub fn matches(&self, relative: &str, is_dir: bool) -> bool {
        if self.is_dir_only() && !is_dir {
            return false;
        }

        if self.is_double_star_prefixed() {
            component_starts(relative).any(|start| {
                let suffix = &relative[start..];
                let component = suffix.split('/').next().unwrap_or(suffix);
                self.matcher.is_match(suffix) || self.matcher.is_match(component)
            })
        } else if self.is_rooted() {
            self.matcher.is_match(relative)
        } else {
            // The basename is the last component, so this covers both.
            relative.split('/').any(|part| self.matcher.is_match(part))
        }
    }
}

impl fmt::Display for ExclusionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The pattern with its directory-only marker removed.
fn body(raw: &str) -> &str {
    raw.strip_suffix('/').unwrap_or(raw)
}

/// The text handed to the glob compiler for a raw pattern.
fn glob_text(raw: &str) -> &str {
    let body = body(raw);
    if let Some(suffix) = body.strip_prefix(DOUBLE_STAR_PREFIX) {
        suffix
    } else if body.contains('/') {
        body.strip_prefix('/').unwrap_or(body)
    } else {
        body
    }
}

/// Rewrite `{` and `}` outside bracket classes as one-character classes so
/// the glob compiler never sees an alternation.
fn escape_braces(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len());
    let mut chars = glob.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' if !cfg!(windows) => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
                // A leading `]` (after an optional negation) is a member.
                if let Some(&neg @ ('!' | '^')) = chars.peek() {
                    out.push(neg);
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '{' | '}' if !in_class => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Byte offsets where each component of a relative path starts.
fn component_starts(relative: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0).chain(relative.match_indices('/').map(|(i, _)| i + 1))
}

#[cfg(windows)]
fn normalize_separators(raw: String) -> String {
    raw.replace('\\', "/")
}

#[cfg(not(windows))]
fn normalize_separators(raw: String) -> String {
    raw
}
