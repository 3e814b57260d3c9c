//! Sync configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for one sync run: the source root, the destination root and
/// the exclusion patterns applied to the source.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SyncConfig {
    /// Root of the tree to mirror.
    pub source: PathBuf,

    /// Root of the mirror. Created if missing.
    pub destination: PathBuf,

    /// Exclusion patterns (gitignore syntax, negations already removed).
    #[builder(default)]
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Apply source permission bits to created directories and files.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub preserve_permissions: bool,

    /// Refuse to run when one root lies inside the other.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub reject_overlap: bool,
}

fn default_true() -> bool {
    true
}

impl SyncConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.source {
            Some(ref source) if source.as_os_str().is_empty() => {
                return Err("Source path cannot be empty".to_string());
            }
            None => return Err("Source path is required".to_string()),
            _ => {}
        }
        match self.destination {
            Some(ref dest) if dest.as_os_str().is_empty() => {
                Err("Destination path cannot be empty".to_string())
            }
            None => Err("Destination path is required".to_string()),
            _ => Ok(()),
        }
    }
}

impl SyncConfig {
    /// Create a new sync config builder.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Create a simple config mirroring `source` into `destination`.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            exclude_patterns: Vec::new(),
            preserve_permissions: true,
            reject_overlap: true,
        }
    }

    /// Replace the exclusion patterns.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = SyncConfig::builder()
            .source("/home/user/project")
            .destination("/backup/project")
            .exclude_patterns(vec!["*.log".to_string()])
            .build()
            .unwrap();

        assert_eq!(config.source, PathBuf::from("/home/user/project"));
        assert_eq!(config.destination, PathBuf::from("/backup/project"));
        assert_eq!(config.exclude_patterns, vec!["*.log".to_string()]);
        assert!(config.preserve_permissions);
        assert!(config.reject_overlap);
    }

    #[test]
    fn test_config_builder_requires_roots() {
        assert!(SyncConfig::builder().destination("/backup").build().is_err());
        assert!(SyncConfig::builder().source("/src").build().is_err());
        assert!(SyncConfig::builder()
            .source("")
            .destination("/backup")
            .build()
            .is_err());
    }

    #[test]
    fn test_config_simple() {
        let config = SyncConfig::new("/src", "/dest").with_patterns(["target/", "*.tmp"]);
        assert_eq!(config.exclude_patterns.len(), 2);
        assert!(config.reject_overlap);
    }
}
