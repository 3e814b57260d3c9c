//! `.gitignore` reading.
//!
//! Only the subset the matcher understands is kept: blank lines and `#`
//! comments are dropped, and so are `!` negations.

use std::fs;
use std::io;
use std::path::Path;

/// Name of the ignore file read from the source root.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Extract exclusion patterns from ignore-file content, in file order.
pub fn parse_gitignore(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .map(String::from)
        .collect()
}

/// Read and parse an ignore file.
pub fn load_gitignore(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_gitignore(&content))
}
