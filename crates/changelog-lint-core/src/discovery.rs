//! Changelog file discovery.

use crate::config::{default_include, AnalyzerConfig};
use crate::manager::ChangelogFile;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors during file discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Directory walk failed.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Invalid include or exclude pattern.
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The root does not exist.
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Which files count as changelogs.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Glob patterns (relative to the root) a file must match.
    pub include: Vec<String>,
    /// Glob patterns (relative to the root) that drop a file.
    pub exclude: Vec<String>,
    /// Whether `.gitignore` files are honoured.
    pub respect_gitignore: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: Vec::new(),
            respect_gitignore: true,
        }
    }
}

impl From<&AnalyzerConfig> for DiscoveryOptions {
    fn from(config: &AnalyzerConfig) -> Self {
        Self {
            include: config.include.clone(),
            exclude: config.exclude.clone(),
            respect_gitignore: config.respect_gitignore,
        }
    }
}

/// Compiled include/exclude patterns.
struct Matcher {
    include: Vec<glob::Pattern>,
    exclude: Vec<glob::Pattern>,
}

impl Matcher {
    fn new(options: &DiscoveryOptions) -> Result<Self, glob::PatternError> {
        let compile = |patterns: &[String]| {
            patterns
                .iter()
                .map(|p| glob::Pattern::new(p))
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self {
            include: compile(&options.include)?,
            exclude: compile(&options.exclude)?,
        })
    }

    fn accepts(&self, relative: &str) -> bool {
        let included = self.include.iter().any(|p| matches(p, relative));
        included && !self.exclude.iter().any(|p| matches(p, relative))
    }
}

/// Matches a pattern, also letting a leading `**/` match zero directories.
fn matches(pattern: &glob::Pattern, relative: &str) -> bool {
    if pattern.matches(relative) {
        return true;
    }
    pattern
        .as_str()
        .strip_prefix("**/")
        .and_then(|rest| glob::Pattern::new(rest).ok())
        .is_some_and(|p| p.matches(relative))
}

/// Finds changelog files under `root`, sorted by path.
///
/// A `root` that is itself a file is returned as-is when its format is
/// known, regardless of the include patterns.
///
/// # Errors
///
/// Returns an error if the root does not exist, a pattern is invalid, or
/// the directory walk fails.
pub fn discover(root: &Path, options: &DiscoveryOptions) -> Result<Vec<ChangelogFile>, DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::NotFound(root.to_path_buf()));
    }
    if root.is_file() {
        return Ok(ChangelogFile::from_path(root).into_iter().collect());
    }

    let matcher = Matcher::new(options)?;

    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(options.respect_gitignore)
        .filter_entry(|entry| entry.file_name() != ".git");

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        if !matcher.accepts(&relative) {
            continue;
        }

        match ChangelogFile::from_path(path) {
            Ok(file) => files.push(file),
            Err(_) => debug!("Skipping {relative}: unknown format"),
        }
    }

    files.sort();
    debug!("Discovered {} changelog file(s)", files.len());
    Ok(files)
}
