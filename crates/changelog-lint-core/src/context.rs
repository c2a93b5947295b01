//! Context passed to rules while a file is validated.

use crate::format::Format;
use crate::policy::AncestorPolicy;
use std::path::{Path, PathBuf};

/// Context provided to every rule for the file under validation.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path of the file as discovered.
    pub path: &'a Path,
    /// Path relative to the analysis root; used in messages and exclusions.
    pub relative_path: PathBuf,
    /// Raw file content.
    pub content: &'a str,
    /// Declared format of the file.
    pub format: Format,
    /// Subtrees exempt from generic content rules.
    pub policy: &'a AncestorPolicy,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(
        path: &'a Path,
        content: &'a str,
        root: &Path,
        format: Format,
        policy: &'a AncestorPolicy,
    ) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            relative_path,
            content,
            format,
            policy,
        }
    }

    /// Final path component, e.g. `db.changelog-1.0.xml`.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(
                || self.path.to_string_lossy(),
                |name| name.to_string_lossy(),
            )
            .into_owned()
    }

    /// Lines of the raw content without terminators, 1-indexed.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &'a str)> {
        self.content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
    }
}
