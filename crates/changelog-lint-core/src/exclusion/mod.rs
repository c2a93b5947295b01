//! Exclusion index: suppression of rules per file or per changeset.
//!
//! # Architecture
//!
//! ```text
//! exclusions TOML
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + expand wildcards
//! Vec<ExclusionRecord>
//!   ↓ ExclusionIndex::from_records()
//! ExclusionIndex (hash lookups)
//! ```
//!
//! Resolution is file-scope first, then changeset-scope. A target is
//! validated only if neither matches.

pub mod config_dto;
pub mod loader;

use crate::document::{ChangeSetId, Element};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Rule id matching every known rule.
pub const WILDCARD_RULE: &str = "*";

/// One configured suppression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExclusionRecord {
    /// Suppress `rule` for a whole file.
    File {
        /// File name or path relative to the analysis root.
        file: String,
        /// Rule id or [`WILDCARD_RULE`].
        rule: String,
    },
    /// Suppress `rule` for one changeset of a file.
    ChangeSet {
        /// File name or path relative to the analysis root.
        file: String,
        /// Identity of the changeset.
        change_set: ChangeSetId,
        /// Rule id or [`WILDCARD_RULE`].
        rule: String,
    },
}

impl ExclusionRecord {
    /// Creates a file-scope record.
    #[must_use]
    pub fn file(file: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::File {
            file: file.into(),
            rule: rule.into(),
        }
    }

    /// Creates a changeset-scope record.
    #[must_use]
    pub fn change_set(
        file: impl Into<String>,
        id: impl Into<String>,
        author: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self::ChangeSet {
            file: file.into(),
            change_set: ChangeSetId::new(id, author),
            rule: rule.into(),
        }
    }

    fn rule(&self) -> &str {
        match self {
            Self::File { rule, .. } | Self::ChangeSet { rule, .. } => rule,
        }
    }

    fn with_rule(&self, rule: &str) -> Self {
        match self {
            Self::File { file, .. } => Self::file(file.clone(), rule),
            Self::ChangeSet {
                file, change_set, ..
            } => Self::ChangeSet {
                file: file.clone(),
                change_set: change_set.clone(),
                rule: rule.to_string(),
            },
        }
    }
}

/// Errors building the exclusion index.
#[derive(Debug, thiserror::Error)]
pub enum ExclusionError {
    /// IO error reading the exclusions file.
    #[error("Failed to read exclusions file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("Failed to parse exclusions file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A record references a rule that does not exist.
    #[error("{context}: unknown rule `{rule}`")]
    UnknownRule {
        /// Where the record was defined (e.g., "file[2]").
        context: String,
        /// The unknown rule id.
        rule: String,
    },

    /// A record is structurally invalid.
    #[error("{context}: {reason}")]
    Invalid {
        /// Where the record was defined.
        context: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Lookup structure answering "is this rule suppressed here?".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionIndex {
    files: HashSet<(String, String)>,
    change_sets: HashSet<(String, ChangeSetId, String)>,
}

impl ExclusionIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index, expanding wildcards to `known_rules`.
    ///
    /// # Errors
    ///
    /// Returns [`ExclusionError::UnknownRule`] for a record naming a rule
    /// outside `known_rules`.
    pub fn from_records<I>(records: I, known_rules: &[&str]) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = ExclusionRecord>,
    {
        let mut index = Self::new();
        for (i, record) in records.into_iter().enumerate() {
            if record.rule() == WILDCARD_RULE {
                for rule in known_rules {
                    index.insert(record.with_rule(rule));
                }
            } else if known_rules.contains(&record.rule()) {
                index.insert(record);
            } else {
                return Err(ExclusionError::UnknownRule {
                    context: format!("exclusion[{i}]"),
                    rule: record.rule().to_string(),
                });
            }
        }
        Ok(index)
    }

    fn insert(&mut self, record: ExclusionRecord) {
        match record {
            ExclusionRecord::File { file, rule } => {
                self.files.insert((normalize(&file), rule));
            }
            ExclusionRecord::ChangeSet {
                file,
                change_set,
                rule,
            } => {
                self.change_sets.insert((normalize(&file), change_set, rule));
            }
        }
    }

    /// Number of expanded records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len() + self.change_sets.len()
    }

    /// Returns true if nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.change_sets.is_empty()
    }

    /// Returns true if `rule` is suppressed for the whole file.
    #[must_use]
    pub fn is_file_excluded(&self, file: &Path, rule: &str) -> bool {
        file_keys(file)
            .into_iter()
            .any(|key| self.files.contains(&(key, rule.to_string())))
    }

    /// Returns true if `rule` is suppressed for one changeset of the file.
    #[must_use]
    pub fn is_change_set_excluded(&self, file: &Path, change_set: &ChangeSetId, rule: &str) -> bool {
        if self.change_sets.is_empty() {
            return false;
        }
        file_keys(file).into_iter().any(|key| {
            self.change_sets
                .contains(&(key, change_set.clone(), rule.to_string()))
        })
    }

    /// Resolves both axes for a target element.
    ///
    /// The changeset identity comes from the element itself or its nearest
    /// changeset ancestor; elements outside any changeset only honour
    /// file-scope records.
    #[must_use]
    pub fn is_excluded(&self, file: &Path, element: Option<Element<'_>>, rule: &str) -> bool {
        if self.is_file_excluded(file, rule) {
            return true;
        }
        element
            .and_then(Element::change_set_identity)
            .is_some_and(|id| self.is_change_set_excluded(file, &id, rule))
    }
}

/// Normalizes a configured file reference to `/`-separated form.
fn normalize(file: &str) -> String {
    let file = file.replace('\\', "/");
    file.strip_prefix("./").unwrap_or(&file).to_string()
}

/// Keys a file can be referenced by: its relative path and its file name.
fn file_keys(file: &Path) -> Vec<String> {
    let mut keys = vec![normalize(&file.to_string_lossy())];
    if let Some(name) = file.file_name().map(|n| n.to_string_lossy().into_owned()) {
        if !keys.contains(&name) {
            keys.push(name);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentParser, XmlParser};

    const RULES: &[&str] = &["no-tabs", "names-no-hyphen", "max-lines"];

    #[test]
    fn wildcard_expands_to_known_rules() {
        let index =
            ExclusionIndex::from_records([ExclusionRecord::file("a.xml", "*")], RULES).unwrap();
        assert_eq!(index.len(), 3);
        for rule in RULES {
            assert!(index.is_file_excluded(Path::new("a.xml"), rule));
        }
        assert!(!index.is_file_excluded(Path::new("b.xml"), "no-tabs"));
    }

    #[test]
    fn unknown_rule_is_rejected() {
        let err = ExclusionIndex::from_records([ExclusionRecord::file("a.xml", "nope")], RULES)
            .unwrap_err();
        assert!(matches!(err, ExclusionError::UnknownRule { ref rule, .. } if rule == "nope"));
    }

    #[test]
    fn matches_relative_path_or_file_name() {
        let index = ExclusionIndex::from_records(
            [
                ExclusionRecord::file("./db/one.xml", "no-tabs"),
                ExclusionRecord::file("two.xml", "no-tabs"),
            ],
            RULES,
        )
        .unwrap();
        assert!(index.is_file_excluded(Path::new("db/one.xml"), "no-tabs"));
        assert!(index.is_file_excluded(Path::new("db/nested/two.xml"), "no-tabs"));
        assert!(!index.is_file_excluded(Path::new("other/one.xml"), "no-tabs"));
    }

    #[test]
    fn nested_elements_inherit_change_set_exclusion() {
        let doc = XmlParser
            .parse(
                r#"<log>
  <changeSet id="1" author="a"><createTable tableName="x-y"/></changeSet>
  <changeSet id="2" author="a"><createTable tableName="x-y"/></changeSet>
</log>"#,
            )
            .unwrap();
        let index = ExclusionIndex::from_records(
            [ExclusionRecord::change_set("c.xml", "1", "a", "names-no-hyphen")],
            RULES,
        )
        .unwrap();

        let tables: Vec<_> = doc
            .change_sets()
            .map(|cs| cs.find_elements_by_name("createTable")[0])
            .collect();
        let file = Path::new("c.xml");
        assert!(index.is_excluded(file, Some(tables[0]), "names-no-hyphen"));
        assert!(!index.is_excluded(file, Some(tables[1]), "names-no-hyphen"));
        assert!(!index.is_excluded(file, Some(tables[0]), "no-tabs"));
        assert!(!index.is_excluded(file, None, "names-no-hyphen"));
    }

    #[test]
    fn empty_index_excludes_nothing() {
        let index = ExclusionIndex::new();
        assert!(index.is_empty());
        assert!(!index.is_excluded(Path::new("a.xml"), None, "no-tabs"));
    }
}
