//! TOML deserialization types for the exclusions file (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to [`ExclusionRecord`](super::ExclusionRecord)s via the loader.

use serde::Deserialize;

/// Raw TOML representation of an exclusions file.
///
/// ```toml
/// [[file]]
/// file = "legacy.xml"
/// rules = ["*"]
///
/// [[change-set]]
/// file = "db.changelog-1.0.yaml"
/// id = "42"
/// author = "alice"
/// rules = ["names-no-hyphen"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExclusionsDto {
    /// File-scope entries.
    #[serde(rename = "file", default)]
    pub files: Vec<FileExclusionDto>,

    /// Changeset-scope entries.
    #[serde(rename = "change-set", default)]
    pub change_sets: Vec<ChangeSetExclusionDto>,
}

/// TOML representation of a file-scope entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileExclusionDto {
    /// File name or path relative to the analysis root.
    pub file: String,
    /// Rule ids, or `"*"` for all rules.
    pub rules: Vec<String>,
}

/// TOML representation of a changeset-scope entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeSetExclusionDto {
    /// File name or path relative to the analysis root.
    pub file: String,
    /// Changeset id. Numeric ids may be written unquoted.
    pub id: ScalarDto,
    /// Changeset author.
    pub author: String,
    /// Rule ids, or `"*"` for all rules.
    pub rules: Vec<String>,
}

/// A string or integer value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScalarDto {
    /// Quoted value.
    Text(String),
    /// Unquoted integer.
    Integer(i64),
}

impl std::fmt::Display for ScalarDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}
