//! DTO → [`ExclusionIndex`] conversion with validation.

use super::config_dto::ExclusionsDto;
use super::{ExclusionError, ExclusionIndex, ExclusionRecord, WILDCARD_RULE};
use std::path::Path;

/// Converts parsed DTOs to records, validating each entry.
///
/// # Errors
///
/// Returns the first invalid or unknown-rule entry.
pub fn load(dto: ExclusionsDto, known_rules: &[&str]) -> Result<ExclusionIndex, ExclusionError> {
    let mut records = Vec::new();

    for (i, entry) in dto.files.into_iter().enumerate() {
        let context = format!("file[{i}]");
        check_entry(&context, &entry.file, &entry.rules, known_rules)?;
        records.extend(
            entry
                .rules
                .iter()
                .map(|rule| ExclusionRecord::file(entry.file.clone(), rule.clone())),
        );
    }

    for (i, entry) in dto.change_sets.into_iter().enumerate() {
        let context = format!("change-set[{i}]");
        check_entry(&context, &entry.file, &entry.rules, known_rules)?;
        let id = entry.id.to_string();
        if id.trim().is_empty() {
            return Err(invalid(&context, "`id` must not be empty"));
        }
        records.extend(entry.rules.iter().map(|rule| {
            ExclusionRecord::change_set(
                entry.file.clone(),
                id.clone(),
                entry.author.clone(),
                rule.clone(),
            )
        }));
    }

    ExclusionIndex::from_records(records, known_rules)
}

fn check_entry(
    context: &str,
    file: &str,
    rules: &[String],
    known_rules: &[&str],
) -> Result<(), ExclusionError> {
    if file.trim().is_empty() {
        return Err(invalid(context, "`file` must not be empty"));
    }
    if rules.is_empty() {
        return Err(invalid(context, "`rules` must list at least one rule"));
    }
    if let Some(rule) = rules
        .iter()
        .find(|r| r.as_str() != WILDCARD_RULE && !known_rules.contains(&r.as_str()))
    {
        return Err(ExclusionError::UnknownRule {
            context: context.to_string(),
            rule: rule.clone(),
        });
    }
    Ok(())
}

fn invalid(context: &str, reason: &str) -> ExclusionError {
    ExclusionError::Invalid {
        context: context.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses exclusions TOML.
///
/// # Errors
///
/// Returns an error for malformed TOML or invalid entries.
pub fn parse(content: &str, known_rules: &[&str]) -> Result<ExclusionIndex, ExclusionError> {
    let dto: ExclusionsDto = toml::from_str(content)?;
    load(dto, known_rules)
}

/// Reads and parses an exclusions file.
///
/// No path, or a path that does not exist, yields an empty index.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is invalid.
pub fn from_file(path: Option<&Path>, known_rules: &[&str]) -> Result<ExclusionIndex, ExclusionError> {
    let Some(path) = path else {
        return Ok(ExclusionIndex::new());
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "exclusions file not found, nothing excluded");
        return Ok(ExclusionIndex::new());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ExclusionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let index = parse(&content, known_rules)?;
    tracing::debug!(path = %path.display(), records = index.len(), "loaded exclusions");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ChangeSetId;

    const RULES: &[&str] = &["no-tabs", "names-no-hyphen"];

    #[test]
    fn parses_both_scopes() {
        let index = parse(
            r#"
[[file]]
file = "legacy.xml"
rules = ["no-tabs"]

[[change-set]]
file = "db/app.yaml"
id = 42
author = "alice"
rules = ["*"]
"#,
            RULES,
        )
        .unwrap();

        assert!(index.is_file_excluded(Path::new("legacy.xml"), "no-tabs"));
        let id = ChangeSetId::new("42", "alice");
        assert!(index.is_change_set_excluded(Path::new("db/app.yaml"), &id, "no-tabs"));
        assert!(index.is_change_set_excluded(Path::new("db/app.yaml"), &id, "names-no-hyphen"));
    }

    #[test]
    fn unknown_rule_names_the_entry() {
        let err = parse(
            r#"
[[file]]
file = "a.xml"
rules = ["no-tabs"]

[[file]]
file = "b.xml"
rules = ["no-such-rule"]
"#,
            RULES,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "file[1]: unknown rule `no-such-rule`");
    }

    #[test]
    fn empty_rules_are_invalid() {
        let err = parse("[[file]]\nfile = \"a.xml\"\nrules = []\n", RULES).unwrap_err();
        assert!(matches!(err, ExclusionError::Invalid { .. }));
    }

    #[test]
    fn missing_file_is_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let index = from_file(Some(&dir.path().join("absent.toml")), RULES).unwrap();
        assert!(index.is_empty());
        assert!(from_file(None, RULES).unwrap().is_empty());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exclusions.toml");
        std::fs::write(&path, "[[file]]\nfile = \"a.xml\"\nrules = [\"*\"]\n").unwrap();
        let index = from_file(Some(&path), RULES).unwrap();
        assert_eq!(index.len(), 2);
    }
}
