//! Core types for violations and lint results.

use crate::document::{ChangeSetId, DocumentError};
use crate::rule::RuleScope;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Position inside a changelog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed), counted in characters.
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Byte offset of this location in `content`, clamped to its length.
    #[must_use]
    pub fn offset_in(&self, content: &str) -> usize {
        if self.line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in content.split_inclusive('\n').enumerate() {
            if i + 1 == self.line {
                let column = line_content
                    .char_indices()
                    .nth(self.column.saturating_sub(1))
                    .map_or(line_content.len(), |(byte, _)| byte);
                return offset + column;
            }
            offset += line_content.len();
        }

        offset
    }
}

/// What produced a reported entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A rule finding.
    Rule,
    /// The file could not be parsed; no rules ran for it.
    ParseError,
    /// A rule panicked and was stopped for the file.
    RuleFailure,
}

/// One reported entry: a rule violation or a file-level parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// File name the entry belongs to (relative to the analysis root).
    pub file: PathBuf,
    /// Kind of entry.
    pub kind: ViolationKind,
    /// Id of the rule that reported it (`None` for parse errors).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Granularity of the reporting rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<RuleScope>,
    /// Changeset the violation was found in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_set: Option<ChangeSetId>,
    /// Position in the raw file, when the source knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a rule violation.
    #[must_use]
    pub fn rule(
        file: impl Into<PathBuf>,
        rule: impl Into<String>,
        scope: RuleScope,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            kind: ViolationKind::Rule,
            rule: Some(rule.into()),
            scope: Some(scope),
            change_set: None,
            location: None,
            message: message.into(),
        }
    }

    /// Creates the single entry recorded for a file that failed to parse.
    #[must_use]
    pub fn parse_error(file: impl Into<PathBuf>, error: &DocumentError) -> Self {
        Self {
            file: file.into(),
            kind: ViolationKind::ParseError,
            rule: None,
            scope: None,
            change_set: None,
            location: error
                .position()
                .map(|(line, column)| Location::new(line, column)),
            message: error.to_string(),
        }
    }

    /// Creates the entry recorded for a rule that panicked on a file.
    #[must_use]
    pub fn rule_failure(
        file: impl Into<PathBuf>,
        rule: impl Into<String>,
        scope: RuleScope,
        reason: &str,
    ) -> Self {
        let rule = rule.into();
        Self {
            file: file.into(),
            kind: ViolationKind::RuleFailure,
            message: format!("Rule {rule} failed: {reason}"),
            rule: Some(rule),
            scope: Some(scope),
            change_set: None,
            location: None,
        }
    }

    /// Attaches the changeset the violation belongs to.
    #[must_use]
    pub fn with_change_set(mut self, change_set: ChangeSetId) -> Self {
        self.change_set = Some(change_set);
        self
    }

    /// Attaches a raw-file position.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns true if this entry records a parse failure.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        self.kind == ViolationKind::ParseError
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Rich terminal rendering of a violation against its file content.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl ViolationDiagnostic {
    /// Builds a diagnostic pointing at the violation's location in `content`.
    #[must_use]
    pub fn new(violation: &Violation, content: String) -> Self {
        let offset = violation
            .location
            .map_or(0, |loc| loc.offset_in(&content));
        let label_message = violation
            .rule
            .clone()
            .unwrap_or_else(|| "parse error".to_string());
        Self {
            message: violation.message.clone(),
            source_code: NamedSource::new(violation.file.display().to_string(), content),
            span: SourceSpan::from((offset, 0)),
            label_message,
        }
    }
}

/// Result of validating a batch of changelog files.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LintResult {
    /// Every entry, ordered by file, then rule, then encounter order.
    pub violations: Vec<Violation>,
    /// Number of files processed (including files that failed to parse).
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if anything was reported.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Number of files that failed to parse.
    #[must_use]
    pub fn parse_error_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_parse_error()).count()
    }

    /// Number of rule violations, rule failures included.
    #[must_use]
    pub fn rule_violation_count(&self) -> usize {
        self.violations.len() - self.parse_error_count()
    }

    /// Entries rendered as `<file>: <message>` lines.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Entries reported by one rule.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.rule.as_deref() == Some(rule))
            .collect()
    }

    /// Formats a multi-line report, e.g. for test failure messages.
    #[must_use]
    pub fn format_report(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        for v in &self.violations {
            let _ = writeln!(report, "{v}");
        }
        let _ = writeln!(
            report,
            "Found {} violation(s) and {} parse error(s) in {} file(s)",
            self.rule_violation_count(),
            self.parse_error_count(),
            self.files_checked
        );
        report
    }

    /// Adds entries from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;

    fn make_violation() -> Violation {
        Violation::rule(
            "db/changelog.xml",
            "no-tabs",
            RuleScope::FileRaw,
            "Line 3 contains a tab character",
        )
    }

    #[test]
    fn display_prefixes_file_name() {
        assert_eq!(
            make_violation().to_string(),
            "db/changelog.xml: Line 3 contains a tab character"
        );
    }

    #[test]
    fn parse_error_carries_position() {
        let error = DocumentError::Syntax {
            format: Format::Json,
            message: "expected value".to_string(),
            line: 2,
            column: 5,
        };
        let v = Violation::parse_error("a.json", &error);
        assert!(v.is_parse_error());
        assert_eq!(v.rule, None);
        assert_eq!(v.location, Some(Location::new(2, 5)));
        assert_eq!(v.to_string(), "a.json: Invalid json document: expected value");
    }

    #[test]
    fn offset_from_location() {
        let content = "line1\nline2\nline3";
        assert_eq!(Location::new(1, 1).offset_in(content), 0);
        assert_eq!(Location::new(2, 1).offset_in(content), 6);
        assert_eq!(Location::new(2, 3).offset_in(content), 8);
        assert_eq!(Location::new(9, 1).offset_in(content), content.len());
    }

    #[test]
    fn offset_counts_columns_in_characters() {
        let content = "<é a=\"ü\"><b></log>\n";
        // `<`, `é`, ` `, `a`, `=`, `"`, `ü` precede the closing quote.
        let quote = content.rfind('"').unwrap();
        assert_eq!(Location::new(1, 8).offset_in(content), quote);
        assert_eq!(&content[Location::new(1, 13).offset_in(content)..], "</log>\n");
        assert_eq!(Location::new(1, 99).offset_in(content), content.len());
    }

    #[test]
    fn counts_split_by_kind() {
        let mut result = LintResult::new();
        result.files_checked = 2;
        result.violations.push(make_violation());
        result.violations.push(Violation::parse_error(
            "b.yaml",
            &DocumentError::UndeclaredFormat {
                path: PathBuf::from("b.yaml"),
            },
        ));

        assert_eq!(result.rule_violation_count(), 1);
        assert_eq!(result.parse_error_count(), 1);
        assert_eq!(result.by_rule("no-tabs").len(), 1);
        assert!(result
            .format_report()
            .contains("Found 1 violation(s) and 1 parse error(s) in 2 file(s)"));
    }
}
