//! Rule traits for the three validation granularities.

use crate::context::FileContext;
use crate::document::Element;
use crate::types::Location;
use serde::{Deserialize, Serialize};

/// Granularity a rule validates at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleScope {
    /// Raw file content; never sees the parsed tree.
    FileRaw,
    /// Each root-level element of the changelog.
    ChangeLog,
    /// Each changeset subtree.
    ChangeSet,
}

impl std::fmt::Display for RuleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileRaw => write!(f, "file-raw"),
            Self::ChangeLog => write!(f, "changelog"),
            Self::ChangeSet => write!(f, "changeset"),
        }
    }
}

/// One failed predicate, reported by a rule.
///
/// The rule supplies only the positional arguments; the final wording comes
/// from the [`MessageCatalog`](crate::MessageCatalog) entry for the rule and
/// the file's format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Positional message arguments (`{0}`, `{1}`, ...).
    pub args: Vec<String>,
    /// Position in the raw file, if the rule knows it.
    pub location: Option<Location>,
}

impl Finding {
    /// Creates a finding from message arguments.
    #[must_use]
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            location: None,
        }
    }

    /// Sets the raw-file position.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Identity shared by every rule.
pub trait Rule: Send + Sync {
    /// Returns the kebab-case id of this rule (e.g., "max-lines").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }
}

/// A rule over the raw content of a file.
///
/// # Example
///
/// ```ignore
/// use changelog_lint_core::{FileContext, FileRawRule, Finding, Rule};
///
/// pub struct NoBom;
///
/// impl Rule for NoBom {
///     fn name(&self) -> &'static str { "no-bom" }
///     fn code(&self) -> &'static str { "CL099" }
/// }
///
/// impl FileRawRule for NoBom {
///     fn check_file(&self, ctx: &FileContext) -> Vec<Finding> {
///         if ctx.content.starts_with('\u{feff}') {
///             vec![Finding::new(Vec::<String>::new())]
///         } else {
///             vec![]
///         }
///     }
/// }
/// ```
pub trait FileRawRule: Rule {
    /// Checks the raw content of one file.
    fn check_file(&self, ctx: &FileContext) -> Vec<Finding>;
}

/// A rule run once per root-level element, changeset or not.
pub trait ChangeLogRule: Rule {
    /// Checks one root-level element.
    fn check_element(&self, ctx: &FileContext, element: Element<'_>) -> Vec<Finding>;
}

/// A rule run once per changeset subtree.
///
/// All findings for one changeset are combined into a single reported
/// message prefixed with the changeset identity.
pub trait ChangeSetRule: Rule {
    /// Checks one changeset subtree.
    fn check_change_set(&self, ctx: &FileContext, change_set: Element<'_>) -> Vec<Finding>;
}

/// A configured rule together with its capability shape.
pub enum RuleBox {
    /// Raw-content rule.
    FileRaw(Box<dyn FileRawRule>),
    /// Root-element rule.
    ChangeLog(Box<dyn ChangeLogRule>),
    /// Changeset rule.
    ChangeSet(Box<dyn ChangeSetRule>),
}

impl RuleBox {
    /// Boxes a raw-content rule.
    #[must_use]
    pub fn file_raw<R: FileRawRule + 'static>(rule: R) -> Self {
        Self::FileRaw(Box::new(rule))
    }

    /// Boxes a root-element rule.
    #[must_use]
    pub fn change_log<R: ChangeLogRule + 'static>(rule: R) -> Self {
        Self::ChangeLog(Box::new(rule))
    }

    /// Boxes a changeset rule.
    #[must_use]
    pub fn change_set<R: ChangeSetRule + 'static>(rule: R) -> Self {
        Self::ChangeSet(Box::new(rule))
    }

    /// Granularity of the wrapped rule.
    #[must_use]
    pub fn scope(&self) -> RuleScope {
        match self {
            Self::FileRaw(_) => RuleScope::FileRaw,
            Self::ChangeLog(_) => RuleScope::ChangeLog,
            Self::ChangeSet(_) => RuleScope::ChangeSet,
        }
    }

    /// Id of the wrapped rule.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::FileRaw(r) => r.name(),
            Self::ChangeLog(r) => r.name(),
            Self::ChangeSet(r) => r.name(),
        }
    }

    /// Code of the wrapped rule.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileRaw(r) => r.code(),
            Self::ChangeLog(r) => r.code(),
            Self::ChangeSet(r) => r.code(),
        }
    }

    /// Description of the wrapped rule.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::FileRaw(r) => r.description(),
            Self::ChangeLog(r) => r.description(),
            Self::ChangeSet(r) => r.description(),
        }
    }
}

impl std::fmt::Debug for RuleBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleBox")
            .field("name", &self.name())
            .field("scope", &self.scope())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
    }

    impl FileRawRule for TestRule {
        fn check_file(&self, _ctx: &FileContext) -> Vec<Finding> {
            vec![Finding::new(["x"]).at(Location::new(1, 1))]
        }
    }

    #[test]
    fn rule_box_exposes_identity() {
        let rule = RuleBox::file_raw(TestRule);
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.description(), "A test rule");
        assert_eq!(rule.scope(), RuleScope::FileRaw);
    }

    #[test]
    fn scope_display() {
        assert_eq!(RuleScope::ChangeSet.to_string(), "changeset");
        assert_eq!(RuleScope::FileRaw.to_string(), "file-raw");
    }
}
