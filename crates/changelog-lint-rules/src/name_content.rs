//! Generic naming-convention rules over name-like properties.
//!
//! Every element of a changeset is checked except those inside an
//! ancestor-excluded block (preconditions, data loading, raw SQL, ...).
//!
//! # Configuration
//!
//! - `attributes`: property keys to check. By default every key that is
//!   `name` or ends in `Name` (`tableName`, `columnName`, `indexName`, ...).

use changelog_lint_core::{ChangeSetRule, Element, FileContext, Finding, Rule, RuleConfig};

/// The convention a [`NameContent`] rule enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCheck {
    /// No `-` in names.
    NoHyphen,
    /// No `_` in names.
    NoUnderscore,
    /// Names are lowercase.
    Lowercase,
    /// No whitespace in names.
    NoSpace,
}

impl NameCheck {
    /// All conventions, in code order.
    pub const ALL: [Self; 4] = [
        Self::NoHyphen,
        Self::NoUnderscore,
        Self::Lowercase,
        Self::NoSpace,
    ];

    /// Rule name of this convention.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoHyphen => "names-no-hyphen",
            Self::NoUnderscore => "names-no-underscore",
            Self::Lowercase => "names-lowercase",
            Self::NoSpace => "names-no-space",
        }
    }

    /// Rule code of this convention.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NoHyphen => "CL030",
            Self::NoUnderscore => "CL031",
            Self::Lowercase => "CL032",
            Self::NoSpace => "CL033",
        }
    }

    /// Description of this convention.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NoHyphen => "Forbids hyphens in table, column and index names",
            Self::NoUnderscore => "Forbids underscores in table, column and index names",
            Self::Lowercase => "Requires lowercase table, column and index names",
            Self::NoSpace => "Forbids whitespace in table, column and index names",
        }
    }

    fn violates(self, value: &str) -> bool {
        match self {
            Self::NoHyphen => value.contains('-'),
            Self::NoUnderscore => value.contains('_'),
            Self::Lowercase => value.chars().any(char::is_uppercase),
            Self::NoSpace => value.chars().any(char::is_whitespace),
        }
    }
}

/// Checks name-like properties against a [`NameCheck`].
#[derive(Debug, Clone)]
pub struct NameContent {
    check: NameCheck,
    attributes: Option<Vec<String>>,
}

impl NameContent {
    /// Creates the rule checking the default name-like properties.
    #[must_use]
    pub fn new(check: NameCheck) -> Self {
        Self {
            check,
            attributes: None,
        }
    }

    /// Checks exactly these property keys instead.
    #[must_use]
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Creates the rule from its configuration table.
    #[must_use]
    pub fn from_config(check: NameCheck, config: &RuleConfig) -> Self {
        let attributes = config.get_str_array("attributes");
        if attributes.is_empty() {
            Self::new(check)
        } else {
            Self::new(check).attributes(attributes)
        }
    }

    fn is_name_key(&self, key: &str) -> bool {
        match &self.attributes {
            Some(keys) => keys.iter().any(|k| k == key),
            None => key == "name" || key.ends_with("Name"),
        }
    }
}

impl Rule for NameContent {
    fn name(&self) -> &'static str {
        self.check.name()
    }

    fn code(&self) -> &'static str {
        self.check.code()
    }

    fn description(&self) -> &'static str {
        self.check.description()
    }
}

impl ChangeSetRule for NameContent {
    fn check_change_set(&self, ctx: &FileContext, change_set: Element<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        for element in ctx.policy.checked_elements(change_set) {
            for (key, value) in element.properties().iter() {
                if self.is_name_key(key) && self.check.violates(value) {
                    findings.push(Finding::new([element.name(), key, value]));
                }
            }
        }
        findings
    }
}
