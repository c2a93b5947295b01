//! Rule requiring every changeset to carry certain attributes.
//!
//! An attribute counts as present when the changeset has it as a property
//! (`comment: ...` in YAML/JSON) or as a child element with a non-empty value
//! (`<comment>...</comment>` in XML).
//!
//! # Configuration
//!
//! - `attributes`: required attribute names (default: `["comment"]`)

use changelog_lint_core::{ChangeSetRule, Element, FileContext, Finding, Rule, RuleConfig};

/// Rule code for change-set-required-attributes.
pub const CODE: &str = "CL023";

/// Rule name for change-set-required-attributes.
pub const NAME: &str = "change-set-required-attributes";

/// Description of change-set-required-attributes.
pub const DESCRIPTION: &str = "Requires attributes such as a comment on every changeset";

/// Requires attributes on every changeset.
#[derive(Debug, Clone)]
pub struct ChangeSetRequiredAttributes {
    /// Required attribute names.
    pub attributes: Vec<String>,
}

impl Default for ChangeSetRequiredAttributes {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeSetRequiredAttributes {
    /// Creates the rule requiring a `comment`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attributes: vec!["comment".to_string()],
        }
    }

    /// Replaces the required attributes.
    #[must_use]
    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Creates the rule from its configuration table.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        let attributes = config.get_str_array("attributes");
        if attributes.is_empty() {
            Self::new()
        } else {
            Self::new().attributes(attributes)
        }
    }
}

fn has_attribute(change_set: Element<'_>, name: &str) -> bool {
    change_set
        .property(name)
        .is_some_and(|v| !v.trim().is_empty())
        || change_set
            .children()
            .any(|c| c.name() == name && !c.value().is_empty())
}

impl Rule for ChangeSetRequiredAttributes {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }
}

impl ChangeSetRule for ChangeSetRequiredAttributes {
    fn check_change_set(&self, _ctx: &FileContext, change_set: Element<'_>) -> Vec<Finding> {
        self.attributes
            .iter()
            .filter(|attribute| !has_attribute(change_set, attribute))
            .map(|attribute| Finding::new([attribute.as_str()]))
            .collect()
    }
}
