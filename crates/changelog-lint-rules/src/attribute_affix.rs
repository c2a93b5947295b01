//! Rules requiring an attribute of a given element to start or end with a
//! fixed string, e.g. every `createTable/tableName` starting with `app_`.
//!
//! # Configuration
//!
//! - `tag` (required): element name
//! - `attribute` (required): property key
//! - `prefix` / `suffix` (required): expected affix

use changelog_lint_core::{
    ChangeSetRule, ConfigError, Element, FileContext, Finding, Rule, RuleConfig,
};

/// Rule code for attribute-prefix.
pub const PREFIX_CODE: &str = "CL021";

/// Rule name for attribute-prefix.
pub const PREFIX_NAME: &str = "attribute-prefix";

/// Description of attribute-prefix.
pub const PREFIX_DESCRIPTION: &str = "Requires an attribute of an element to start with a prefix";

/// Rule code for attribute-suffix.
pub const SUFFIX_CODE: &str = "CL022";

/// Rule name for attribute-suffix.
pub const SUFFIX_NAME: &str = "attribute-suffix";

/// Description of attribute-suffix.
pub const SUFFIX_DESCRIPTION: &str = "Requires an attribute of an element to end with a suffix";

/// Which end of the value is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix {
    /// The value must start with the affix.
    Prefix,
    /// The value must end with the affix.
    Suffix,
}

impl Affix {
    fn rule_name(self) -> &'static str {
        match self {
            Self::Prefix => PREFIX_NAME,
            Self::Suffix => SUFFIX_NAME,
        }
    }

    fn option(self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Suffix => "suffix",
        }
    }

    fn matches(self, value: &str, affix: &str) -> bool {
        match self {
            Self::Prefix => value.starts_with(affix),
            Self::Suffix => value.ends_with(affix),
        }
    }
}

/// Requires `<tag attribute="...">` values to carry a prefix or suffix.
#[derive(Debug, Clone)]
pub struct AttributeAffix {
    affix: Affix,
    tag: String,
    attribute: String,
    expected: String,
}

impl AttributeAffix {
    /// Creates an attribute-prefix rule.
    #[must_use]
    pub fn prefix(
        tag: impl Into<String>,
        attribute: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            affix: Affix::Prefix,
            tag: tag.into(),
            attribute: attribute.into(),
            expected: prefix.into(),
        }
    }

    /// Creates an attribute-suffix rule.
    #[must_use]
    pub fn suffix(
        tag: impl Into<String>,
        attribute: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            affix: Affix::Suffix,
            ..Self::prefix(tag, attribute, suffix)
        }
    }

    /// Creates the rule from its configuration table.
    ///
    /// # Errors
    ///
    /// Returns an error if `tag`, `attribute` or the affix option is missing.
    pub fn from_config(affix: Affix, config: &RuleConfig) -> Result<Self, ConfigError> {
        let name = affix.rule_name();
        Ok(Self {
            affix,
            tag: config.require_str(name, "tag")?,
            attribute: config.require_str(name, "attribute")?,
            expected: config.require_str(name, affix.option())?,
        })
    }
}

impl Rule for AttributeAffix {
    fn name(&self) -> &'static str {
        self.affix.rule_name()
    }

    fn code(&self) -> &'static str {
        match self.affix {
            Affix::Prefix => PREFIX_CODE,
            Affix::Suffix => SUFFIX_CODE,
        }
    }

    fn description(&self) -> &'static str {
        match self.affix {
            Affix::Prefix => PREFIX_DESCRIPTION,
            Affix::Suffix => SUFFIX_DESCRIPTION,
        }
    }
}

impl ChangeSetRule for AttributeAffix {
    fn check_change_set(&self, _ctx: &FileContext, change_set: Element<'_>) -> Vec<Finding> {
        change_set
            .find_elements_by_name(&self.tag)
            .into_iter()
            .filter_map(|element| element.property(&self.attribute))
            .filter(|value| !self.affix.matches(value, &self.expected))
            .map(|value| {
                Finding::new([
                    self.tag.as_str(),
                    self.attribute.as_str(),
                    value,
                    self.expected.as_str(),
                ])
            })
            .collect()
    }
}
