//! Rule requiring unique indexes to carry a naming suffix.
//!
//! A `createIndex` with `unique="true"` must have an `indexName` ending in
//! the configured suffix.
//!
//! # Configuration
//!
//! - `suffix`: required suffix (default: `_unique`)

use changelog_lint_core::{ChangeSetRule, Element, FileContext, Finding, Rule, RuleConfig};

/// Rule code for index-name-unique-suffix.
pub const CODE: &str = "CL020";

/// Rule name for index-name-unique-suffix.
pub const NAME: &str = "index-name-unique-suffix";

/// Description of index-name-unique-suffix.
pub const DESCRIPTION: &str = "Requires unique index names to end with a suffix";

/// Default suffix for unique index names.
pub const DEFAULT_SUFFIX: &str = "_unique";

const CREATE_INDEX: &str = "createIndex";
const INDEX_NAME: &str = "indexName";
const UNIQUE: &str = "unique";

/// Requires a suffix on unique index names.
#[derive(Debug, Clone)]
pub struct IndexNameUniqueSuffix {
    /// Required suffix.
    pub suffix: String,
}

impl Default for IndexNameUniqueSuffix {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexNameUniqueSuffix {
    /// Creates the rule with the default suffix.
    #[must_use]
    pub fn new() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    /// Sets the required suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Creates the rule from its configuration table.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new().suffix(config.get_str("suffix", DEFAULT_SUFFIX))
    }
}

impl Rule for IndexNameUniqueSuffix {
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

impl ChangeSetRule for IndexNameUniqueSuffix {
    fn check_change_set(&self, _ctx: &FileContext, change_set: Element<'_>) -> Vec<Finding> {
        change_set
            .find_elements_by_name(CREATE_INDEX)
            .into_iter()
            .filter(|index| {
                index
                    .property(UNIQUE)
                    .is_some_and(|v| v.eq_ignore_ascii_case("true"))
            })
            .filter_map(|index| index.property(INDEX_NAME))
            .filter(|name| !name.ends_with(&self.suffix))
            .map(|name| Finding::new([name, self.suffix.as_str()]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::check_change_sets;
    use changelog_lint_core::Format;

    #[test]
    fn reports_unique_index_without_suffix() {
        let findings = check_change_sets(
            &IndexNameUniqueSuffix::new(),
            Format::Xml,
            r#"<databaseChangeLog>
  <changeSet id="1" author="a">
    <createIndex indexName="user_idx" tableName="users" unique="true"/>
    <createIndex indexName="email_idx" tableName="users"/>
    <createIndex indexName="name_unique" tableName="users" unique="true"/>
  </changeSet>
</databaseChangeLog>"#,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].args, vec!["user_idx", "_unique"]);
    }

    #[test]
    fn suffix_is_configurable() {
        let findings = check_change_sets(
            &IndexNameUniqueSuffix::new().suffix("_uq"),
            Format::Yaml,
            "databaseChangeLog:\n  - changeSet:\n      id: 1\n      author: a\n      changes:\n        - createIndex:\n            indexName: name_unique\n            unique: true\n",
        );
        assert_eq!(findings[0].args, vec!["name_unique", "_uq"]);
    }
}
