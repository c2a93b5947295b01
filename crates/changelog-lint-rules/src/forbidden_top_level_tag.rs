//! Rule forbidding certain elements at the top level of a changelog.
//!
//! Runs once per root element, so it also sees `include`, `property` and
//! other non-changeset entries.
//!
//! # Configuration
//!
//! - `tags` (required): forbidden element names
//! - `files`: glob patterns limiting the rule to matching files

use changelog_lint_core::{
    ChangeLogRule, ConfigError, Element, FileContext, Finding, Rule, RuleConfig,
};

/// Rule code for forbidden-top-level-tag.
pub const CODE: &str = "CL010";

/// Rule name for forbidden-top-level-tag.
pub const NAME: &str = "forbidden-top-level-tag";

/// Description of forbidden-top-level-tag.
pub const DESCRIPTION: &str = "Forbids configured elements at the top level of a changelog";

/// Forbids configured root elements.
#[derive(Debug, Clone)]
pub struct ForbiddenTopLevelTag {
    tags: Vec<String>,
    files: Vec<glob::Pattern>,
}

impl ForbiddenTopLevelTag {
    /// Creates the rule forbidding `tags` in every file.
    #[must_use]
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            files: Vec::new(),
        }
    }

    /// Limits the rule to files matching one of `patterns`.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid glob.
    pub fn files(mut self, patterns: &[String]) -> Result<Self, glob::PatternError> {
        self.files = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Creates the rule from its configuration table.
    ///
    /// # Errors
    ///
    /// Returns an error if `tags` is missing or a `files` pattern is invalid.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Self::new(config.require_str_array(NAME, "tags")?)
            .files(&config.get_str_array("files"))
            .map_err(|e| ConfigError::invalid(NAME, "files", &e.to_string()))
    }

    fn applies_to(&self, ctx: &FileContext) -> bool {
        if self.files.is_empty() {
            return true;
        }
        let relative = ctx.relative_path.to_string_lossy().replace('\\', "/");
        let file_name = ctx.file_name();
        self.files
            .iter()
            .any(|p| p.matches(&relative) || p.matches(&file_name))
    }
}

impl Rule for ForbiddenTopLevelTag {
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

impl ChangeLogRule for ForbiddenTopLevelTag {
    fn check_element(&self, ctx: &FileContext, element: Element<'_>) -> Vec<Finding> {
        if !self.applies_to(ctx) || !self.tags.iter().any(|t| t == element.name()) {
            return vec![];
        }
        vec![Finding::new([element.name()])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::check_roots;
    use changelog_lint_core::Format;

    const XML: &str = r#"<databaseChangeLog>
  <include file="a.xml"/>
  <property name="x" value="y"/>
  <changeSet id="1" author="a"/>
</databaseChangeLog>"#;

    #[test]
    fn reports_forbidden_roots() {
        let rule = ForbiddenTopLevelTag::new(["include", "property"]);
        let findings = check_roots(&rule, "master.xml", Format::Xml, XML);
        let names: Vec<_> = findings.iter().map(|f| f.args[0].as_str()).collect();
        assert_eq!(names, vec!["include", "property"]);
    }

    #[test]
    fn file_patterns_limit_the_rule() {
        let rule = ForbiddenTopLevelTag::new(["include"])
            .files(&["db/changes/*.xml".to_string()])
            .unwrap();
        assert!(check_roots(&rule, "master.xml", Format::Xml, XML).is_empty());
        assert_eq!(
            check_roots(&rule, "db/changes/1.xml", Format::Xml, XML).len(),
            1
        );
    }

    #[test]
    fn requires_tags_option() {
        let err = ForbiddenTopLevelTag::from_config(&RuleConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOption { .. }));
    }
}
