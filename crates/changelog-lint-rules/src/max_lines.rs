//! Rule limiting the number of lines in a changelog file.
//!
//! # Configuration
//!
//! - `max` (required): maximum number of lines

use changelog_lint_core::{
    ConfigError, FileContext, FileRawRule, Finding, Location, Rule, RuleConfig,
};

/// Rule code for max-lines.
pub const CODE: &str = "CL001";

/// Rule name for max-lines.
pub const NAME: &str = "max-lines";

/// Description of max-lines.
pub const DESCRIPTION: &str = "Limits the number of lines in a changelog file";

/// Limits file length.
#[derive(Debug, Clone)]
pub struct MaxLines {
    /// Maximum number of lines.
    pub max: usize,
}

impl MaxLines {
    /// Creates the rule with a line limit.
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self { max }
    }

    /// Creates the rule from its configuration table.
    ///
    /// # Errors
    ///
    /// Returns an error if `max` is missing or not a positive integer.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.require_positive_int(NAME, "max")?))
    }
}

impl Rule for MaxLines {
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

impl FileRawRule for MaxLines {
    fn check_file(&self, ctx: &FileContext) -> Vec<Finding> {
        let count = ctx.content.lines().count();
        if count <= self.max {
            return vec![];
        }
        vec![Finding::new([count.to_string(), self.max.to_string()])
            .at(Location::new(self.max + 1, 1))]
    }
}
