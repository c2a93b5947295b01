//! Rule forbidding tab characters.

use changelog_lint_core::{FileContext, FileRawRule, Finding, Location, Rule};

/// Rule code for no-tabs.
pub const CODE: &str = "CL003";

/// Rule name for no-tabs.
pub const NAME: &str = "no-tabs";

/// Description of no-tabs.
pub const DESCRIPTION: &str = "Forbids tab characters";

/// Forbids tab characters anywhere in the file.
#[derive(Debug, Clone, Default)]
pub struct NoTabs;

impl NoTabs {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoTabs {
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

impl FileRawRule for NoTabs {
    fn check_file(&self, ctx: &FileContext) -> Vec<Finding> {
        ctx.numbered_lines()
            .filter_map(|(n, line)| {
                line.find('\t').map(|byte| {
                    let column = line[..byte].chars().count() + 1;
                    Finding::new([n.to_string()]).at(Location::new(n, column))
                })
            })
            .collect()
    }
}
