//! Rule forbidding whitespace at the end of a line.

use changelog_lint_core::{FileContext, FileRawRule, Finding, Location, Rule};

/// Rule code for no-trailing-whitespace.
pub const CODE: &str = "CL002";

/// Rule name for no-trailing-whitespace.
pub const NAME: &str = "no-trailing-whitespace";

/// Description of no-trailing-whitespace.
pub const DESCRIPTION: &str = "Forbids whitespace at the end of a line";

/// Forbids trailing spaces and tabs.
#[derive(Debug, Clone, Default)]
pub struct NoTrailingWhitespace;

impl NoTrailingWhitespace {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoTrailingWhitespace {
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

impl FileRawRule for NoTrailingWhitespace {
    fn check_file(&self, ctx: &FileContext) -> Vec<Finding> {
        ctx.numbered_lines()
            .filter_map(|(n, line)| {
                // `lines()` keeps a `\r` from CRLF endings
                let line = line.strip_suffix('\r').unwrap_or(line);
                let trimmed = line.trim_end_matches([' ', '\t']);
                (trimmed.len() < line.len()).then(|| {
                    Finding::new([n.to_string()]).at(Location::new(n, trimmed.chars().count() + 1))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::check_raw;

    #[test]
    fn reports_each_offending_line() {
        let findings = check_raw(&NoTrailingWhitespace, "<a> \n<b/>\n<c/>\t\n");
        let lines: Vec<_> = findings.iter().map(|f| f.args[0].as_str()).collect();
        assert_eq!(lines, vec!["1", "3"]);
        assert_eq!(findings[0].location, Some(Location::new(1, 4)));
    }

    #[test]
    fn crlf_line_endings_are_not_whitespace() {
        assert!(check_raw(&NoTrailingWhitespace, "<a>\r\n<b/>\r\n").is_empty());
    }
}
