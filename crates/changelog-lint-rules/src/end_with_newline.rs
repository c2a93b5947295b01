//! Rule requiring a file to end with a newline.
//!
//! A zero-byte file does not end with a newline and is reported.

use changelog_lint_core::{FileContext, FileRawRule, Finding, Location, Rule};

/// Rule code for end-with-newline.
pub const CODE: &str = "CL004";

/// Rule name for end-with-newline.
pub const NAME: &str = "end-with-newline";

/// Description of end-with-newline.
pub const DESCRIPTION: &str = "Requires the file to end with a newline";

/// Requires a trailing newline.
#[derive(Debug, Clone, Default)]
pub struct EndWithNewline;

impl EndWithNewline {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for EndWithNewline {
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

impl FileRawRule for EndWithNewline {
    fn check_file(&self, ctx: &FileContext) -> Vec<Finding> {
        if ctx.content.ends_with('\n') {
            return vec![];
        }
        let line = ctx.content.lines().count().max(1);
        let column = ctx.content.lines().last().map_or(0, |l| l.chars().count()) + 1;
        vec![Finding::new([ctx.file_name()]).at(Location::new(line, column))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::check_raw;

    #[test]
    fn empty_file_is_reported() {
        let findings = check_raw(&EndWithNewline, "");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].location, Some(Location::new(1, 1)));
    }

    #[test]
    fn missing_newline_points_past_last_line() {
        let findings = check_raw(&EndWithNewline, "<a/>\n<b/>");
        assert_eq!(findings[0].location, Some(Location::new(2, 5)));
    }

    #[test]
    fn terminated_file_passes() {
        assert!(check_raw(&EndWithNewline, "<a/>\n").is_empty());
    }
}
