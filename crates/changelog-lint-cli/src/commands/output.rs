//! Shared output formatting for lint results.

use anyhow::Result;
use changelog_lint_core::{LintResult, Violation, ViolationDiagnostic};
use serde::Serialize;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result, root),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult, root: &Path) {
    for violation in &result.violations {
        if violation.is_parse_error() {
            print_parse_error(violation, root);
            continue;
        }

        let rule = violation.rule.as_deref().unwrap_or_default();
        match violation.location {
            Some(loc) => println!(
                "{} at {}:{}:{}",
                rule,
                violation.file.display(),
                loc.line,
                loc.column
            ),
            None => println!("{} at {}", rule, violation.file.display()),
        }
        println!("  \x1b[31merror\x1b[0m: {}", violation.message);
        println!();
    }

    let summary_color = if result.has_violations() {
        "\x1b[31m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} violation(s) and {} parse error(s) in {} file(s)\x1b[0m",
        summary_color,
        result.rule_violation_count(),
        result.parse_error_count(),
        result.files_checked
    );
}

/// Renders a parse error against the file source when it can still be read.
fn print_parse_error(violation: &Violation, root: &Path) {
    match std::fs::read_to_string(root.join(&violation.file)) {
        Ok(content) => {
            let report = miette::Report::new(ViolationDiagnostic::new(violation, content));
            println!("{report:?}");
        }
        Err(_) => println!("\x1b[31merror\x1b[0m: {violation}\n"),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files_checked: usize,
    violation_count: usize,
    parse_error_count: usize,
    violations: &'a [Violation],
}

impl<'a> From<&'a LintResult> for JsonReport<'a> {
    fn from(result: &'a LintResult) -> Self {
        Self {
            files_checked: result.files_checked,
            violation_count: result.rule_violation_count(),
            parse_error_count: result.parse_error_count(),
            violations: &result.violations,
        }
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::from(result))?;
    println!("{json}");
    Ok(())
}

fn compact_line(violation: &Violation) -> String {
    let (line, column) = violation.location.map_or((1, 1), |l| (l.line, l.column));
    let tag = violation.rule.as_deref().unwrap_or("parse-error");
    format!(
        "{}:{}:{}: [{}] {}",
        violation.file.display(),
        line,
        column,
        tag,
        violation.message
    )
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{}", compact_line(violation));
    }
}
