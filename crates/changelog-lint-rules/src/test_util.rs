//! Helpers running a single rule against in-memory content.

use changelog_lint_core::{
    document, AncestorPolicy, ChangeLogRule, ChangeSetRule, FileContext, FileRawRule, Finding,
    Format,
};
use std::path::Path;

pub(crate) fn check_raw(rule: &dyn FileRawRule, content: &str) -> Vec<Finding> {
    let policy = AncestorPolicy::default();
    let ctx = FileContext::new(
        Path::new("test.xml"),
        content,
        Path::new("."),
        Format::Xml,
        &policy,
    );
    rule.check_file(&ctx)
}

pub(crate) fn check_roots(
    rule: &dyn ChangeLogRule,
    file: &str,
    format: Format,
    content: &str,
) -> Vec<Finding> {
    let policy = AncestorPolicy::default();
    let ctx = FileContext::new(Path::new(file), content, Path::new("."), format, &policy);
    let doc = document::parse(content, format).expect("test document parses");
    doc.roots()
        .flat_map(|root| rule.check_element(&ctx, root))
        .collect()
}

pub(crate) fn check_change_sets(
    rule: &dyn ChangeSetRule,
    format: Format,
    content: &str,
) -> Vec<Finding> {
    let policy = AncestorPolicy::default();
    let ctx = FileContext::new(Path::new("test"), content, Path::new("."), format, &policy);
    let doc = document::parse(content, format).expect("test document parses");
    doc.change_sets()
        .flat_map(|cs| rule.check_change_set(&ctx, cs))
        .collect()
}
