//! # changelog-lint-rules
//!
//! Built-in rules for changelog-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Scope | Description |
//! |------|------|-------|-------------|
//! | CL001 | `max-lines` | file | Limits the number of lines in a file |
//! | CL002 | `no-trailing-whitespace` | file | Forbids whitespace at the end of a line |
//! | CL003 | `no-tabs` | file | Forbids tab characters |
//! | CL004 | `end-with-newline` | file | Requires a trailing newline |
//! | CL010 | `forbidden-top-level-tag` | changelog | Forbids configured root elements |
//! | CL020 | `index-name-unique-suffix` | changeset | Requires unique index names to end with a suffix |
//! | CL021 | `attribute-prefix` | changeset | Requires an attribute to start with a prefix |
//! | CL022 | `attribute-suffix` | changeset | Requires an attribute to end with a suffix |
//! | CL023 | `change-set-required-attributes` | changeset | Requires a comment (or other attributes) on changesets |
//! | CL030 | `names-no-hyphen` | changeset | Forbids `-` in names |
//! | CL031 | `names-no-underscore` | changeset | Forbids `_` in names |
//! | CL032 | `names-lowercase` | changeset | Requires lowercase names |
//! | CL033 | `names-no-space` | changeset | Forbids whitespace in names |
//!
//! ## Usage
//!
//! ```ignore
//! use changelog_lint_core::ValidationManager;
//! use changelog_lint_rules::{default_catalog, IndexNameUniqueSuffix, NoTabs};
//!
//! let manager = ValidationManager::builder()
//!     .root("./db")
//!     .file_raw_rule(NoTabs::new())
//!     .change_set_rule(IndexNameUniqueSuffix::new())
//!     .messages(default_catalog())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attribute_affix;
mod change_set_required_attributes;
mod end_with_newline;
mod forbidden_top_level_tag;
mod index_name_unique_suffix;
mod max_lines;
mod name_content;
mod no_tabs;
mod no_trailing_whitespace;
mod presets;
mod registry;

#[cfg(test)]
mod test_util;

pub use attribute_affix::{Affix, AttributeAffix};
pub use change_set_required_attributes::ChangeSetRequiredAttributes;
pub use end_with_newline::EndWithNewline;
pub use forbidden_top_level_tag::ForbiddenTopLevelTag;
pub use index_name_unique_suffix::IndexNameUniqueSuffix;
pub use max_lines::MaxLines;
pub use name_content::{NameCheck, NameContent};
pub use no_tabs::NoTabs;
pub use no_trailing_whitespace::NoTrailingWhitespace;
pub use presets::{minimal_rules, recommended_rules, strict_rules, Preset};
pub use registry::{
    all_rule_ids, catalog_from_config, create_rule, default_catalog, default_message, rule_info,
    rules_by_name, rules_from_config, RuleInfo, RULES,
};

/// Re-export core types for convenience.
pub use changelog_lint_core::{RuleBox, Violation};
