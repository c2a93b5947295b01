//! # changelog-lint-core
//!
//! Core framework for validating database changelogs written as XML, YAML
//! or JSON.
//!
//! This crate provides:
//!
//! - a single [`Document`] model that all three formats parse into
//! - [`FileRawRule`], [`ChangeLogRule`] and [`ChangeSetRule`] traits for the
//!   three validation granularities
//! - an [`ExclusionIndex`] suppressing rules per file or per changeset
//! - an [`AncestorPolicy`] exempting subtrees from generic content rules
//! - a [`ValidationManager`] orchestrating all of the above
//!
//! ## Example
//!
//! ```ignore
//! use changelog_lint_core::{discover, DiscoveryOptions, ValidationManager};
//!
//! let manager = ValidationManager::builder()
//!     .root("./db")
//!     .rule_box(my_rule)
//!     .build()?;
//!
//! let files = discover(Path::new("./db"), &DiscoveryOptions::default())?;
//! let result = manager.validate(&files);
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod discovery;
mod format;
mod manager;
mod messages;
mod policy;
mod rule;
mod types;

/// Unified document model and format adapters.
pub mod document;
/// Rule suppression per file or changeset.
pub mod exclusion;

pub use config::{AnalyzerConfig, Config, ConfigError, MessageOverride, RuleConfig};
pub use context::FileContext;
pub use discovery::{discover, DiscoveryError, DiscoveryOptions};
pub use document::{ChangeSetId, Document, DocumentError, Element};
pub use exclusion::{ExclusionError, ExclusionIndex, ExclusionRecord, WILDCARD_RULE};
pub use format::{Format, UnknownFormat};
pub use manager::{ChangelogFile, ValidationManager, ValidationManagerBuilder};
pub use messages::{compose_change_set_message, render_template, MessageCatalog};
pub use policy::{AncestorPolicy, DEFAULT_EXCLUDED_TAGS};
pub use rule::{ChangeLogRule, ChangeSetRule, FileRawRule, Finding, Rule, RuleBox, RuleScope};
pub use types::{LintResult, Location, Violation, ViolationDiagnostic, ViolationKind};
