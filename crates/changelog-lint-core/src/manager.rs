//! Validation manager: parses each file and dispatches rules per granularity.

use crate::config::ConfigError;
use crate::context::FileContext;
use crate::document::{self, Document, DocumentError};
use crate::exclusion::ExclusionIndex;
use crate::format::Format;
use crate::messages::{compose_change_set_message, MessageCatalog};
use crate::policy::AncestorPolicy;
use crate::rule::{ChangeLogRule, ChangeSetRule, FileRawRule, Finding, RuleBox, RuleScope};
use crate::types::{LintResult, Violation};

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A changelog file together with its declared format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChangelogFile {
    /// Path on disk.
    pub path: PathBuf,
    /// Declared format.
    pub format: Format,
}

impl ChangelogFile {
    /// Creates a file entry with an explicit format.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Creates a file entry whose format comes from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UndeclaredFormat`] for an unknown extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        let path = path.into();
        match Format::from_path(&path) {
            Some(format) => Ok(Self { path, format }),
            None => Err(DocumentError::UndeclaredFormat { path }),
        }
    }
}

/// Builder for configuring a [`ValidationManager`].
#[derive(Default)]
pub struct ValidationManagerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclusions: Option<ExclusionIndex>,
    messages: Option<MessageCatalog>,
    policy: Option<AncestorPolicy>,
}

impl ValidationManagerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the analysis root; reported file names are relative to it.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a boxed rule. Rules run in the order they were added.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a raw-content rule.
    #[must_use]
    pub fn file_raw_rule<R: FileRawRule + 'static>(self, rule: R) -> Self {
        self.rule_box(RuleBox::file_raw(rule))
    }

    /// Adds a root-element rule.
    #[must_use]
    pub fn change_log_rule<R: ChangeLogRule + 'static>(self, rule: R) -> Self {
        self.rule_box(RuleBox::change_log(rule))
    }

    /// Adds a changeset rule.
    #[must_use]
    pub fn change_set_rule<R: ChangeSetRule + 'static>(self, rule: R) -> Self {
        self.rule_box(RuleBox::change_set(rule))
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the exclusion index (default: empty).
    #[must_use]
    pub fn exclusions(mut self, exclusions: ExclusionIndex) -> Self {
        self.exclusions = Some(exclusions);
        self
    }

    /// Sets the message catalog (default: empty, every message falls back).
    #[must_use]
    pub fn messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Sets the ancestor-exclusion policy (default: [`AncestorPolicy::default`]).
    #[must_use]
    pub fn ancestor_policy(mut self, policy: AncestorPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Builds the manager.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateRule`] if a rule id was added twice.
    pub fn build(self) -> Result<ValidationManager, ConfigError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name()) {
                return Err(ConfigError::DuplicateRule {
                    rule: rule.name().to_string(),
                });
            }
        }

        Ok(ValidationManager {
            root: self.root.unwrap_or_else(|| PathBuf::from(".")),
            rules: self.rules,
            exclusions: self.exclusions.unwrap_or_default(),
            messages: self.messages.unwrap_or_default(),
            policy: self.policy.unwrap_or_default(),
        })
    }
}

/// Runs configured rules over changelog files.
///
/// Use [`ValidationManager::builder()`] to construct an instance.
#[derive(Debug)]
pub struct ValidationManager {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclusions: ExclusionIndex,
    messages: MessageCatalog,
    policy: AncestorPolicy,
}

impl ValidationManager {
    /// Creates a new builder for configuring a manager.
    #[must_use]
    pub fn builder() -> ValidationManagerBuilder {
        ValidationManagerBuilder::new()
    }

    /// Returns the analysis root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Ids of the registered rules, in run order.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(RuleBox::name).collect()
    }

    /// Validates every file and accumulates all entries.
    ///
    /// Never fails: unreadable or unparsable files become one
    /// [`ViolationKind::ParseError`](crate::ViolationKind::ParseError) entry each.
    #[must_use]
    pub fn validate(&self, files: &[ChangelogFile]) -> LintResult {
        info!(
            files = files.len(),
            rules = self.rules.len(),
            "Starting validation at {}",
            self.root.display()
        );

        let mut result = LintResult::new();
        for file in files {
            result.violations.extend(self.validate_file(file));
            result.files_checked += 1;
        }

        info!(
            "Validation complete: {} violation(s), {} parse error(s) in {} file(s)",
            result.rule_violation_count(),
            result.parse_error_count(),
            result.files_checked
        );
        result
    }

    /// Reads and validates one file.
    #[must_use]
    pub fn validate_file(&self, file: &ChangelogFile) -> Vec<Violation> {
        match std::fs::read_to_string(&file.path) {
            Ok(content) => self.validate_source(&file.path, file.format, &content),
            Err(source) => {
                let error = DocumentError::Io {
                    path: file.path.clone(),
                    source,
                };
                warn!("Failed to read {}: {error}", file.path.display());
                vec![Violation::parse_error(self.relative(&file.path), &error)]
            }
        }
    }

    /// Validates in-memory content declared as `format`.
    #[must_use]
    pub fn validate_source(&self, path: &Path, format: Format, content: &str) -> Vec<Violation> {
        debug!("Validating: {} ({format})", path.display());

        let ctx = FileContext::new(path, content, &self.root, format, &self.policy);
        let document = match document::parse(content, format) {
            Ok(document) => document,
            Err(error) => {
                warn!("Failed to parse {}: {error}", path.display());
                return vec![Violation::parse_error(ctx.relative_path.clone(), &error)];
            }
        };

        let mut violations = Vec::new();
        for rule in &self.rules {
            if self.exclusions.is_file_excluded(&ctx.relative_path, rule.name()) {
                debug!(
                    "Skipping {} for {}: file excluded",
                    rule.name(),
                    ctx.relative_path.display()
                );
                continue;
            }

            let outcome = match rule {
                RuleBox::FileRaw(r) => self.run_file_raw(&ctx, r.as_ref(), &mut violations),
                RuleBox::ChangeLog(r) => {
                    self.run_change_log(&ctx, &document, r.as_ref(), &mut violations)
                }
                RuleBox::ChangeSet(r) => {
                    self.run_change_set(&ctx, &document, r.as_ref(), &mut violations)
                }
            };
            if let Err(reason) = outcome {
                warn!(
                    "Rule {} failed on {}: {reason}",
                    rule.name(),
                    ctx.relative_path.display()
                );
                violations.push(Violation::rule_failure(
                    ctx.relative_path.clone(),
                    rule.name(),
                    rule.scope(),
                    &reason,
                ));
            }
        }
        violations
    }

    fn run_file_raw(
        &self,
        ctx: &FileContext,
        rule: &dyn FileRawRule,
        out: &mut Vec<Violation>,
    ) -> Result<(), String> {
        for finding in guarded(|| rule.check_file(ctx))? {
            let message = self.messages.render(rule.name(), ctx.format, &finding.args);
            let mut violation = Violation::rule(
                ctx.relative_path.clone(),
                rule.name(),
                RuleScope::FileRaw,
                message,
            );
            if let Some(location) = finding.location {
                violation = violation.with_location(location);
            }
            out.push(violation);
        }
        Ok(())
    }

    fn run_change_log(
        &self,
        ctx: &FileContext,
        document: &Document,
        rule: &dyn ChangeLogRule,
        out: &mut Vec<Violation>,
    ) -> Result<(), String> {
        for root in document.roots() {
            if self
                .exclusions
                .is_excluded(&ctx.relative_path, Some(root), rule.name())
            {
                debug!("Skipping {} for <{}>: excluded", rule.name(), root.name());
                continue;
            }

            for finding in guarded(|| rule.check_element(ctx, root))? {
                let message = self.messages.render(rule.name(), ctx.format, &finding.args);
                let mut violation = Violation::rule(
                    ctx.relative_path.clone(),
                    rule.name(),
                    RuleScope::ChangeLog,
                    message,
                );
                if let Some(id) = root.change_set_identity() {
                    violation = violation.with_change_set(id);
                }
                if let Some(location) = finding.location {
                    violation = violation.with_location(location);
                }
                out.push(violation);
            }
        }
        Ok(())
    }

    fn run_change_set(
        &self,
        ctx: &FileContext,
        document: &Document,
        rule: &dyn ChangeSetRule,
        out: &mut Vec<Violation>,
    ) -> Result<(), String> {
        for change_set in document.change_sets() {
            let Some(id) = change_set.change_set_identity() else {
                continue;
            };
            if self
                .exclusions
                .is_change_set_excluded(&ctx.relative_path, &id, rule.name())
            {
                debug!("Skipping {} for {id}: excluded", rule.name());
                continue;
            }

            let findings = guarded(|| rule.check_change_set(ctx, change_set))?;
            if findings.is_empty() {
                continue;
            }

            let location = findings.iter().find_map(|f| f.location);
            let messages: Vec<String> = findings
                .iter()
                .map(|f| self.messages.render(rule.name(), ctx.format, &f.args))
                .collect();
            let mut violation = Violation::rule(
                ctx.relative_path.clone(),
                rule.name(),
                RuleScope::ChangeSet,
                compose_change_set_message(&id, rule.name(), &messages),
            )
            .with_change_set(id);
            if let Some(location) = location {
                violation = violation.with_location(location);
            }
            out.push(violation);
        }
        Ok(())
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}

/// Runs one rule call. A panic stops that rule for the current file and
/// comes back as its message.
fn guarded<F>(check: F) -> Result<Vec<Finding>, String>
where
    F: FnOnce() -> Vec<Finding>,
{
    panic::catch_unwind(AssertUnwindSafe(check)).map_err(|payload| panic_message(&*payload))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
