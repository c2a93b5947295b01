//! Check command implementation.

use anyhow::{Context, Result};
use changelog_lint_core::{discover, exclusion, Config, DiscoveryOptions, ValidationManager};
use changelog_lint_rules::{all_rule_ids, catalog_from_config, rules_by_name, rules_from_config};
use std::path::{Path, PathBuf};

use crate::config_resolver::{self, ConfigSource};
use crate::OutputFormat;

/// Arguments of `changelog-lint check`.
#[derive(Debug)]
pub struct CheckArgs {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub rules: Option<String>,
    pub exclude: Vec<String>,
    pub exclusions: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Runs the check command.
pub fn run(args: &CheckArgs) -> Result<()> {
    let project_dir = config_resolver::project_dir(&args.path);
    let source = config_resolver::resolve(&project_dir, args.config.as_deref());
    let config = source.load()?;

    let target = target_path(&args.path, &config, &source, &project_dir);

    let rules = match &args.rules {
        Some(filter) => {
            let names: Vec<&str> = filter
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            rules_by_name(&names, &config)
        }
        None => rules_from_config(&config),
    }
    .context("Invalid rule configuration")?;

    let messages = catalog_from_config(&config).context("Invalid message overrides")?;

    let exclusions_path = config_resolver::resolve_exclusions(
        args.exclusions.as_deref(),
        &config,
        &source,
        &project_dir,
    );
    let exclusions = exclusion::loader::from_file(exclusions_path.as_deref(), &all_rule_ids())
        .context("Failed to load exclusions")?;

    let mut options = DiscoveryOptions::from(&config.analyzer);
    options.exclude.extend(args.exclude.iter().cloned());
    let files = discover(&target, &options).context("Failed to collect changelog files")?;

    let root = config_resolver::project_dir(&target);
    let manager = ValidationManager::builder()
        .root(&root)
        .rules(rules)
        .messages(messages)
        .exclusions(exclusions)
        .ancestor_policy(config.analyzer.ancestor_policy())
        .build()
        .context("Failed to build validation manager")?;

    tracing::info!(
        "Validating {} file(s) under {} with {} rule(s)",
        files.len(),
        target.display(),
        manager.rule_count()
    );

    let result = manager.validate(&files);

    super::output::print(&result, args.format, &root)?;

    if result.has_violations() {
        std::process::exit(1);
    }

    Ok(())
}

/// The CLI path, unless it was left at `.` and the config names a root.
fn target_path(path: &Path, config: &Config, source: &ConfigSource, project_dir: &Path) -> PathBuf {
    let configured = &config.analyzer.root;
    if path == Path::new(".") && configured != Path::new(".") {
        source.base_dir(project_dir).join(configured)
    } else {
        path.to_path_buf()
    }
}
