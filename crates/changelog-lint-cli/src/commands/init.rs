//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# changelog-lint configuration

# Base rule set: recommended (default), strict or minimal.
# A [rules.<id>] table adds a rule on top; enabled = false removes one.
preset = "recommended"

[analyzer]
# Root directory to validate (default: current directory)
# root = "./db"

# Changelog files to pick up. Keep these narrow: every matching file goes
# through the raw-file rules, so "**/*.json" would also lint package.json.
include = [
    "**/*changelog*.xml",
    "**/*changelog*.yaml",
    "**/*changelog*.yml",
    "**/*changelog*.json",
]

# Glob patterns to skip
exclude = [
    "**/target/**",
    "**/node_modules/**",
]

# Respect .gitignore files
respect_gitignore = true

# Per-file and per-changeset rule suppressions
# exclusions = "changelog-lint-exclusions.toml"

# Subtrees skipped by the names-* rules
# excluded_ancestor_tags = ["preConditions", "rollback"]

[rules.index-name-unique-suffix]
suffix = "_unique"

# [rules.max-lines]
# max = 2000

# [rules.forbidden-top-level-tag]
# tags = ["sql", "sqlFile"]
# files = ["**/master.xml"]

# [rules.attribute-prefix]
# tag = "createIndex"
# attribute = "indexName"
# prefix = "idx_"

# [rules.names-no-hyphen]
# enabled = false

# Message overrides use {0}, {1}, ... for the rule's arguments.
# [messages.end-with-newline]
# xml = "File {0} must end with a newline"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("changelog-lint.toml"), force)?;

    println!("Created changelog-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit changelog-lint.toml to configure rules");
    println!("  2. Run: changelog-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
