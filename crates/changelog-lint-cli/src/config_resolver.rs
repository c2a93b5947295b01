//! Locating the configuration and exclusions files.
//!
//! Configuration, first match wins:
//!
//! 1. `--config` flag
//! 2. `{project}/changelog-lint.toml`, then `{project}/.changelog-lint.toml`
//! 3. `$CHANGELOG_LINT_CONFIG_DIR/config.toml` or `~/.changelog-lint/config.toml`
//! 4. built-in defaults
//!
//! Exclusions, first match wins:
//!
//! 1. `--exclusions` flag
//! 2. `[analyzer] exclusions`, relative to the config file's directory
//! 3. `{project}/changelog-lint-exclusions.toml`
//! 4. none

use anyhow::{Context, Result};
use changelog_lint_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to the changelogs.
    Project(PathBuf),
    /// Found in the user's global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Directory that relative paths inside the config resolve against.
    #[must_use]
    pub fn base_dir(&self, project_dir: &Path) -> PathBuf {
        self.path()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| project_dir.to_path_buf(), Path::to_path_buf)
    }

    /// Loads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        match self {
            Self::Default => Ok(Config::default()),
            Self::Global(p) => {
                tracing::info!("Using global config: {}", p.display());
                Config::from_file(p)
                    .with_context(|| format!("Failed to load config: {}", p.display()))
            }
            Self::Explicit(p) | Self::Project(p) => Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display())),
        }
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["changelog-lint.toml", ".changelog-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Exclusions file picked up from the project directory when none is configured.
pub const PROJECT_EXCLUSIONS_NAME: &str = "changelog-lint-exclusions.toml";

/// Directory searched for project files: `path` itself, or its parent for a file.
#[must_use]
pub fn project_dir(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    } else {
        path.to_path_buf()
    }
}

/// Resolves the configuration file.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(project_dir, explicit, global_config_dir())
}

/// Resolution with the global directory passed in, so tests need no env vars.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(candidate) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|c| c.exists())
    {
        tracing::debug!("Found project config: {}", candidate.display());
        return ConfigSource::Project(candidate);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.exists() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// Resolves the exclusions file. The result may not exist; the loader treats
/// a missing file as "nothing excluded".
#[must_use]
pub fn resolve_exclusions(
    explicit: Option<&Path>,
    config: &Config,
    source: &ConfigSource,
    project_dir: &Path,
) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    if let Some(p) = config.exclusions_path(&source.base_dir(project_dir)) {
        return Some(p);
    }
    let candidate = project_dir.join(PROJECT_EXCLUSIONS_NAME);
    candidate.exists().then_some(candidate)
}

/// Global config directory: `$CHANGELOG_LINT_CONFIG_DIR`, else `~/.changelog-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("CHANGELOG_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".changelog-lint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_wins_without_existence_check() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("changelog-lint.toml"), "").unwrap();

        let result = resolve_inner(tmp.path(), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".changelog-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join(".changelog-lint.toml"))
        );

        fs::write(tmp.path().join("changelog-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join("changelog-lint.toml"))
        );
    }

    #[test]
    fn global_is_a_fallback_only() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let none = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(none, ConfigSource::Default);

        fs::write(global.path().join("config.toml"), "").unwrap();
        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(
            result,
            ConfigSource::Global(global.path().join("config.toml"))
        );

        fs::write(project.path().join("changelog-lint.toml"), "").unwrap();
        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn default_source_loads_default_config() {
        let config = ConfigSource::Default.load().unwrap();
        assert!(config.preset.is_none());
        assert!(ConfigSource::Default.path().is_none());
    }

    #[test]
    fn configured_exclusions_resolve_against_config_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("conf/changelog-lint.toml");
        fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        fs::write(&config_path, "[analyzer]\nexclusions = \"skip.toml\"\n").unwrap();

        let source = ConfigSource::Explicit(config_path);
        let config = source.load().unwrap();
        let resolved = resolve_exclusions(None, &config, &source, tmp.path());
        assert_eq!(resolved, Some(tmp.path().join("conf/skip.toml")));
    }

    #[test]
    fn project_exclusions_file_is_picked_up() {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        let source = ConfigSource::Default;
        assert_eq!(resolve_exclusions(None, &config, &source, tmp.path()), None);

        fs::write(tmp.path().join(PROJECT_EXCLUSIONS_NAME), "").unwrap();
        assert_eq!(
            resolve_exclusions(None, &config, &source, tmp.path()),
            Some(tmp.path().join(PROJECT_EXCLUSIONS_NAME))
        );

        let explicit = Path::new("/elsewhere/x.toml");
        assert_eq!(
            resolve_exclusions(Some(explicit), &config, &source, tmp.path()),
            Some(explicit.to_path_buf())
        );
    }

    #[test]
    fn project_dir_of_a_file_is_its_parent() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("db.changelog.xml");
        fs::write(&file, "").unwrap();
        assert_eq!(project_dir(&file), tmp.path());
        assert_eq!(project_dir(tmp.path()), tmp.path());
    }
}
