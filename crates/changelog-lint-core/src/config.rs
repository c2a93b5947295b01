//! Configuration types for changelog-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level configuration for changelog-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset used when no `[rules.*]` table is present
    /// (e.g., "recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule id.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,

    /// Per-rule message template overrides, keyed by rule id.
    #[serde(default)]
    pub messages: HashMap<String, MessageOverride>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the configuration table of a rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Returns true if rules are selected explicitly through `[rules.*]`.
    #[must_use]
    pub fn has_rule_tables(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Resolves the exclusions file path against `base`.
    #[must_use]
    pub fn exclusions_path(&self, base: &Path) -> Option<PathBuf> {
        self.analyzer.exclusions.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        })
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns selecting changelog files.
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Path of the exclusions file (TOML). A missing file means no exclusions.
    #[serde(default)]
    pub exclusions: Option<PathBuf>,

    /// Tag names whose subtrees generic content rules skip.
    /// Defaults to [`DEFAULT_EXCLUDED_TAGS`](crate::policy::DEFAULT_EXCLUDED_TAGS).
    #[serde(default)]
    pub excluded_ancestor_tags: Option<Vec<String>>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            include: default_include(),
            exclude: vec!["**/target/**".to_string(), "**/node_modules/**".to_string()],
            respect_gitignore: true,
            exclusions: None,
            excluded_ancestor_tags: None,
        }
    }
}

impl AnalyzerConfig {
    /// Builds the ancestor-exclusion policy from this configuration.
    #[must_use]
    pub fn ancestor_policy(&self) -> crate::AncestorPolicy {
        self.excluded_ancestor_tags
            .as_ref()
            .map_or_else(crate::AncestorPolicy::default, |tags| {
                crate::AncestorPolicy::new(tags.iter().cloned())
            })
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// `**/*changelog*.<ext>` for every known extension. Plain `**/*.json`
/// would pull in `package.json` and friends.
pub(crate) fn default_include() -> Vec<String> {
    crate::format::Format::ALL
        .iter()
        .flat_map(|f| f.extensions())
        .map(|ext| format!("**/*changelog*.{ext}"))
        .collect()
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }

    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }

    /// Gets a string option with a default value.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Gets a required string option.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is missing, empty, or not a string.
    pub fn require_str(&self, rule: &str, key: &str) -> Result<String, ConfigError> {
        match self.options.get(key) {
            None => Err(ConfigError::missing(rule, key)),
            Some(toml::Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(_) => Err(ConfigError::invalid(rule, key, "expected a non-empty string")),
        }
    }

    /// Gets a required positive integer option.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is missing or not a positive integer.
    pub fn require_positive_int(&self, rule: &str, key: &str) -> Result<usize, ConfigError> {
        match self.options.get(key) {
            None => Err(ConfigError::missing(rule, key)),
            Some(toml::Value::Integer(n)) if *n > 0 => usize::try_from(*n)
                .map_err(|_| ConfigError::invalid(rule, key, "integer out of range")),
            Some(_) => Err(ConfigError::invalid(rule, key, "expected a positive integer")),
        }
    }

    /// Gets a required non-empty string array option.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is missing, empty, or not an array of strings.
    pub fn require_str_array(&self, rule: &str, key: &str) -> Result<Vec<String>, ConfigError> {
        let Some(value) = self.options.get(key) else {
            return Err(ConfigError::missing(rule, key));
        };
        let values = value
            .as_array()
            .and_then(|arr| {
                arr.iter()
                    .map(|v| v.as_str().map(String::from))
                    .collect::<Option<Vec<_>>>()
            })
            .ok_or_else(|| ConfigError::invalid(rule, key, "expected an array of strings"))?;
        if values.is_empty() {
            return Err(ConfigError::invalid(rule, key, "must not be empty"));
        }
        Ok(values)
    }
}

/// Message template overrides for one rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageOverride {
    /// Template used for XML changelogs.
    #[serde(default)]
    pub xml: Option<String>,
    /// Template used for YAML changelogs.
    #[serde(default)]
    pub yaml: Option<String>,
    /// Template used for JSON changelogs.
    #[serde(default)]
    pub json: Option<String>,
}

/// Configuration errors. Any of these aborts the run before files are read.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in a config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule id that no registered rule answers to.
    #[error("Unknown rule `{rule}`")]
    UnknownRule {
        /// The unknown id.
        rule: String,
    },

    /// A preset name that does not exist.
    #[error("Unknown preset `{preset}`, expected: recommended, strict, minimal")]
    UnknownPreset {
        /// The unknown preset.
        preset: String,
    },

    /// The same rule was registered twice.
    #[error("Rule `{rule}` is registered more than once")]
    DuplicateRule {
        /// The duplicated id.
        rule: String,
    },

    /// A required rule option is absent.
    #[error("Rule `{rule}` requires option `{option}`")]
    MissingOption {
        /// Rule id.
        rule: String,
        /// Missing option name.
        option: String,
    },

    /// A rule option has the wrong shape.
    #[error("Rule `{rule}` option `{option}`: {reason}")]
    InvalidOption {
        /// Rule id.
        rule: String,
        /// Option name.
        option: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The exclusions file is invalid.
    #[error(transparent)]
    Exclusions(#[from] crate::exclusion::ExclusionError),
}

impl ConfigError {
    /// Creates a [`ConfigError::MissingOption`].
    #[must_use]
    pub fn missing(rule: &str, option: &str) -> Self {
        Self::MissingOption {
            rule: rule.to_string(),
            option: option.to_string(),
        }
    }

    /// Creates a [`ConfigError::InvalidOption`].
    #[must_use]
    pub fn invalid(rule: &str, option: &str, reason: &str) -> Self {
        Self::InvalidOption {
            rule: rule.to_string(),
            option: option.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert_eq!(config.analyzer.include.len(), 4);
        assert!(config
            .analyzer
            .include
            .contains(&"**/*changelog*.json".to_string()));
        assert!(!config.has_rule_tables());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "strict"

[analyzer]
root = "./db"
exclude = ["**/generated/**"]
exclusions = "exclusions.toml"
excluded_ancestor_tags = ["sql"]

[rules.max-lines]
max = 400

[rules.no-tabs]
enabled = false

[messages.max-lines]
xml = "too long: {0}"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("strict"));
        assert_eq!(config.analyzer.root, PathBuf::from("./db"));
        assert!(config.is_rule_enabled("max-lines"));
        assert!(!config.is_rule_enabled("no-tabs"));
        assert!(config.is_rule_enabled("unconfigured"));
        assert_eq!(
            config.exclusions_path(Path::new("/repo")),
            Some(PathBuf::from("/repo/exclusions.toml"))
        );

        let policy = config.analyzer.ancestor_policy();
        assert!(policy.is_excluded_tag("sql"));
        assert!(!policy.is_excluded_tag("loadData"));

        let rule = config.rule_config("max-lines").unwrap();
        assert_eq!(rule.require_positive_int("max-lines", "max").unwrap(), 400);
        assert_eq!(
            config.messages["max-lines"].xml.as_deref(),
            Some("too long: {0}")
        );
    }

    #[test]
    fn required_options_report_rule_and_option() {
        let rule = RuleConfig::default();
        let err = rule.require_str("attribute-prefix", "prefix").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Rule `attribute-prefix` requires option `prefix`"
        );
    }

    #[test]
    fn required_options_validate_shape() {
        let config = Config::parse(
            r#"
[rules.r]
max = -1
tags = []
name = 3
"#,
        )
        .unwrap();
        let rule = config.rule_config("r").unwrap();
        assert!(matches!(
            rule.require_positive_int("r", "max"),
            Err(ConfigError::InvalidOption { .. })
        ));
        assert!(matches!(
            rule.require_str_array("r", "tags"),
            Err(ConfigError::InvalidOption { .. })
        ));
        assert!(matches!(
            rule.require_str("r", "name"),
            Err(ConfigError::InvalidOption { .. })
        ));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        assert!(matches!(
            Config::parse("[rules"),
            Err(ConfigError::Parse { .. })
        ));
    }
}
