//! Rule presets for common configurations.

use crate::registry::create_rule;
use changelog_lint_core::{ConfigError, RuleBox, RuleConfig};
use std::str::FromStr;

/// Preset configurations for changelog-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    #[default]
    Recommended,
    /// Every rule that runs without required options.
    Strict,
    /// Minimal rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Ids of the rules in this preset, in run order.
    #[must_use]
    pub fn rule_names(self) -> &'static [&'static str] {
        match self {
            Self::Recommended => &[
                "no-trailing-whitespace",
                "no-tabs",
                "end-with-newline",
                "index-name-unique-suffix",
                "names-no-hyphen",
                "names-no-space",
            ],
            Self::Strict => &[
                "no-trailing-whitespace",
                "no-tabs",
                "end-with-newline",
                "index-name-unique-suffix",
                "change-set-required-attributes",
                "names-no-hyphen",
                "names-no-underscore",
                "names-lowercase",
                "names-no-space",
            ],
            Self::Minimal => &["end-with-newline"],
        }
    }

    /// Returns the rules for this preset with default options.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        let config = RuleConfig::default();
        self.rule_names()
            .iter()
            .filter_map(|name| create_rule(name, &config).ok())
            .collect()
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            _ => Err(ConfigError::UnknownPreset {
                preset: s.to_string(),
            }),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `no-trailing-whitespace` (CL002)
/// - `no-tabs` (CL003)
/// - `end-with-newline` (CL004)
/// - `index-name-unique-suffix` (CL020)
/// - `names-no-hyphen` (CL030)
/// - `names-no-space` (CL033)
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns the strict set of rules.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    Preset::Strict.rules()
}

/// Returns the minimal set of rules: only `end-with-newline`.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    Preset::Minimal.rules()
}
