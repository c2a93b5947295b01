//! Rule registry: metadata, construction from configuration, and the
//! default message catalog.

use crate::attribute_affix::{self, Affix, AttributeAffix};
use crate::change_set_required_attributes::{self, ChangeSetRequiredAttributes};
use crate::end_with_newline::{self, EndWithNewline};
use crate::forbidden_top_level_tag::{self, ForbiddenTopLevelTag};
use crate::index_name_unique_suffix::{self, IndexNameUniqueSuffix};
use crate::max_lines::{self, MaxLines};
use crate::name_content::{NameCheck, NameContent};
use crate::no_tabs::{self, NoTabs};
use crate::no_trailing_whitespace::{self, NoTrailingWhitespace};
use crate::presets::Preset;
use changelog_lint_core::{Config, ConfigError, Format, MessageCatalog, RuleBox, RuleConfig, RuleScope};

/// Static description of a built-in rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInfo {
    /// Rule code (e.g., "CL001").
    pub code: &'static str,
    /// Rule id (e.g., "max-lines").
    pub name: &'static str,
    /// Granularity the rule runs at.
    pub scope: RuleScope,
    /// What the rule checks.
    pub description: &'static str,
    /// Options that must be configured before the rule can run.
    pub required_options: &'static [&'static str],
}

const fn name_rule(check: NameCheck) -> RuleInfo {
    RuleInfo {
        code: check.code(),
        name: check.name(),
        scope: RuleScope::ChangeSet,
        description: check.description(),
        required_options: &[],
    }
}

/// Every built-in rule, in run order.
pub const RULES: &[RuleInfo] = &[
    RuleInfo {
        code: max_lines::CODE,
        name: max_lines::NAME,
        scope: RuleScope::FileRaw,
        description: max_lines::DESCRIPTION,
        required_options: &["max"],
    },
    RuleInfo {
        code: no_trailing_whitespace::CODE,
        name: no_trailing_whitespace::NAME,
        scope: RuleScope::FileRaw,
        description: no_trailing_whitespace::DESCRIPTION,
        required_options: &[],
    },
    RuleInfo {
        code: no_tabs::CODE,
        name: no_tabs::NAME,
        scope: RuleScope::FileRaw,
        description: no_tabs::DESCRIPTION,
        required_options: &[],
    },
    RuleInfo {
        code: end_with_newline::CODE,
        name: end_with_newline::NAME,
        scope: RuleScope::FileRaw,
        description: end_with_newline::DESCRIPTION,
        required_options: &[],
    },
    RuleInfo {
        code: forbidden_top_level_tag::CODE,
        name: forbidden_top_level_tag::NAME,
        scope: RuleScope::ChangeLog,
        description: forbidden_top_level_tag::DESCRIPTION,
        required_options: &["tags"],
    },
    RuleInfo {
        code: index_name_unique_suffix::CODE,
        name: index_name_unique_suffix::NAME,
        scope: RuleScope::ChangeSet,
        description: index_name_unique_suffix::DESCRIPTION,
        required_options: &[],
    },
    RuleInfo {
        code: attribute_affix::PREFIX_CODE,
        name: attribute_affix::PREFIX_NAME,
        scope: RuleScope::ChangeSet,
        description: attribute_affix::PREFIX_DESCRIPTION,
        required_options: &["tag", "attribute", "prefix"],
    },
    RuleInfo {
        code: attribute_affix::SUFFIX_CODE,
        name: attribute_affix::SUFFIX_NAME,
        scope: RuleScope::ChangeSet,
        description: attribute_affix::SUFFIX_DESCRIPTION,
        required_options: &["tag", "attribute", "suffix"],
    },
    RuleInfo {
        code: change_set_required_attributes::CODE,
        name: change_set_required_attributes::NAME,
        scope: RuleScope::ChangeSet,
        description: change_set_required_attributes::DESCRIPTION,
        required_options: &[],
    },
    name_rule(NameCheck::NoHyphen),
    name_rule(NameCheck::NoUnderscore),
    name_rule(NameCheck::Lowercase),
    name_rule(NameCheck::NoSpace),
];

/// Looks a rule up by id or code, ignoring ASCII case.
#[must_use]
pub fn rule_info(name_or_code: &str) -> Option<&'static RuleInfo> {
    RULES
        .iter()
        .find(|info| {
            info.name.eq_ignore_ascii_case(name_or_code)
                || info.code.eq_ignore_ascii_case(name_or_code)
        })
}

/// Ids of every built-in rule, in run order.
#[must_use]
pub fn all_rule_ids() -> Vec<&'static str> {
    RULES.iter().map(|info| info.name).collect()
}

/// Creates a rule by id or code.
///
/// # Errors
///
/// Returns an error for an unknown rule or a missing/invalid option.
pub fn create_rule(name_or_code: &str, config: &RuleConfig) -> Result<RuleBox, ConfigError> {
    let info = rule_info(name_or_code).ok_or_else(|| ConfigError::UnknownRule {
        rule: name_or_code.to_string(),
    })?;

    let rule = match info.name {
        max_lines::NAME => RuleBox::file_raw(MaxLines::from_config(config)?),
        no_trailing_whitespace::NAME => RuleBox::file_raw(NoTrailingWhitespace::new()),
        no_tabs::NAME => RuleBox::file_raw(NoTabs::new()),
        end_with_newline::NAME => RuleBox::file_raw(EndWithNewline::new()),
        forbidden_top_level_tag::NAME => {
            RuleBox::change_log(ForbiddenTopLevelTag::from_config(config)?)
        }
        index_name_unique_suffix::NAME => {
            RuleBox::change_set(IndexNameUniqueSuffix::from_config(config))
        }
        attribute_affix::PREFIX_NAME => {
            RuleBox::change_set(AttributeAffix::from_config(Affix::Prefix, config)?)
        }
        attribute_affix::SUFFIX_NAME => {
            RuleBox::change_set(AttributeAffix::from_config(Affix::Suffix, config)?)
        }
        change_set_required_attributes::NAME => {
            RuleBox::change_set(ChangeSetRequiredAttributes::from_config(config))
        }
        other => {
            let check = NameCheck::ALL
                .into_iter()
                .find(|c| c.name() == other)
                .ok_or_else(|| ConfigError::UnknownRule {
                    rule: other.to_string(),
                })?;
            RuleBox::change_set(NameContent::from_config(check, config))
        }
    };
    Ok(rule)
}

/// Builds the rule set a configuration selects, in run order.
///
/// The preset (default: recommended) is the base set. A `[rules.<id>]`
/// table adds the rule with its options; `enabled = false` removes it.
///
/// # Errors
///
/// Returns an error for an unknown preset, an unknown rule table, or a rule
/// whose options are missing or invalid.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let preset = match config.preset.as_deref() {
        Some(name) => name.parse::<Preset>()?,
        None => Preset::Recommended,
    };

    let mut unknown: Vec<&String> = config
        .rules
        .keys()
        .filter(|name| !RULES.iter().any(|info| info.name == name.as_str()))
        .collect();
    unknown.sort();
    if let Some(rule) = unknown.first() {
        return Err(ConfigError::UnknownRule {
            rule: (*rule).clone(),
        });
    }

    let default_config = RuleConfig::default();
    RULES
        .iter()
        .filter(|info| {
            preset.rule_names().contains(&info.name) || config.rules.contains_key(info.name)
        })
        .filter(|info| config.is_rule_enabled(info.name))
        .map(|info| {
            let rule_config = config.rule_config(info.name).unwrap_or(&default_config);
            create_rule(info.name, rule_config)
        })
        .collect()
}

/// Builds the rules named on the command line (ids or codes).
///
/// Unknown names are skipped with a warning. Options come from the
/// configuration's `[rules.<id>]` tables.
///
/// # Errors
///
/// Returns an error if a selected rule's options are missing or invalid.
pub fn rules_by_name(names: &[&str], config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let default_config = RuleConfig::default();
    let mut seen = Vec::new();
    let mut rules = Vec::new();

    for name in names {
        let Some(info) = rule_info(name) else {
            tracing::warn!("Unknown rule: {}", name);
            continue;
        };
        if seen.contains(&info.name) {
            continue;
        }
        seen.push(info.name);
        let rule_config = config.rule_config(info.name).unwrap_or(&default_config);
        rules.push(create_rule(info.name, rule_config)?);
    }

    Ok(rules)
}

/// Default message templates of every built-in rule.
#[must_use]
pub fn default_catalog() -> MessageCatalog {
    MessageCatalog::new()
        .with_all_formats(max_lines::NAME, |_| {
            "File has {0} lines, exceeding the maximum of {1}".to_string()
        })
        .with_all_formats(no_trailing_whitespace::NAME, |_| {
            "Line {0} has trailing whitespace".to_string()
        })
        .with_all_formats(no_tabs::NAME, |_| {
            "Line {0} contains a tab character".to_string()
        })
        .with_all_formats(end_with_newline::NAME, |_| {
            "File {0} must end with a newline".to_string()
        })
        .with_all_formats(forbidden_top_level_tag::NAME, |f| {
            format!("{} is not allowed at the top level", f.quote_node("{0}"))
        })
        .with_all_formats(index_name_unique_suffix::NAME, |f| {
            format!(
                "{} with unique=true has indexName '{{0}}' not ending with '{{1}}'",
                f.quote_node("createIndex")
            )
        })
        .with_all_formats(attribute_affix::PREFIX_NAME, |f| {
            format!("{} {{1}} '{{2}}' must start with '{{3}}'", f.quote_node("{0}"))
        })
        .with_all_formats(attribute_affix::SUFFIX_NAME, |f| {
            format!("{} {{1}} '{{2}}' must end with '{{3}}'", f.quote_node("{0}"))
        })
        .with_all_formats(change_set_required_attributes::NAME, |f| {
            format!("{} is missing '{{0}}'", f.quote_node("changeSet"))
        })
        .with_all_formats(NameCheck::NoHyphen.name(), |f| {
            format!("{} {{1}} '{{2}}' must not contain '-'", f.quote_node("{0}"))
        })
        .with_all_formats(NameCheck::NoUnderscore.name(), |f| {
            format!("{} {{1}} '{{2}}' must not contain '_'", f.quote_node("{0}"))
        })
        .with_all_formats(NameCheck::Lowercase.name(), |f| {
            format!("{} {{1}} '{{2}}' must be lowercase", f.quote_node("{0}"))
        })
        .with_all_formats(NameCheck::NoSpace.name(), |f| {
            format!("{} {{1}} '{{2}}' must not contain whitespace", f.quote_node("{0}"))
        })
}

/// Default templates with the configuration's `[messages.<id>]` overrides.
///
/// # Errors
///
/// Returns an error if an override names an unknown rule.
pub fn catalog_from_config(config: &Config) -> Result<MessageCatalog, ConfigError> {
    if let Some(rule) = config
        .messages
        .keys()
        .find(|r| !RULES.iter().any(|info| info.name == r.as_str()))
    {
        return Err(ConfigError::UnknownRule { rule: rule.clone() });
    }
    let mut catalog = default_catalog();
    catalog.apply_overrides(&config.messages);
    Ok(catalog)
}

/// Renders a default template, for documentation and tests.
#[must_use]
pub fn default_message(rule: &str, format: Format, args: &[&str]) -> String {
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    default_catalog().render(rule, format, &args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_has_a_template_per_format() {
        let catalog = default_catalog();
        for info in RULES {
            for format in Format::ALL {
                assert!(
                    catalog.template(info.name, format).is_some(),
                    "{} has no {format} template",
                    info.name
                );
            }
        }
    }

    #[test]
    fn codes_and_names_are_unique() {
        let mut names = all_rule_ids();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RULES.len());

        let mut codes: Vec<_> = RULES.iter().map(|i| i.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), RULES.len());
    }

    #[test]
    fn rules_without_required_options_can_be_created() {
        for info in RULES.iter().filter(|i| i.required_options.is_empty()) {
            let rule = create_rule(info.name, &RuleConfig::default()).unwrap();
            assert_eq!(rule.name(), info.name);
            assert_eq!(rule.code(), info.code);
            assert_eq!(rule.scope(), info.scope);
            assert_eq!(rule.description(), info.description);
        }
    }

    #[test]
    fn rules_can_be_created_by_code() {
        let rule = create_rule("cl003", &RuleConfig::default()).unwrap();
        assert_eq!(rule.name(), "no-tabs");
    }

    #[test]
    fn unknown_rule_is_an_error() {
        assert!(matches!(
            create_rule("no-such-rule", &RuleConfig::default()),
            Err(ConfigError::UnknownRule { .. })
        ));
    }

    #[test]
    fn config_without_tables_uses_recommended() {
        let rules = rules_from_config(&Config::default()).unwrap();
        let names: Vec<_> = rules.iter().map(RuleBox::name).collect();
        assert_eq!(names, Preset::Recommended.rule_names());
    }

    #[test]
    fn rule_tables_add_and_disable_rules() {
        let config = Config::parse(
            r#"
preset = "minimal"

[rules.max-lines]
max = 100

[rules.end-with-newline]
enabled = false
"#,
        )
        .unwrap();
        let rules = rules_from_config(&config).unwrap();
        let names: Vec<_> = rules.iter().map(RuleBox::name).collect();
        assert_eq!(names, vec!["max-lines"]);
    }

    #[test]
    fn missing_required_option_is_reported() {
        let config = Config::parse("[rules.max-lines]\n").unwrap();
        let err = rules_from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOption { .. }));
    }

    #[test]
    fn unknown_rule_table_is_reported() {
        let config = Config::parse("[rules.no-such-rule]\n").unwrap();
        let err = rules_from_config(&config).unwrap_err();
        assert_eq!(err.to_string(), "Unknown rule `no-such-rule`");
    }

    #[test]
    fn unknown_preset_is_reported() {
        let config = Config::parse("preset = \"lenient\"\n").unwrap();
        assert!(matches!(
            rules_from_config(&config),
            Err(ConfigError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn command_line_selection_skips_unknown_names() {
        let rules = rules_by_name(&["CL003", "bogus", "no-tabs", "CL030"], &Config::default()).unwrap();
        let names: Vec<_> = rules.iter().map(RuleBox::name).collect();
        assert_eq!(names, vec!["no-tabs", "names-no-hyphen"]);
    }

    #[test]
    fn message_overrides_must_name_known_rules() {
        let config = Config::parse("[messages.bogus]\nxml = \"x\"\n").unwrap();
        assert!(catalog_from_config(&config).is_err());
    }

    #[test]
    fn templates_use_the_format_noun() {
        insta::assert_snapshot!(
            default_message("names-no-hyphen", Format::Json, &["createTable", "tableName", "a-b"]),
            @"Object [createTable] tableName 'a-b' must not contain '-'"
        );
    }
}
