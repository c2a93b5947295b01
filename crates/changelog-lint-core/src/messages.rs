//! Message templates keyed by `(rule, format)`.
//!
//! Templates use positional placeholders `{0}`, `{1}`, ... filled from a
//! [`Finding`](crate::Finding)'s arguments. Each format has its own wording,
//! so an XML message talks about a `Tag <createIndex>` while the YAML and
//! JSON messages talk about a `Key [createIndex]` / `Object [createIndex]`.

use crate::config::MessageOverride;
use crate::document::ChangeSetId;
use crate::format::Format;
use std::collections::HashMap;

/// Separator joining several findings of one rule in one changeset.
pub const CHANGE_SET_SEPARATOR: &str = "; ";

/// Immutable-after-startup table of message templates.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    templates: HashMap<(String, Format), String>,
}

impl MessageCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template for one rule and format.
    #[must_use]
    pub fn with(mut self, rule: &str, format: Format, template: impl Into<String>) -> Self {
        self.insert(rule, format, template);
        self
    }

    /// Adds a template for every format, built from the format.
    #[must_use]
    pub fn with_all_formats(mut self, rule: &str, template: impl Fn(Format) -> String) -> Self {
        for format in Format::ALL {
            self.insert(rule, format, template(format));
        }
        self
    }

    /// Adds or replaces a template.
    pub fn insert(&mut self, rule: &str, format: Format, template: impl Into<String>) {
        self.templates
            .insert((rule.to_string(), format), template.into());
    }

    /// Replaces templates with user-configured wording.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, MessageOverride>) {
        for (rule, o) in overrides {
            for (format, template) in [
                (Format::Xml, &o.xml),
                (Format::Yaml, &o.yaml),
                (Format::Json, &o.json),
            ] {
                if let Some(template) = template {
                    self.insert(rule, format, template.clone());
                }
            }
        }
    }

    /// Returns the template for a rule and format.
    #[must_use]
    pub fn template(&self, rule: &str, format: Format) -> Option<&str> {
        self.templates
            .get(&(rule.to_string(), format))
            .map(String::as_str)
    }

    /// Renders a message, falling back to `rule: arg, arg` without a template.
    #[must_use]
    pub fn render(&self, rule: &str, format: Format, args: &[String]) -> String {
        match self.template(rule, format) {
            Some(template) => render_template(template, args),
            None if args.is_empty() => rule.to_string(),
            None => format!("{rule}: {}", args.join(", ")),
        }
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if the catalog has no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Substitutes `{N}` placeholders. Placeholders without a matching argument
/// are kept verbatim.
#[must_use]
pub fn render_template(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let substituted = after.find('}').and_then(|end| {
            let index: usize = after[..end].parse().ok()?;
            args.get(index).map(|arg| (arg, end))
        });

        match substituted {
            Some((arg, end)) => {
                out.push_str(arg);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Combines the messages of one rule in one changeset into a single line.
#[must_use]
pub fn compose_change_set_message(change_set: &ChangeSetId, rule: &str, messages: &[String]) -> String {
    format!(
        "{change_set} [{rule}]: {}",
        messages.join(CHANGE_SET_SEPARATOR)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn renders_positional_arguments() {
        assert_eq!(
            render_template("{1} then {0}", &args(&["a", "b"])),
            "b then a"
        );
        assert_eq!(render_template("{0}{0}", &args(&["x"])), "xx");
    }

    #[test]
    fn keeps_unmatched_placeholders() {
        assert_eq!(render_template("{2} {x} {", &args(&["a"])), "{2} {x} {");
    }

    #[test]
    fn catalog_picks_template_by_format() {
        let catalog = MessageCatalog::new().with_all_formats("index-name", |f| {
            format!("{} has bad name '{{0}}'", f.quote_node("createIndex"))
        });

        insta::assert_snapshot!(
            catalog.render("index-name", Format::Xml, &args(&["idx"])),
            @"Tag <createIndex> has bad name 'idx'"
        );
        insta::assert_snapshot!(
            catalog.render("index-name", Format::Json, &args(&["idx"])),
            @"Object [createIndex] has bad name 'idx'"
        );
    }

    #[test]
    fn missing_template_falls_back() {
        let catalog = MessageCatalog::new();
        assert_eq!(
            catalog.render("some-rule", Format::Yaml, &args(&["a", "b"])),
            "some-rule: a, b"
        );
        assert_eq!(catalog.render("some-rule", Format::Yaml, &[]), "some-rule");
    }

    #[test]
    fn overrides_replace_single_formats() {
        let mut catalog = MessageCatalog::new().with_all_formats("r", |_| "default".to_string());
        let mut overrides = HashMap::new();
        overrides.insert(
            "r".to_string(),
            MessageOverride {
                xml: Some("custom {0}".to_string()),
                yaml: None,
                json: None,
            },
        );
        catalog.apply_overrides(&overrides);

        assert_eq!(catalog.render("r", Format::Xml, &args(&["x"])), "custom x");
        assert_eq!(catalog.render("r", Format::Yaml, &args(&["x"])), "default");
    }

    #[test]
    fn change_set_messages_are_joined() {
        let id = ChangeSetId::new("1", "alice");
        insta::assert_snapshot!(
            compose_change_set_message(&id, "names-no-hyphen", &args(&["first", "second"])),
            @"ChangeSet(id='1', author='alice') [names-no-hyphen]: first; second"
        );
    }
}
