//! YAML adapter backed by `serde_yaml`.

use super::tree::{build_document, SourceNode};
use super::{Document, DocumentError, DocumentParser};
use crate::format::Format;
use serde::de::{self, Deserializer, EnumAccess, IgnoredAny, MapAccess, SeqAccess, VariantAccess};
use serde::Deserialize;
use std::fmt;

/// Reads YAML changelogs.
///
/// Every document of a multi-document stream contributes a top element.
/// Empty documents are skipped. A key repeated inside one mapping keeps the
/// value of its last occurrence at the position of its first, as in JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl DocumentParser for YamlParser {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn parse(&self, content: &str) -> Result<Document, DocumentError> {
        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        let mut values = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            match Node::deserialize(document).map_err(syntax_error)? {
                Node::Null => {}
                node => values.push(lower(node)),
            }
        }

        Ok(build_document(values))
    }
}

fn syntax_error(e: serde_yaml::Error) -> DocumentError {
    let (line, column) = e
        .location()
        .map_or((0, 0), |loc| (loc.line(), loc.column()));
    DocumentError::Syntax {
        format: Format::Yaml,
        message: e.to_string(),
        line,
        column,
    }
}

/// Loaded YAML value. Mappings keep every entry, repeated keys included;
/// `serde_yaml::Value` refuses those outright.
enum Node {
    Map(Vec<(Node, Node)>),
    Seq(Vec<Node>),
    Scalar(String),
    Null,
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> de::Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        // Keep `1.0` as written rather than `1`.
        let text = v.to_string();
        if v.is_finite() && !text.contains(['.', 'e']) {
            return Ok(Node::Scalar(format!("{text}.0")));
        }
        Ok(Node::Scalar(text))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::Scalar(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Seq(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }
        Ok(Node::Map(entries))
    }

    /// Tagged values (`!tag value`); the tag is dropped.
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Node, A::Error> {
        let (IgnoredAny, variant) = data.variant()?;
        variant.newtype_variant()
    }
}

fn lower(node: Node) -> SourceNode {
    match node {
        Node::Map(entries) => {
            let mut fields: Vec<(String, SourceNode)> = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let key = key_text(key);
                let value = lower(value);
                match fields.iter_mut().find(|(existing, _)| *existing == key) {
                    Some(slot) => slot.1 = value,
                    None => fields.push((key, value)),
                }
            }
            SourceNode::Object(fields)
        }
        Node::Seq(items) => SourceNode::Array(items.into_iter().map(lower).collect()),
        Node::Scalar(text) => SourceNode::Scalar(text),
        Node::Null => SourceNode::Scalar(String::new()),
    }
}

/// Coerces a mapping key to text. Complex keys render in flow style.
fn key_text(node: Node) -> String {
    match node {
        Node::Scalar(text) => text,
        Node::Null => String::new(),
        Node::Seq(items) => {
            let items: Vec<String> = items.into_iter().map(key_text).collect();
            format!("[{}]", items.join(", "))
        }
        Node::Map(entries) => {
            let entries: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}: {}", key_text(k), key_text(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGELOG: &str = "\
databaseChangeLog:
  - changeSet:
      id: 1
      author: alice
      changes:
        - createTable:
            tableName: person
            columns:
              - column:
                  name: id
                  type: int
        - sql: select 1
  - include:
      file: other.yaml
";

    #[test]
    fn unwraps_single_key_items() {
        let doc = YamlParser.parse(CHANGELOG).unwrap();
        let roots: Vec<&str> = doc.roots().map(|e| e.name()).collect();
        assert_eq!(roots, vec!["changeSet", "include"]);

        let cs = doc.change_sets().next().unwrap();
        assert_eq!(cs.property("id"), Some("1"));
        assert_eq!(cs.property("author"), Some("alice"));

        let column = cs.find_elements_by_name("column")[0];
        assert_eq!(column.property("type"), Some("int"));
        assert_eq!(
            column.path(),
            "databaseChangeLog/changeSet/changes/createTable/columns/column"
        );

        let sql = cs.find_elements_by_name("sql")[0];
        assert_eq!(sql.value(), "select 1");
    }

    #[test]
    fn multi_document_streams_contribute_roots() {
        let doc = YamlParser
            .parse("log:\n  - changeSet:\n      id: a\n---\nlog:\n  - changeSet:\n      id: b\n---\n")
            .unwrap();
        let ids: Vec<&str> = doc.change_sets().filter_map(|cs| cs.property("id")).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn comment_only_file_is_empty() {
        let doc = YamlParser.parse("# nothing here\n").unwrap();
        assert_eq!(doc.roots().count(), 0);
    }

    #[test]
    fn malformed_yaml_is_syntax_error() {
        let err = YamlParser.parse("a: [1, 2\nb: c").unwrap_err();
        assert!(matches!(err, DocumentError::Syntax { format: Format::Yaml, .. }));
    }

    #[test]
    fn duplicate_keys_resolve_last_wins() {
        let doc = YamlParser
            .parse("root:\n  - column:\n      name: a\n      type: int\n      name: b\n")
            .unwrap();
        let column = doc.roots().next().unwrap();
        assert_eq!(column.property("name"), Some("b"));
        let keys: Vec<&str> = column.properties().keys().collect();
        assert_eq!(keys, vec!["name", "type"]);
    }

    #[test]
    fn scalars_are_coerced_to_text() {
        let doc = YamlParser
            .parse("root:\n  - column:\n      size: 10\n      ratio: 1.0\n      nullable: false\n      remarks: ~\n")
            .unwrap();
        let column = doc.roots().next().unwrap();
        assert_eq!(column.property("size"), Some("10"));
        assert_eq!(column.property("ratio"), Some("1.0"));
        assert_eq!(column.property("nullable"), Some("false"));
        assert_eq!(column.property("remarks"), Some(""));
    }
}
