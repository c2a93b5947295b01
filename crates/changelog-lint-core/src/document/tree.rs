//! Shared tree builder for map-based formats (JSON, YAML).
//!
//! Both adapters lower their generic value type into [`SourceNode`] and hand
//! it to [`build_document`], so equivalent JSON and YAML content always
//! produces the same tree.

use super::{Document, NodeId};

/// Name given to array items that cannot be named from their content or
/// from an enclosing key.
pub(crate) const ITEM_PLACEHOLDER: &str = "item";

/// Format-neutral view of a loaded JSON/YAML value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SourceNode {
    /// Mapping with keys in document order.
    Object(Vec<(String, SourceNode)>),
    /// Sequence.
    Array(Vec<SourceNode>),
    /// Scalar coerced to text.
    Scalar(String),
}

/// Builds a document with one top element per loaded value.
pub(crate) fn build_document(values: Vec<SourceNode>) -> Document {
    let mut doc = Document::new();
    for value in values {
        let top = build_item(&mut doc, None, None, value);
        doc.add_top(top);
    }
    doc
}

/// Builds an array item (or a top-level value).
///
/// A single-key object is unwrapped: the key names the element and its value
/// supplies the content. Anything else is named after the enclosing key, or
/// [`ITEM_PLACEHOLDER`] when there is none.
fn build_item(
    doc: &mut Document,
    parent: Option<NodeId>,
    parent_key: Option<&str>,
    node: SourceNode,
) -> NodeId {
    match node {
        SourceNode::Object(mut fields) if fields.len() == 1 => {
            let (key, value) = fields.remove(0);
            build_named(doc, parent, &key, value)
        }
        other => build_named(doc, parent, parent_key.unwrap_or(ITEM_PLACEHOLDER), other),
    }
}

/// Builds an element with a known name.
fn build_named(doc: &mut Document, parent: Option<NodeId>, name: &str, node: SourceNode) -> NodeId {
    let id = doc.push(parent, name);
    match node {
        SourceNode::Object(fields) => {
            for (key, value) in fields {
                match value {
                    SourceNode::Scalar(text) => doc.set_property(id, key, text),
                    nested => {
                        build_named(doc, Some(id), &key, nested);
                    }
                }
            }
        }
        SourceNode::Array(items) => {
            for item in items {
                build_item(doc, Some(id), Some(name), item);
            }
        }
        SourceNode::Scalar(text) => doc.set_value(id, text),
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    fn obj(fields: Vec<(&str, SourceNode)>) -> SourceNode {
        SourceNode::Object(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn scalar(text: &str) -> SourceNode {
        SourceNode::Scalar(text.to_string())
    }

    #[test]
    fn single_key_items_are_unwrapped() {
        let doc = build_document(vec![obj(vec![(
            "databaseChangeLog",
            SourceNode::Array(vec![obj(vec![(
                "changeSet",
                obj(vec![("id", scalar("1")), ("author", scalar("bob"))]),
            )])]),
        )])]);

        let roots: Vec<Element<'_>> = doc.roots().collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name(), "changeSet");
        assert_eq!(roots[0].property("id"), Some("1"));
        assert_eq!(roots[0].property("author"), Some("bob"));
    }

    #[test]
    fn multi_key_items_fall_back_to_parent_key() {
        let doc = build_document(vec![obj(vec![(
            "columns",
            SourceNode::Array(vec![obj(vec![
                ("name", scalar("id")),
                ("type", scalar("int")),
            ])]),
        )])]);

        let item = doc.roots().next().unwrap();
        assert_eq!(item.name(), "columns");
        assert_eq!(item.property("type"), Some("int"));
    }

    #[test]
    fn top_level_array_uses_placeholder() {
        let doc = build_document(vec![SourceNode::Array(vec![scalar("x")])]);
        let top = doc.tops().next().unwrap();
        assert_eq!(top.name(), ITEM_PLACEHOLDER);
        let leaf = top.children().next().unwrap();
        assert_eq!(leaf.name(), ITEM_PLACEHOLDER);
        assert_eq!(leaf.value(), "x");
    }

    #[test]
    fn scalar_values_land_in_value() {
        let doc = build_document(vec![obj(vec![(
            "changes",
            SourceNode::Array(vec![obj(vec![("sql", scalar("select 1"))])]),
        )])]);
        let sql = doc.roots().next().unwrap();
        assert_eq!(sql.name(), "sql");
        assert_eq!(sql.value(), "select 1");
        assert!(sql.properties().is_empty());
    }
}
