//! Unified document model shared by every changelog format.
//!
//! All three adapters produce the same arena-backed [`Document`]:
//!
//! ```text
//! XML  (roxmltree) ─┐
//! JSON (serde_json) ─┼─▶ Document { nodes, tops } ──▶ Element<'doc> handles
//! YAML (serde_yaml) ─┘
//! ```
//!
//! Nodes own their children through the arena and refer to their parent by
//! [`NodeId`], so ancestor walks never create ownership cycles.

mod json;
mod tree;
mod xml;
mod yaml;

use crate::format::{Format, UnknownFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub use json::JsonParser;
pub use xml::XmlParser;
pub use yaml::YamlParser;

/// Reserved element name marking a changeset subtree.
pub const CHANGE_SET_TAG: &str = "changeSet";

/// Property holding a changeset's id.
pub const ID_PROPERTY: &str = "id";

/// Property holding a changeset's author.
pub const AUTHOR_PROPERTY: &str = "author";

/// Errors raised while turning a changelog file into a [`Document`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The content is not a well-formed document of its declared format.
    #[error("Invalid {format} document: {message}")]
    Syntax {
        /// Declared format of the file.
        format: Format,
        /// Parser error message.
        message: String,
        /// Line of the error (1-indexed, 0 if unknown).
        line: usize,
        /// Column of the error (1-indexed, 0 if unknown).
        column: usize,
    },

    /// The declared format is not one of the supported formats.
    #[error(transparent)]
    UnknownFormat(#[from] UnknownFormat),

    /// No format was declared and none could be derived from the file name.
    #[error("Cannot determine the changelog format of {path}")]
    UndeclaredFormat {
        /// The file without a recognizable extension.
        path: PathBuf,
    },
}

impl DocumentError {
    /// Returns the `(line, column)` of a syntax error, if known.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Self::Syntax { line, column, .. } if *line > 0 => Some((*line, *column)),
            _ => None,
        }
    }
}

/// A format adapter turning file content into a [`Document`].
///
/// Adapters are pure: the same content always yields the same tree.
pub trait DocumentParser: Send + Sync {
    /// The format this adapter reads.
    fn format(&self) -> Format;

    /// Parses the full content of one file.
    ///
    /// Whitespace-only content yields an empty document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Syntax`] if the content is malformed.
    fn parse(&self, content: &str) -> Result<Document, DocumentError>;
}

/// Returns the adapter for a declared format.
#[must_use]
pub fn parser_for(format: Format) -> &'static dyn DocumentParser {
    match format {
        Format::Xml => &XmlParser,
        Format::Yaml => &YamlParser,
        Format::Json => &JsonParser,
    }
}

/// Parses content with the adapter matching `format`.
///
/// # Errors
///
/// Returns an error if the content is malformed.
pub fn parse(content: &str, format: Format) -> Result<Document, DocumentError> {
    parser_for(format).parse(content)
}

/// Index of a node inside its [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Ordered string properties of an element.
///
/// Insertion keeps document order. Re-inserting an existing key replaces the
/// value in place (last value wins, first position kept).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(Vec<(String, String)>);

impl Properties {
    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Inserts a property, returning the replaced value if the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.0.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.0.push((key, value));
        None
    }

    /// Iterates `(key, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    properties: Properties,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    value: String,
}

/// A fully materialized changelog tree.
///
/// A document has zero or more top elements (one per XML file, one per YAML
/// document in a multi-document stream). The *roots* of a changelog are the
/// children of its top elements, in order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    tops: Vec<NodeId>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new element under `parent` (or detached if `None`).
    pub(crate) fn push(&mut self, parent: Option<NodeId>, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            properties: Properties::default(),
            children: Vec::new(),
            parent,
            value: String::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub(crate) fn set_property(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.nodes[id.0].properties.insert(key, value);
    }

    pub(crate) fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        self.nodes[id.0].value = value.into();
    }

    pub(crate) fn add_top(&mut self, id: NodeId) {
        self.tops.push(id);
    }

    /// Returns true if the document has no elements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the element with the given id, if it belongs to this document.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<Element<'_>> {
        (id.0 < self.nodes.len()).then_some(Element { doc: self, id })
    }

    /// Top elements, e.g. `databaseChangeLog`.
    pub fn tops(&self) -> impl Iterator<Item = Element<'_>> {
        self.tops.iter().map(|&id| Element { doc: self, id })
    }

    /// Root-level elements of the changelog in document order.
    pub fn roots(&self) -> impl Iterator<Item = Element<'_>> {
        self.tops().flat_map(Element::children)
    }

    /// Root-level changeset subtrees in document order.
    pub fn change_sets(&self) -> impl Iterator<Item = Element<'_>> {
        self.roots().filter(|e| e.is_change_set())
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// Borrowed handle to one element of a [`Document`].
#[derive(Clone, Copy)]
pub struct Element<'doc> {
    doc: &'doc Document,
    id: NodeId,
}

impl<'doc> Element<'doc> {
    /// Arena id of this element.
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Tag / key name.
    #[must_use]
    pub fn name(self) -> &'doc str {
        &self.doc.node(self.id).name
    }

    /// Scalar properties in document order.
    #[must_use]
    pub fn properties(self) -> &'doc Properties {
        &self.doc.node(self.id).properties
    }

    /// Returns a single property value.
    #[must_use]
    pub fn property(self, key: &str) -> Option<&'doc str> {
        self.properties().get(key)
    }

    /// Returns true if the property is present.
    #[must_use]
    pub fn has_property(self, key: &str) -> bool {
        self.properties().contains_key(key)
    }

    /// Scalar text of a leaf, empty otherwise.
    ///
    /// XML text is trimmed; JSON and YAML scalars are kept as written.
    #[must_use]
    pub fn value(self) -> &'doc str {
        &self.doc.node(self.id).value
    }

    /// Child elements in document order.
    pub fn children(self) -> impl Iterator<Item = Element<'doc>> {
        let doc = self.doc;
        doc.node(self.id)
            .children
            .iter()
            .map(move |&id| Element { doc, id })
    }

    /// Number of child elements.
    #[must_use]
    pub fn child_count(self) -> usize {
        self.doc.node(self.id).children.len()
    }

    /// Parent element, `None` for top elements.
    #[must_use]
    pub fn parent(self) -> Option<Element<'doc>> {
        self.doc
            .node(self.id)
            .parent
            .map(|id| Element { doc: self.doc, id })
    }

    /// Ancestors from the parent up to the top element.
    #[must_use]
    pub fn ancestors(self) -> Ancestors<'doc> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// This element and all of its descendants, pre-order.
    #[must_use]
    pub fn descendants(self) -> Descendants<'doc> {
        Descendants {
            doc: self.doc,
            stack: vec![self.id],
        }
    }

    /// Every element named `name` in this subtree, pre-order, `self` included.
    #[must_use]
    pub fn find_elements_by_name(self, name: &str) -> Vec<Element<'doc>> {
        self.descendants().filter(|e| e.name() == name).collect()
    }

    /// Returns true if this element is a changeset.
    #[must_use]
    pub fn is_change_set(self) -> bool {
        self.name() == CHANGE_SET_TAG
    }

    /// The changeset this element belongs to: itself or the nearest
    /// changeset ancestor.
    #[must_use]
    pub fn nearest_change_set(self) -> Option<Element<'doc>> {
        std::iter::once(self)
            .chain(self.ancestors())
            .find(|e| e.is_change_set())
    }

    /// Identity of the changeset this element belongs to.
    #[must_use]
    pub fn change_set_identity(self) -> Option<ChangeSetId> {
        self.nearest_change_set().map(|cs| {
            ChangeSetId::new(
                cs.property(ID_PROPERTY).unwrap_or_default(),
                cs.property(AUTHOR_PROPERTY).unwrap_or_default(),
            )
        })
    }

    /// Slash-separated names from the top element down to this one.
    #[must_use]
    pub fn path(self) -> String {
        let mut names: Vec<&str> = self.ancestors().map(Element::name).collect();
        names.reverse();
        names.push(self.name());
        names.join("/")
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Element<'_> {}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name())
            .field("properties", self.properties())
            .field("value", &self.value())
            .field("children", &self.child_count())
            .finish()
    }
}

/// Iterator over the ancestors of an element.
#[derive(Debug, Clone)]
pub struct Ancestors<'doc> {
    next: Option<Element<'doc>>,
}

impl<'doc> Iterator for Ancestors<'doc> {
    type Item = Element<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// Pre-order iterator over a subtree.
#[derive(Debug, Clone)]
pub struct Descendants<'doc> {
    doc: &'doc Document,
    stack: Vec<NodeId>,
}

impl<'doc> Iterator for Descendants<'doc> {
    type Item = Element<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.node(id).children.iter().rev().copied());
        Some(Element { doc: self.doc, id })
    }
}

/// Identity of a changeset within one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChangeSetId {
    /// Value of the `id` property.
    pub id: String,
    /// Value of the `author` property.
    pub author: String,
}

impl ChangeSetId {
    /// Creates a changeset identity.
    #[must_use]
    pub fn new(id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
        }
    }
}

impl fmt::Display for ChangeSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeSet(id='{}', author='{}')", self.id, self.author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new();
        let top = doc.push(None, "databaseChangeLog");
        doc.add_top(top);
        let cs = doc.push(Some(top), CHANGE_SET_TAG);
        doc.set_property(cs, ID_PROPERTY, "1");
        doc.set_property(cs, AUTHOR_PROPERTY, "alice");
        let table = doc.push(Some(cs), "createTable");
        doc.set_property(table, "tableName", "person");
        let column = doc.push(Some(table), "column");
        doc.set_property(column, "name", "id");
        doc.push(Some(top), "include");
        doc
    }

    #[test]
    fn roots_are_children_of_top() {
        let doc = sample();
        let names: Vec<&str> = doc.roots().map(Element::name).collect();
        assert_eq!(names, vec!["changeSet", "include"]);
        assert_eq!(doc.change_sets().count(), 1);
    }

    #[test]
    fn find_elements_by_name_includes_root() {
        let doc = sample();
        let cs = doc.change_sets().next().unwrap();
        assert_eq!(cs.find_elements_by_name(CHANGE_SET_TAG), vec![cs]);
        let columns = cs.find_elements_by_name("column");
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].property("name"), Some("id"));
    }

    #[test]
    fn descendants_are_pre_order() {
        let doc = sample();
        let top = doc.tops().next().unwrap();
        let names: Vec<&str> = top.descendants().map(Element::name).collect();
        assert_eq!(
            names,
            vec![
                "databaseChangeLog",
                "changeSet",
                "createTable",
                "column",
                "include"
            ]
        );
    }

    #[test]
    fn nested_elements_inherit_change_set_identity() {
        let doc = sample();
        let cs = doc.change_sets().next().unwrap();
        let column = cs.find_elements_by_name("column")[0];
        assert_eq!(
            column.change_set_identity(),
            Some(ChangeSetId::new("1", "alice"))
        );
        assert_eq!(column.path(), "databaseChangeLog/changeSet/createTable/column");

        let include = doc.roots().nth(1).unwrap();
        assert_eq!(include.change_set_identity(), None);
    }

    #[test]
    fn duplicate_property_keeps_last_value_first_position() {
        let mut props = Properties::default();
        props.insert("a", "1");
        props.insert("b", "2");
        assert_eq!(props.insert("a", "3"), Some("1".to_string()));
        assert_eq!(props.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn change_set_id_display() {
        assert_eq!(
            ChangeSetId::new("42", "bob").to_string(),
            "ChangeSet(id='42', author='bob')"
        );
    }
}
