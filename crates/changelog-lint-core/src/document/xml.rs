//! XML adapter backed by `roxmltree`.

use super::{Document, DocumentError, DocumentParser, NodeId};
use crate::format::Format;

/// Reads XML changelogs.
///
/// Tags become element names, attributes become properties, and the first
/// non-blank text (or CDATA) node becomes the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

impl DocumentParser for XmlParser {
    fn format(&self) -> Format {
        Format::Xml
    }

    fn parse(&self, content: &str) -> Result<Document, DocumentError> {
        let mut doc = Document::new();
        if content.trim().is_empty() {
            return Ok(doc);
        }

        let xml = roxmltree::Document::parse(content).map_err(|e| {
            let pos = e.pos();
            DocumentError::Syntax {
                format: Format::Xml,
                message: e.to_string(),
                line: pos.row as usize,
                column: pos.col as usize,
            }
        })?;

        let top = build(&mut doc, None, xml.root_element());
        doc.add_top(top);
        Ok(doc)
    }
}

fn build(doc: &mut Document, parent: Option<NodeId>, node: roxmltree::Node<'_, '_>) -> NodeId {
    let id = doc.push(parent, node.tag_name().name());
    for attr in node.attributes() {
        doc.set_property(id, attr.name(), attr.value());
    }
    doc.set_value(id, first_text(node));

    for child in node.children().filter(roxmltree::Node::is_element) {
        build(doc, Some(id), child);
    }
    id
}

fn first_text<'a>(node: roxmltree::Node<'a, '_>) -> &'a str {
    node.children()
        .filter(roxmltree::Node::is_text)
        .filter_map(|n| n.text())
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGELOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<databaseChangeLog xmlns="http://www.liquibase.org/xml/ns/dbchangelog">
    <!-- first change -->
    <changeSet id="1" author="alice">
        <createTable tableName="person">
            <column name="id" type="int"/>
        </createTable>
        <sql><![CDATA[select 1]]></sql>
    </changeSet>
    <include file="other.xml"/>
</databaseChangeLog>
"#;

    #[test]
    fn builds_tree_from_elements() {
        let doc = XmlParser.parse(CHANGELOG).unwrap();
        let top = doc.tops().next().unwrap();
        assert_eq!(top.name(), "databaseChangeLog");

        let roots: Vec<_> = doc.roots().map(|e| e.name()).collect();
        assert_eq!(roots, vec!["changeSet", "include"]);

        let cs = doc.change_sets().next().unwrap();
        assert_eq!(cs.property("id"), Some("1"));
        assert_eq!(cs.value(), "");

        let sql = cs.find_elements_by_name("sql")[0];
        assert_eq!(sql.value(), "select 1");

        let column = cs.find_elements_by_name("column")[0];
        assert_eq!(column.parent().map(|p| p.name()), Some("createTable"));
    }

    #[test]
    fn attributes_keep_document_order() {
        let doc = XmlParser
            .parse(r#"<root><createIndex unique="true" indexName="idx" tableName="t"/></root>"#)
            .unwrap();
        let index = doc.roots().next().unwrap();
        let keys: Vec<&str> = index.properties().keys().collect();
        assert_eq!(keys, vec!["unique", "indexName", "tableName"]);
    }

    #[test]
    fn empty_content_is_empty_document() {
        let doc = XmlParser.parse("  \n").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.roots().count(), 0);
    }

    #[test]
    fn malformed_xml_reports_position() {
        let err = XmlParser.parse("<root>\n  <open>\n</root>").unwrap_err();
        assert!(matches!(err, DocumentError::Syntax { format: Format::Xml, .. }));
        assert!(err.position().is_some());
    }
}
