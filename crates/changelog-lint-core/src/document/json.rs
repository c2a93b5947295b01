//! JSON adapter backed by `serde_json`.

use super::tree::{build_document, SourceNode};
use super::{Document, DocumentError, DocumentParser};
use crate::format::Format;
use serde_json::Value;

/// Reads JSON changelogs.
///
/// Objects keep their field order (`preserve_order`). A key repeated inside
/// one object keeps the value of its last occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl DocumentParser for JsonParser {
    fn format(&self) -> Format {
        Format::Json
    }

    fn parse(&self, content: &str) -> Result<Document, DocumentError> {
        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        let value: Value = serde_json::from_str(content).map_err(|e| DocumentError::Syntax {
            format: Format::Json,
            message: e.to_string(),
            line: e.line(),
            column: char_column(content, e.line(), e.column()),
        })?;

        Ok(build_document(vec![lower(value)]))
    }
}

/// `serde_json` counts columns in bytes; locations count characters.
fn char_column(content: &str, line: usize, byte_column: usize) -> usize {
    let Some(text) = line.checked_sub(1).and_then(|i| content.lines().nth(i)) else {
        return byte_column;
    };
    let mut end = byte_column.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].chars().count()
}

fn lower(value: Value) -> SourceNode {
    match value {
        Value::Object(map) => {
            SourceNode::Object(map.into_iter().map(|(k, v)| (k, lower(v))).collect())
        }
        Value::Array(items) => SourceNode::Array(items.into_iter().map(lower).collect()),
        Value::String(s) => SourceNode::Scalar(s),
        Value::Number(n) => SourceNode::Scalar(n.to_string()),
        Value::Bool(b) => SourceNode::Scalar(b.to_string()),
        Value::Null => SourceNode::Scalar(String::new()),
    }
}
