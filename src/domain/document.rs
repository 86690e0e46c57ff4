//! Jira's rich-text document format, in both directions.
//!
//! Outbound bodies (comments, descriptions) are built as a `doc` holding
//! paragraphs of plain text. Inbound documents are parsed into a small
//! tagged tree so their text can be flattened for terminal output.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Document {
    #[serde(rename = "type")]
    doc_type: &'static str,
    version: u8,
    content: Vec<Paragraph>,
}

impl Document {
    /// A document with one paragraph holding `text` verbatim.
    pub fn paragraph(text: &str) -> Self {
        Self {
            doc_type: "doc",
            version: 1,
            content: vec![Paragraph::new(text.to_string())],
        }
    }

    /// One paragraph per blank-line separated block; single newlines are joined.
    pub fn from_plain_text(text: &str) -> Self {
        let cleaned = text.replace('\r', "");
        let content = cleaned
            .split("\n\n")
            .map(|section| section.trim())
            .filter(|section| !section.is_empty())
            .map(|section| Paragraph::new(section.replace('\n', " ").trim().to_string()))
            .collect::<Vec<_>>();

        if content.is_empty() {
            return Self::paragraph(text.trim());
        }

        Self {
            doc_type: "doc",
            version: 1,
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
struct Paragraph {
    #[serde(rename = "type")]
    node_type: &'static str,
    content: Vec<TextRun>,
}

impl Paragraph {
    fn new(text: String) -> Self {
        Self {
            node_type: "paragraph",
            content: vec![TextRun {
                text_type: "text",
                text,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
struct TextRun {
    #[serde(rename = "type")]
    text_type: &'static str,
    text: String,
}

/// Parsed document node. Every non-text node kind is treated as a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocNode {
    Text(String),
    Container(Vec<DocNode>),
}

impl DocNode {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                if map.get("type").and_then(Value::as_str) == Some("text") {
                    let text = map.get("text").and_then(Value::as_str).unwrap_or_default();
                    return DocNode::Text(text.to_string());
                }
                let children = map
                    .get("content")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(DocNode::from_value).collect())
                    .unwrap_or_default();
                DocNode::Container(children)
            }
            Value::Array(items) => DocNode::Container(items.iter().map(DocNode::from_value).collect()),
            _ => DocNode::Container(Vec::new()),
        }
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        match self {
            DocNode::Text(text) => parts.push(text),
            DocNode::Container(children) => {
                for child in children {
                    child.collect_text(parts);
                }
            }
        }
    }

    /// Text leaves in document order, joined by single spaces.
    pub fn plain_text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }
}

/// Flattens a description or comment body that may be a document or a plain string.
pub fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(DocNode::from_value(other).plain_text()),
    }
}
