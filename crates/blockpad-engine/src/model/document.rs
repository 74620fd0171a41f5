//! The document JSON boundary: an array of blocks, nothing else.

use super::block::Block;

/// Ordered sequence of top-level blocks, with no enclosing wrapper.
pub type Document = Vec<Block>;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Invalid document JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Document JSON must be an array of blocks, found {0}")]
    NotAnArray(&'static str),
}

/// Parse a document from JSON text.
///
/// Only a top-level array is accepted. On error nothing is produced, so the
/// caller keeps whatever document it already had.
pub fn from_json(source: &str) -> Result<Document, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(source)?;
    let kind = match &value {
        serde_json::Value::Array(_) => None,
        serde_json::Value::Null => Some("null"),
        serde_json::Value::Bool(_) => Some("a boolean"),
        serde_json::Value::Number(_) => Some("a number"),
        serde_json::Value::String(_) => Some("a string"),
        serde_json::Value::Object(_) => Some("an object"),
    };
    if let Some(kind) = kind {
        return Err(DocumentError::NotAnArray(kind));
    }
    Ok(serde_json::from_value(value)?)
}

pub fn to_json(document: &[Block]) -> Result<String, DocumentError> {
    Ok(serde_json::to_string(document)?)
}

/// Two-space indented JSON, the layout used for saved files.
pub fn to_json_pretty(document: &[Block]) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(document)?)
}
