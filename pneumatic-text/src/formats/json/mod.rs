//! JSON snapshot format
//!
//! The serde representation of [`Document`]. Tokens keep their resolved
//! titles, so parsing does not consult the variable catalog.

use crate::document::Document;
use crate::error::EditorError;
use crate::format::Format;
use crate::formats::markdown::DecodeOptions;

pub fn serialize_to_json(doc: &Document) -> Result<String, EditorError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub fn parse_from_json(source: &str) -> Result<Document, EditorError> {
    Ok(serde_json::from_str(source)?)
}

/// Format implementation for the JSON snapshot
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Structural JSON snapshot of the document tree"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, _options: &DecodeOptions) -> Result<Document, EditorError> {
        parse_from_json(source)
    }

    fn serialize(&self, doc: &Document) -> Result<String, EditorError> {
        serialize_to_json(doc)
    }
}
