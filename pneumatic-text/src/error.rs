//! Error types for document operations

use std::fmt;

/// Errors that can occur while converting or editing documents
#[derive(Debug, Clone, PartialEq)]
pub enum EditorError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during parsing
    ParseError(String),
    /// Error during serialization
    SerializationError(String),
    /// Format does not support the requested operation
    NotSupported(String),
    /// The clipboard rejected a write
    Clipboard(String),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            EditorError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            EditorError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            EditorError::NotSupported(msg) => write!(f, "Operation not supported: {msg}"),
            EditorError::Clipboard(msg) => write!(f, "Clipboard error: {msg}"),
        }
    }
}

impl std::error::Error for EditorError {}

impl From<fmt::Error> for EditorError {
    fn from(e: fmt::Error) -> Self {
        EditorError::SerializationError(format!("write failed: {e}"))
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            EditorError::ParseError(e.to_string())
        } else {
            EditorError::SerializationError(e.to_string())
        }
    }
}
