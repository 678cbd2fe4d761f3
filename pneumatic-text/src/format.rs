//! Format trait definition
//!
//! A format converts between a textual representation and a [`Document`].
//! Formats can support parsing, serialization, or both.

use crate::document::Document;
use crate::error::EditorError;
use crate::formats::markdown::DecodeOptions;

/// Trait for document formats
///
/// # Examples
///
/// ```ignore
/// struct PlainFormat;
///
/// impl Format for PlainFormat {
///     fn name(&self) -> &str {
///         "plain"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, doc: &Document) -> Result<String, EditorError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "html")
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// File extensions without the leading dot, used to detect the format
    /// from a filename.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a Document. The options carry the variable
    /// catalog; formats that store resolved tokens ignore them.
    fn parse(&self, _source: &str, _options: &DecodeOptions) -> Result<Document, EditorError> {
        Err(EditorError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Document into source text
    fn serialize(&self, _doc: &Document) -> Result<String, EditorError> {
        Err(EditorError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
