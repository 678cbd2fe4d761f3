//! Format registry for format discovery and selection
//!
//! Formats are registered and retrieved by name, or detected from a
//! filename's extension.

use crate::document::Document;
use crate::error::EditorError;
use crate::format::Format;
use crate::formats::markdown::DecodeOptions;
use std::collections::HashMap;

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let doc = registry.parse("[clist:L|a]x[/clist]", "markdown", &DecodeOptions::default())?;
/// let html = registry.serialize(&doc, "html")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format, replacing any format with the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, EditorError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| EditorError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        self.formats
            .values()
            .find(|format| format.file_extensions().contains(&extension))
            .map(|format| format.name().to_string())
    }

    /// Parse source text using the specified format
    pub fn parse(
        &self,
        source: &str,
        format: &str,
        options: &DecodeOptions,
    ) -> Result<Document, EditorError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(EditorError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source, options)
    }

    /// Serialize a document using the specified format
    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, EditorError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(EditorError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(doc)
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::formats::markdown::MarkdownFormat);
        registry.register(crate::formats::html::HtmlFormat::default());
        registry.register(crate::formats::json::JsonFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::nodes::{Block, Inline};

    struct TestFormat;
    impl Format for TestFormat {
        fn name(&self) -> &str {
            "test"
        }
        fn supports_parsing(&self) -> bool {
            true
        }
        fn supports_serialization(&self) -> bool {
            true
        }
        fn parse(&self, _source: &str, _options: &DecodeOptions) -> Result<Document, EditorError> {
            Ok(Document::new(vec![Block::paragraph(vec![Inline::text("test")])]))
        }
        fn serialize(&self, _doc: &Document) -> Result<String, EditorError> {
            Ok("test output".to_string())
        }
    }

    #[test]
    fn test_registry_register() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);
        registry.register(TestFormat);

        assert!(registry.has("test"));
        assert_eq!(registry.list_formats(), vec!["test"]);
    }

    #[test]
    fn test_registry_parse_and_serialize() {
        let mut registry = FormatRegistry::new();
        registry.register(TestFormat);

        let doc = registry
            .parse("input", "test", &DecodeOptions::default())
            .unwrap();
        assert_eq!(registry.serialize(&doc, "test").unwrap(), "test output");
    }

    #[test]
    fn test_registry_not_found() {
        let registry = FormatRegistry::new();
        match registry.serialize(&Document::default(), "nonexistent") {
            Err(EditorError::FormatNotFound(name)) => assert_eq!(name, "nonexistent"),
            other => panic!("Expected FormatNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_html_does_not_parse() {
        let registry = FormatRegistry::with_defaults();
        assert!(matches!(
            registry.parse("<p>x</p>", "html", &DecodeOptions::default()),
            Err(EditorError::NotSupported(_))
        ));
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["html", "json", "markdown"]);
    }

    #[test]
    fn test_detect_format_from_filename() {
        let registry = FormatRegistry::with_defaults();

        assert_eq!(
            registry.detect_format_from_filename("notes.md"),
            Some("markdown".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("/tmp/doc.json"),
            Some("json".to_string())
        );
        assert_eq!(
            registry.detect_format_from_filename("page.htm"),
            Some("html".to_string())
        );
        assert_eq!(registry.detect_format_from_filename("doc.unknown"), None);
        assert_eq!(registry.detect_format_from_filename("doc"), None);
    }
}
