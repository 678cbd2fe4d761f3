//! Markdown format implementation
//!
//! Bidirectional conversion between the persisted markdown dialect and the
//! [`Document`] tree.
//!
//! # Library Choice
//!
//! Standard constructs are parsed with the `comrak` crate. The dialect adds
//! three constructs comrak knows nothing about, handled around it:
//! - checklist items, claimed line by line by a [`BlockTransformer`] before
//!   comrak sees the text,
//! - `{{api_name}}` variables and `[name|id]` mentions, found in comrak's
//!   text leaves by the inline token resolver.
//!
//! Output is written directly (see [`serializer`]).
//!
//! # Element Mapping Table
//!
//! | Document element   | Markdown                                 | Notes                               |
//! |--------------------|------------------------------------------|-------------------------------------|
//! | Paragraph          | Paragraph                                | Empty paragraphs are not written    |
//! | Heading            | `#` .. `######`                          | Level clamped to 1-6                |
//! | Quote              | `> ` lines                               | Inner blocks flatten to one run     |
//! | List               | `- ` / `1. `                             | Nested lists indent under the item  |
//! | Checklist          | `[clist:list\|item]..[/clist]` per item  | Items joined by a single newline    |
//! | CodeBlock          | fenced code block                        | Contents never tokenized            |
//! | Inline:            |                                          |                                     |
//! |   Bold / Italic    | `**x**` / `*x*`                          |                                     |
//! |   Strikethrough    | `~~x~~`                                  |                                     |
//! |   Code             | `` `x` ``                                | Fence grows past inner backticks    |
//! |   Link             | `[text](url)`                            | Images import as links              |
//! |   Variable         | `{{api_name}}`                           | Title resolved from the catalog     |
//! |   Mention          | `[name\|id]`                             | Non-integer id stays plain text     |
//!
//! # Lossy Conversions
//!
//! - Horizontal rules are dropped on import.
//! - Text that happens to spell a token (`{{x}}`, `[a|1]`) imports as a token.
//! - Blank lines inside a checklist item collapse to a single line break.
//! - Leading whitespace at the start of a line is not preserved.

pub mod normalize;
pub mod parser;
pub mod serializer;
pub mod transformers;

pub use normalize::normalize_checklist_markers;
pub use parser::{decode, decode_with, parse_inline_markdown, DecodeOptions};
pub use serializer::{
    encode, encode_fragment, is_writable_checklist_id, is_writable_variable_name, try_encode,
};
pub use transformers::{BlockTransformer, ChecklistTransformer};

use crate::document::Document;
use crate::error::EditorError;
use crate::format::Format;

/// Format implementation for Markdown
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Markdown with checklist, variable and mention tokens"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, options: &DecodeOptions) -> Result<Document, EditorError> {
        Ok(decode(source, options))
    }

    fn serialize(&self, doc: &Document) -> Result<String, EditorError> {
        try_encode(doc)
    }
}
