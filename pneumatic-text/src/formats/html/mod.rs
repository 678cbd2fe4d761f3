//! HTML format implementation
//!
//! Export only. HTML is one of the clipboard flavours written on copy and a
//! `convert` target of the CLI.
//!
//! # Library Choice
//!
//! The `html5ever` + `markup5ever_rcdom` pair builds and serializes the DOM,
//! so escaping and void elements follow the HTML5 serializer rules.
//!
//! # Element Mapping Table
//!
//! | Document element | HTML                                                         |
//! |------------------|--------------------------------------------------------------|
//! | Paragraph        | `<p>`                                                        |
//! | Heading          | `<h1>`..`<h6>`                                               |
//! | Quote            | `<blockquote><p>`                                            |
//! | List             | `<ul>` / `<ol>` with `<li>`                                  |
//! | Checklist        | `<ul class="checklist" data-list-api-name>`                  |
//! | Checklist item   | `<li class="checklist-item" data-item-api-name>`             |
//! | CodeBlock        | `<pre><code data-language>`                                  |
//! | Variable         | `<span class="variable" data-variable-api-name>title</span>` |
//! | Mention          | `<span class="mention" data-mention-id>@name</span>`         |

mod serializer;

pub use serializer::{serialize_to_html, serialize_to_html_document};

use crate::document::Document;
use crate::error::EditorError;
use crate::format::Format;

/// Format implementation for HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    /// Emit a complete page instead of a fragment.
    standalone: bool,
}

impl HtmlFormat {
    pub fn fragment() -> Self {
        Self { standalone: false }
    }

    pub fn standalone() -> Self {
        Self { standalone: true }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML5 export"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, EditorError> {
        if self.standalone {
            serializer::serialize_to_html_document(doc, "Document")
        } else {
            serializer::serialize_to_html(doc)
        }
    }
}
