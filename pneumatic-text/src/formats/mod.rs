//! Format implementations
//!
//! Converters between the [`Document`](crate::document::Document) tree and
//! its textual representations.

pub mod html;
pub mod json;
pub mod markdown;

pub use html::HtmlFormat;
pub use json::JsonFormat;
pub use markdown::MarkdownFormat;
