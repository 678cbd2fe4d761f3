//! Markdown encoding (Document → text)
//!
//! Mirrors the decoder: checklist containers become one
//! `[clist:list|item]content[/clist]` line group per item, variables become
//! `{{api_name}}`, mentions `[name|id]`, and the standard blocks use plain
//! CommonMark. Text is escaped so that decoding the output yields the same
//! text back.
//!
//! The output is written by hand rather than through comrak's formatter:
//! comrak would escape the token syntax and cannot express checklist markers.

use crate::document::fragment::Fragment;
use crate::document::nodes::{Block, ChecklistContainer, Document, Inline, List};
use crate::error::EditorError;
use std::fmt::Write as _;

/// Encode `doc`. Never fails: an internal error is logged and yields an
/// empty string.
pub fn encode(doc: &Document) -> String {
    match try_encode(doc) {
        Ok(markdown) => markdown,
        Err(err) => {
            tracing::error!(error = %err, "markdown encoding failed, returning empty output");
            String::new()
        }
    }
}

/// Encode `doc`, reporting what made it unencodable.
pub fn try_encode(doc: &Document) -> Result<String, EditorError> {
    encode_blocks(&doc.blocks)
}

/// Encode a detached fragment, re-wrapping orphaned checklist items first.
pub fn encode_fragment(fragment: &Fragment) -> String {
    encode(&Document::new(fragment.clone().into_blocks()))
}

fn encode_blocks(blocks: &[Block]) -> Result<String, EditorError> {
    let mut parts = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let Some(text) = encode_block(block)? {
            parts.push(text);
        }
    }
    Ok(parts.join("\n\n"))
}

fn encode_block(block: &Block) -> Result<Option<String>, EditorError> {
    let text = match block {
        Block::Paragraph(paragraph) => {
            if paragraph.is_empty() {
                return Ok(None);
            }
            encode_inlines(&paragraph.content, "\n")?
        }
        Block::Heading(heading) => {
            let level = heading.level.clamp(1, 6) as usize;
            let content = encode_inlines(&heading.content, " ")?;
            let marker = "#".repeat(level);
            if content.is_empty() {
                marker
            } else {
                format!("{marker} {content}")
            }
        }
        Block::Quote(quote) => {
            let content = encode_inlines(&quote.content, "\n")?;
            prefix_lines(&content, "> ", ">")
        }
        Block::List(list) => encode_list(list)?,
        Block::Checklist(container) => {
            if container.items.is_empty() {
                tracing::debug!(
                    list = %container.list_api_name,
                    "skipping empty checklist container"
                );
                return Ok(None);
            }
            encode_checklist(container)?
        }
        Block::CodeBlock(code) => {
            let fence = "`".repeat(longest_run(&code.literal, '`').max(2) + 1);
            let language = code.language.as_deref().unwrap_or("");
            format!("{fence}{language}\n{}\n{fence}", code.literal)
        }
    };
    Ok(Some(text))
}

fn encode_checklist(container: &ChecklistContainer) -> Result<String, EditorError> {
    validate_api_name("list", &container.list_api_name, CHECKLIST_FORBIDDEN)?;
    let mut lines = Vec::with_capacity(container.items.len());
    for item in &container.items {
        validate_api_name("item", &item.item_api_name, CHECKLIST_FORBIDDEN)?;
        let content = encode_inlines(&item.paragraph.content, "\n")?;
        lines.push(format!(
            "[clist:{}|{}]{}{}",
            container.list_api_name,
            item.item_api_name,
            content,
            super::transformers::CHECKLIST_END
        ));
    }
    Ok(lines.join("\n"))
}

fn encode_list(list: &List) -> Result<String, EditorError> {
    let mut items = Vec::with_capacity(list.items.len());
    for (index, item) in list.items.iter().enumerate() {
        let marker = if list.ordered {
            format!("{}. ", index + 1)
        } else {
            "- ".to_string()
        };
        let pad = " ".repeat(marker.len());
        let body = encode_inlines(&item.content, "\n")?;

        let mut text = if body.is_empty() {
            marker.trim_end().to_string()
        } else {
            format!("{marker}{}", indent_continuation(&body, &pad))
        };
        for child in &item.children {
            let Some(child_text) = encode_block(child)? else {
                continue;
            };
            // A blank line keeps a nested paragraph from joining the item text.
            let separator = if matches!(child, Block::List(_)) { "\n" } else { "\n\n" };
            text.push_str(separator);
            text.push_str(&prefix_lines(&child_text, &pad, ""));
        }
        items.push(text);
    }
    Ok(items.join("\n"))
}

fn indent_continuation(text: &str, pad: &str) -> String {
    text.split('\n')
        .enumerate()
        .map(|(index, line)| {
            if index == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn prefix_lines(text: &str, prefix: &str, blank_prefix: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                blank_prefix.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const CHECKLIST_FORBIDDEN: &[char] = &['|', '[', ']', '\\'];
const VARIABLE_FORBIDDEN: &[char] = &['{', '}', '\\'];

/// Whether `name` can be written as a checklist list or item id.
pub fn is_writable_checklist_id(name: &str) -> bool {
    validate_api_name("checklist", name, CHECKLIST_FORBIDDEN).is_ok()
}

/// Whether `name` can be written as `{{name}}`.
pub fn is_writable_variable_name(name: &str) -> bool {
    validate_api_name("variable", name, VARIABLE_FORBIDDEN).is_ok()
}

fn validate_api_name(kind: &str, name: &str, forbidden: &[char]) -> Result<(), EditorError> {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || forbidden.contains(&c)) {
        return Err(EditorError::SerializationError(format!(
            "{kind} api name {name:?} cannot be written as markdown"
        )));
    }
    Ok(())
}

fn longest_run(text: &str, needle: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == needle {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Encode a run of inline content. `line_break` is what a [`Inline::LineBreak`]
/// turns into: a newline, or a space where the block cannot span lines.
fn encode_inlines(content: &[Inline], line_break: &str) -> Result<String, EditorError> {
    let mut writer = InlineWriter {
        out: String::new(),
        line_break,
        at_line_start: true,
        after_mention: false,
    };
    writer.write_all(content)?;
    Ok(writer.out)
}

struct InlineWriter<'a> {
    out: String,
    line_break: &'a str,
    at_line_start: bool,
    after_mention: bool,
}

impl InlineWriter<'_> {
    fn write_all(&mut self, content: &[Inline]) -> Result<(), EditorError> {
        for node in content {
            self.write(node)?;
        }
        Ok(())
    }

    fn write(&mut self, node: &Inline) -> Result<(), EditorError> {
        match node {
            Inline::Text { text } => self.write_text(text),
            Inline::Bold { children } => self.write_wrapped("**", children)?,
            Inline::Italic { children } => self.write_wrapped("*", children)?,
            Inline::Strikethrough { children } => self.write_wrapped("~~", children)?,
            Inline::Code { literal } => {
                if !literal.is_empty() {
                    let fence = "`".repeat(longest_run(literal, '`') + 1);
                    let pad = if literal.starts_with(['`', ' ']) || literal.ends_with(['`', ' '])
                    {
                        " "
                    } else {
                        ""
                    };
                    write!(self.out, "{fence}{pad}{literal}{pad}{fence}")?;
                    self.mark_written();
                }
            }
            Inline::Link { url, children } => {
                self.out.push('[');
                self.mark_written();
                self.write_all(children)?;
                if url.contains([' ', '(', ')', '<', '>']) {
                    write!(self.out, "](<{}>)", url.replace(['<', '>'], ""))?;
                } else {
                    write!(self.out, "]({url})")?;
                }
                self.mark_written();
            }
            Inline::LineBreak => {
                self.out.push_str(self.line_break);
                self.at_line_start = self.line_break == "\n";
                self.after_mention = false;
            }
            Inline::Variable(token) => {
                validate_api_name("variable", &token.api_name, VARIABLE_FORBIDDEN)?;
                write!(self.out, "{{{{{}}}}}", token.api_name)?;
                self.mark_written();
            }
            Inline::Mention(token) => {
                let name = token.name.trim();
                if name.is_empty() || name.contains(['[', ']', '|', '\n']) {
                    return Err(EditorError::SerializationError(format!(
                        "mention name {:?} cannot be written as markdown",
                        token.name
                    )));
                }
                write!(self.out, "[{name}|{}]", token.id)?;
                self.mark_written();
                self.after_mention = true;
            }
        }
        Ok(())
    }

    fn write_wrapped(&mut self, marker: &str, children: &[Inline]) -> Result<(), EditorError> {
        if crate::document::inline::is_empty_content(children) {
            return Ok(());
        }
        self.out.push_str(marker);
        self.mark_written();
        self.write_all(children)?;
        self.out.push_str(marker);
        self.mark_written();
        Ok(())
    }

    fn mark_written(&mut self) {
        self.at_line_start = false;
        self.after_mention = false;
    }

    fn write_text(&mut self, text: &str) {
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                self.out.push_str(self.line_break);
                self.at_line_start = self.line_break == "\n";
                self.after_mention = false;
            }
            let line = if self.at_line_start {
                line.trim_start()
            } else {
                line
            };
            if line.is_empty() {
                continue;
            }
            escape_text(line, self.at_line_start, self.after_mention, &mut self.out);
            self.mark_written();
        }
    }
}

fn escape_text(text: &str, at_line_start: bool, after_mention: bool, out: &mut String) {
    let mut chars = text.char_indices().peekable();

    if at_line_start {
        let digits = text.chars().take_while(char::is_ascii_digit).count();
        let after_digits = text[digits..].chars().next();
        if digits > 0 && matches!(after_digits, Some('.') | Some(')')) {
            out.push_str(&text[..digits]);
            out.push('\\');
            for _ in 0..digits {
                chars.next();
            }
        } else if let Some(first) = text.chars().next() {
            if matches!(first, '#' | '>' | '-' | '+' | '=') {
                out.push('\\');
            }
        }
    } else if after_mention && text.starts_with(['(', ':']) {
        out.push('\\');
    }

    for (_, c) in chars {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '~' | '<' | '&') {
            out.push('\\');
        }
        out.push(c);
    }
}
