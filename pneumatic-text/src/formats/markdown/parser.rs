//! Markdown decoding (text → Document)
//!
//! Pipeline: checklist pre-pass → line-level block transformers → comrak for
//! the unclaimed segments → Document blocks, with every text leaf run through
//! the inline token resolver.
//!
//! Decoding never fails. Anything a transformer declines, and anything comrak
//! cannot give structure to, ends up as literal paragraph text.

use super::normalize::normalize_checklist_markers;
use super::transformers::{
    append_checklist_item, default_block_transformers, BlockTransformer, ImportContext, Imported,
};
use crate::document::inline::normalize_inlines;
use crate::document::nodes::{
    Block, CodeBlock, Document, Heading, Inline, List, ListItem, Paragraph, Quote,
};
use crate::inline::{tokenize_inlines, VariableCatalog};
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

/// Options accepted by [`decode`].
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Catalog used to resolve variable titles.
    pub template_variables: VariableCatalog,
    /// Run the checklist marker pre-pass before parsing.
    pub normalize_checklists: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            template_variables: VariableCatalog::new(),
            normalize_checklists: true,
        }
    }
}

impl DecodeOptions {
    pub fn with_variables(template_variables: VariableCatalog) -> Self {
        Self {
            template_variables,
            ..Self::default()
        }
    }
}

/// Decode markdown with the built-in block transformers.
pub fn decode(text: &str, options: &DecodeOptions) -> Document {
    decode_with(text, options, default_block_transformers())
}

/// Decode markdown with a custom block transformer list. Transformers are
/// tried in order on every line; the first that claims the line wins.
pub fn decode_with(
    text: &str,
    options: &DecodeOptions,
    transformers: &[&dyn BlockTransformer],
) -> Document {
    let source = if options.normalize_checklists {
        normalize_checklist_markers(text)
    } else {
        text.to_string()
    };
    let catalog = &options.template_variables;
    let ctx = ImportContext { catalog };

    let mut lines: Vec<String> = source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();

    let mut document = Document::default();
    let mut pending: Vec<String> = Vec::new();
    let mut fence: Option<String> = None;
    let mut index = 0;

    while index < lines.len() {
        // Lines inside a fenced code block belong to comrak untouched.
        if let Some(open) = &fence {
            if lines[index].trim_start().starts_with(open.as_str()) {
                fence = None;
            }
            pending.push(lines[index].clone());
            index += 1;
            continue;
        }
        if let Some(open) = fence_marker(&lines[index]) {
            fence = Some(open);
            pending.push(lines[index].clone());
            index += 1;
            continue;
        }

        let claimed = transformers
            .iter()
            .find_map(|transformer| transformer.import(&lines, index, &ctx));

        let Some(import) = claimed else {
            pending.push(lines[index].clone());
            index += 1;
            continue;
        };

        flush_markdown(&mut pending, &mut document, catalog);
        match import.imported {
            Imported::Block(block) => document.blocks.push(block),
            Imported::ChecklistItem(item) => append_checklist_item(&mut document, item),
        }
        match import.remainder {
            // Re-scan what followed the end marker as if it began a line.
            Some(rest) => {
                index = import.next_line - 1;
                lines[index] = rest;
            }
            None => index = import.next_line,
        }
    }
    flush_markdown(&mut pending, &mut document, catalog);

    tracing::debug!(blocks = document.blocks.len(), "decoded markdown document");
    document
}

/// Parse a markdown snippet and flatten it into one run of inline content.
/// Block boundaries inside the snippet become line breaks.
pub fn parse_inline_markdown(text: &str, catalog: &VariableCatalog) -> Vec<Inline> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let blocks = parse_blocks(text, catalog);
    normalize_inlines(flatten_blocks(blocks))
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options
}

/// Opening fence of a code block (three or more backticks or tildes).
pub(super) fn fence_marker(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let fence_char = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = trimmed.chars().take_while(|c| *c == fence_char).count();
    (run >= 3).then(|| fence_char.to_string().repeat(run))
}

fn flush_markdown(pending: &mut Vec<String>, document: &mut Document, catalog: &VariableCatalog) {
    if pending.iter().all(|line| line.trim().is_empty()) {
        pending.clear();
        return;
    }
    let segment = pending.join("\n");
    pending.clear();
    document.blocks.extend(parse_blocks(&segment, catalog));
}

fn parse_blocks(source: &str, catalog: &VariableCatalog) -> Vec<Block> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);
    let mut blocks = Vec::new();
    collect_blocks(root, catalog, &mut blocks);
    blocks
}

fn collect_blocks<'a>(node: &'a AstNode<'a>, catalog: &VariableCatalog, out: &mut Vec<Block>) {
    let node_data = node.data.borrow();

    match &node_data.value {
        NodeValue::Paragraph => {
            out.push(Block::Paragraph(Paragraph::new(inline_children(
                node, catalog,
            ))));
        }

        NodeValue::Heading(heading) => {
            out.push(Block::Heading(Heading {
                level: heading.level,
                content: inline_children(node, catalog),
            }));
        }

        NodeValue::BlockQuote => {
            let mut inner = Vec::new();
            for child in node.children() {
                collect_blocks(child, catalog, &mut inner);
            }
            out.push(Block::Quote(Quote {
                content: normalize_inlines(flatten_blocks(inner)),
            }));
        }

        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            let items = node
                .children()
                .map(|item| list_item(item, catalog))
                .collect();
            out.push(Block::List(List { ordered, items }));
        }

        NodeValue::CodeBlock(code_block) => {
            let language = code_block
                .info
                .split_whitespace()
                .next()
                .map(str::to_string);
            let literal = code_block
                .literal
                .strip_suffix('\n')
                .unwrap_or(&code_block.literal)
                .to_string();
            out.push(Block::CodeBlock(CodeBlock { language, literal }));
        }

        // Raw HTML is kept visible as text rather than dropped.
        NodeValue::HtmlBlock(html) => {
            let text = html.literal.trim_end();
            if !text.is_empty() {
                out.push(Block::paragraph(text_with_breaks(text)));
            }
        }

        NodeValue::ThematicBreak => {}

        _ => {
            for child in node.children() {
                collect_blocks(child, catalog, out);
            }
        }
    }
}

/// First paragraph becomes the item's text; everything after it nests.
fn list_item<'a>(node: &'a AstNode<'a>, catalog: &VariableCatalog) -> ListItem {
    let mut blocks = Vec::new();
    for child in node.children() {
        collect_blocks(child, catalog, &mut blocks);
    }
    let mut item = ListItem::default();
    let mut rest = blocks.into_iter().peekable();
    if let Some(Block::Paragraph(_)) = rest.peek() {
        if let Some(Block::Paragraph(paragraph)) = rest.next() {
            item.content = paragraph.content;
        }
    }
    item.children = rest.collect();
    item
}

fn inline_children<'a>(node: &'a AstNode<'a>, catalog: &VariableCatalog) -> Vec<Inline> {
    let mut content = Vec::new();
    for child in node.children() {
        collect_inline_content(child, &mut content);
    }
    tokenize_inlines(content, catalog)
}

/// Recursively collect inline content (for nested inlines like bold/italic)
fn collect_inline_content<'a>(node: &'a AstNode<'a>, content: &mut Vec<Inline>) {
    let node_data = node.data.borrow();

    match &node_data.value {
        NodeValue::Text(text) => content.push(Inline::text(text.clone())),

        NodeValue::Strong => content.push(Inline::Bold {
            children: children_of(node),
        }),

        NodeValue::Emph => content.push(Inline::Italic {
            children: children_of(node),
        }),

        NodeValue::Strikethrough => content.push(Inline::Strikethrough {
            children: children_of(node),
        }),

        NodeValue::Code(code) => content.push(Inline::Code {
            literal: code.literal.clone(),
        }),

        NodeValue::Link(link) => content.push(Inline::Link {
            url: link.url.clone(),
            children: children_of(node),
        }),

        // Images have no block of their own here; keep them as a link.
        NodeValue::Image(link) => content.push(Inline::Link {
            url: link.url.clone(),
            children: children_of(node),
        }),

        NodeValue::SoftBreak | NodeValue::LineBreak => content.push(Inline::LineBreak),

        NodeValue::HtmlInline(raw) => content.push(Inline::text(raw.clone())),

        _ => {
            for child in node.children() {
                collect_inline_content(child, content);
            }
        }
    }
}

fn children_of<'a>(node: &'a AstNode<'a>) -> Vec<Inline> {
    let mut children = Vec::new();
    for child in node.children() {
        collect_inline_content(child, &mut children);
    }
    children
}

fn text_with_breaks(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            out.push(Inline::LineBreak);
        }
        if !line.is_empty() {
            out.push(Inline::text(line));
        }
    }
    out
}

/// Join the inline content of `blocks` with line breaks.
fn flatten_blocks(blocks: Vec<Block>) -> Vec<Inline> {
    let mut out = Vec::new();
    for block in blocks {
        let pieces: Vec<Vec<Inline>> = match block {
            Block::Paragraph(paragraph) => vec![paragraph.content],
            Block::Heading(heading) => vec![heading.content],
            Block::Quote(quote) => vec![quote.content],
            Block::CodeBlock(code) => vec![text_with_breaks(&code.literal)],
            Block::Checklist(container) => container
                .items
                .into_iter()
                .map(|item| item.paragraph.content)
                .collect(),
            Block::List(list) => list
                .items
                .into_iter()
                .flat_map(|item| {
                    let mut piece = vec![item.content];
                    if !item.children.is_empty() {
                        piece.push(flatten_blocks(item.children));
                    }
                    piece
                })
                .collect(),
        };
        for piece in pieces {
            if !out.is_empty() {
                out.push(Inline::LineBreak);
            }
            out.extend(piece);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::nodes::{ChecklistItem, MentionToken, VariableToken};
    use crate::inline::VariableCatalogEntry;

    fn decode_default(text: &str) -> Document {
        decode(text, &DecodeOptions::default())
    }

    #[test]
    fn test_simple_paragraph() {
        let doc = decode_default("This is a simple paragraph.\n");
        assert_eq!(
            doc.blocks,
            vec![Block::paragraph(vec![Inline::text("This is a simple paragraph.")])]
        );
    }

    #[test]
    fn test_empty_input_has_no_blocks() {
        assert!(decode_default("").blocks.is_empty());
        assert!(decode_default("\n\n  \n").blocks.is_empty());
    }

    #[test]
    fn test_two_items_share_a_container() {
        let doc = decode_default("[clist:L1|a]x[/clist]\n[clist:L1|b]y[/clist]");
        assert_eq!(doc.blocks.len(), 1);
        let Block::Checklist(container) = &doc.blocks[0] else {
            panic!("expected checklist, got {:?}", doc.blocks[0]);
        };
        assert_eq!(container.list_api_name, "L1");
        assert_eq!(
            container.items,
            vec![
                ChecklistItem::new("L1", "a", vec![Inline::text("x")]),
                ChecklistItem::new("L1", "b", vec![Inline::text("y")]),
            ]
        );
    }

    #[test]
    fn test_glued_marker_is_split_off() {
        let doc = decode_default("Intro[clist:L|a]x[/clist]");
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0], Block::paragraph(vec![Inline::text("Intro")]));
        assert!(matches!(doc.blocks[1], Block::Checklist(_)));
    }

    #[test]
    fn test_text_after_end_marker_is_rescanned() {
        let doc = decode_default("[clist:L|a]x[/clist] tail");
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[1], Block::paragraph(vec![Inline::text("tail")]));
    }

    #[test]
    fn test_unterminated_marker_stays_literal() {
        let doc = decode_default("[clist:L|a]never closed");
        assert_eq!(doc.blocks.len(), 1);
        let Block::Paragraph(paragraph) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            crate::document::inline::plain_text(&paragraph.content),
            "[clist:L|a]never closed"
        );
    }

    #[test]
    fn test_tokens_inside_checklist_item() {
        let catalog: VariableCatalog =
            vec![VariableCatalogEntry::new("due", "Due date")].into();
        let doc = decode(
            "[clist:L|a]by {{due}} ask [Bob|5][/clist]",
            &DecodeOptions::with_variables(catalog),
        );
        let Block::Checklist(container) = &doc.blocks[0] else {
            panic!("expected checklist");
        };
        assert_eq!(
            container.items[0].paragraph.content,
            vec![
                Inline::text("by "),
                Inline::Variable(VariableToken::new("due", "Due date")),
                Inline::text(" ask "),
                Inline::Mention(MentionToken::new(5, "Bob")),
            ]
        );
    }

    #[test]
    fn test_standard_blocks() {
        let doc = decode_default("# Title\n\n> quoted\n\n- one\n- two\n\n1. first\n");
        assert_eq!(
            doc.blocks[0],
            Block::Heading(Heading {
                level: 1,
                content: vec![Inline::text("Title")],
            })
        );
        assert_eq!(
            doc.blocks[1],
            Block::Quote(Quote {
                content: vec![Inline::text("quoted")],
            })
        );
        let Block::List(bullets) = &doc.blocks[2] else {
            panic!("expected list");
        };
        assert!(!bullets.ordered);
        assert_eq!(bullets.items.len(), 2);
        let Block::List(numbered) = &doc.blocks[3] else {
            panic!("expected list");
        };
        assert!(numbered.ordered);
    }

    #[test]
    fn test_code_block_to_code_block() {
        let doc = decode_default("```rust\nfn main() {}\n```\n");
        assert_eq!(
            doc.blocks,
            vec![Block::CodeBlock(CodeBlock {
                language: Some("rust".to_string()),
                literal: "fn main() {}".to_string(),
            })]
        );
    }

    #[test]
    fn test_markers_inside_code_fence_are_literal() {
        let doc = decode_default("```\n[clist:L|a]x[/clist]\n```");
        assert_eq!(
            doc.blocks,
            vec![Block::CodeBlock(CodeBlock {
                language: None,
                literal: "[clist:L|a]x[/clist]".to_string(),
            })]
        );
    }

    #[test]
    fn test_code_span_keeps_token_syntax() {
        let doc = decode_default("use `{{due}}` here");
        assert_eq!(
            doc.blocks,
            vec![Block::paragraph(vec![
                Inline::text("use "),
                Inline::Code {
                    literal: "{{due}}".to_string()
                },
                Inline::text(" here"),
            ])]
        );
    }

    #[test]
    fn test_inline_formatting() {
        let doc = decode_default("**bold** *it* ~~gone~~ [site](https://example.com)");
        let Block::Paragraph(paragraph) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(matches!(paragraph.content[0], Inline::Bold { .. }));
        assert!(matches!(paragraph.content[2], Inline::Italic { .. }));
        assert!(matches!(paragraph.content[4], Inline::Strikethrough { .. }));
        assert_eq!(
            paragraph.content[6],
            Inline::Link {
                url: "https://example.com".to_string(),
                children: vec![Inline::text("site")],
            }
        );
    }

    #[test]
    fn test_parse_inline_markdown_joins_blocks() {
        let content = parse_inline_markdown("one\n\ntwo", &VariableCatalog::new());
        assert_eq!(
            content,
            vec![Inline::text("one"), Inline::LineBreak, Inline::text("two")]
        );
    }
}
