//! Export tests for the markdown encoder
//!
//! The encoded text is parsed back with comrak to check that standard
//! markdown readers see the structure we meant to write.

use super::fixture;
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use insta::assert_snapshot;
use pneumatic_text::document::{
    Block, ChecklistContainer, ChecklistItem, Document, Inline, List, ListItem,
};
use pneumatic_text::format::Format;
use pneumatic_text::formats::markdown::MarkdownFormat;
use pneumatic_text::{decode, encode, DecodeOptions};
use std::collections::HashSet;

fn comrak_ast<'a>(markdown: &str, arena: &'a Arena<AstNode<'a>>) -> &'a AstNode<'a> {
    let mut options = ComrakOptions::default();
    options.extension.strikethrough = true;
    parse_document(arena, markdown, &options)
}

/// Helper to recursively collect node types from a Comrak AST
fn collect_node_types<'a>(node: &'a AstNode<'a>, types: &mut HashSet<&'static str>) {
    let type_name = match &node.data.borrow().value {
        NodeValue::Document => "Document",
        NodeValue::Paragraph => "Paragraph",
        NodeValue::Heading(_) => "Heading",
        NodeValue::BlockQuote => "BlockQuote",
        NodeValue::List(_) => "List",
        NodeValue::Item(_) => "Item",
        NodeValue::CodeBlock(_) => "CodeBlock",
        NodeValue::Strong => "Strong",
        NodeValue::Emph => "Emph",
        NodeValue::Strikethrough => "Strikethrough",
        NodeValue::Code(_) => "Code",
        NodeValue::Link(_) => "Link",
        NodeValue::Text(_) => "Text",
        _ => "Other",
    };
    types.insert(type_name);
    for child in node.children() {
        collect_node_types(child, types);
    }
}

fn text_of<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        if let NodeValue::Text(text) = &descendant.data.borrow().value {
            out.push_str(text);
        }
    }
    out
}

#[test]
fn test_escaped_text_stays_a_plain_paragraph() {
    let doc = Document::new(vec![Block::paragraph(vec![Inline::text(
        "# not a heading *or* [a link](x)",
    )])]);
    let markdown = encode(&doc);

    let arena = Arena::new();
    let root = comrak_ast(&markdown, &arena);
    let mut types = HashSet::new();
    collect_node_types(root, &mut types);

    assert_eq!(types, HashSet::from(["Document", "Paragraph", "Text"]));
    assert_eq!(text_of(root), "# not a heading *or* [a link](x)");
}

#[test]
fn test_checklist_lines_are_paragraph_text_for_plain_readers() {
    let doc = Document::new(vec![Block::Checklist(ChecklistContainer::new(
        "L",
        vec![
            ChecklistItem::new(
                "L",
                "a",
                vec![Inline::Bold {
                    children: vec![Inline::text("bold")],
                }],
            ),
            ChecklistItem::new("L", "b", vec![Inline::text("plain")]),
        ],
    ))]);
    let markdown = encode(&doc);

    let arena = Arena::new();
    let root = comrak_ast(&markdown, &arena);
    let mut types = HashSet::new();
    collect_node_types(root, &mut types);

    assert!(types.contains("Strong"));
    assert!(!types.contains("List"));
    assert!(text_of(root).contains("[clist:L|b]plain[/clist]"));
}

#[test]
fn test_nested_list_indentation() {
    let doc = Document::new(vec![Block::List(List {
        ordered: true,
        items: vec![ListItem {
            content: vec![Inline::text("parent")],
            children: vec![Block::List(List {
                ordered: false,
                items: vec![ListItem {
                    content: vec![Inline::text("child")],
                    children: vec![],
                }],
            })],
        }],
    })]);
    let markdown = encode(&doc);
    assert_eq!(markdown, "1. parent\n   - child");

    let arena = Arena::new();
    let root = comrak_ast(&markdown, &arena);
    let lists = root
        .descendants()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::List(_)))
        .count();
    assert_eq!(lists, 2);
}

#[test]
fn test_format_trait_matches_encode() {
    let doc = decode(&fixture("kitchensink.md"), &DecodeOptions::default());
    assert_eq!(MarkdownFormat.serialize(&doc).unwrap(), encode(&doc));
}

#[test]
fn test_kitchensink_export() {
    let doc = decode(&fixture("kitchensink.md"), &DecodeOptions::default());
    assert_snapshot!(encode(&doc), @r#"
    # Quarterly review

    Prepare the deck for {{client_name}} and share it with [Ann|12].

    > Deadlines are firm.

    - Draft outline
    - Collect numbers
      - revenue
      - churn

    1. Review
    2. Approve

    [clist:review|deck]Finish the **deck**[/clist]
    [clist:review|numbers]Check *numbers* with [Bob|7][/clist]

    [clist:followup|mail]Send the summary to {{client_name}}[/clist]

    ```sh
    echo "[clist:not|parsed]"
    ```

    See the [handbook](https://example.com/handbook) for details.
    "#);
}
