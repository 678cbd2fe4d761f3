//! HTML serialization
//!
//! Builds an rcdom tree for the document and serializes it with html5ever.
//! Checklist ids and token payloads travel as `data-*` attributes so a paste
//! target can rebuild the structure.

use crate::document::nodes::{Block, ChecklistContainer, Document, Inline, List};
use crate::error::EditorError;
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::default::Default;
use std::rc::Rc;

/// Serialize a document to an HTML fragment (no `<html>` wrapper).
pub fn serialize_to_html(doc: &Document) -> Result<String, EditorError> {
    let dom = build_html_dom(doc);
    serialize_dom(&dom)
}

/// Serialize a document to a complete HTML5 page.
pub fn serialize_to_html_document(doc: &Document, title: &str) -> Result<String, EditorError> {
    let body = serialize_to_html(doc)?;
    Ok(wrap_in_document(&body, title))
}

fn build_html_dom(doc: &Document) -> RcDom {
    let dom = RcDom::default();
    let container = create_element("div", vec![("class", "pneumatic-document")]);
    for block in &doc.blocks {
        add_block_to_node(&container, block);
    }
    dom.document.children.borrow_mut().push(container);
    dom
}

fn add_block_to_node(parent: &Handle, block: &Block) {
    match block {
        Block::Paragraph(paragraph) => {
            let p = create_element("p", vec![]);
            add_inlines(&p, &paragraph.content);
            append(parent, p);
        }

        Block::Heading(heading) => {
            let tag = format!("h{}", heading.level.clamp(1, 6));
            let h = create_element(&tag, vec![]);
            add_inlines(&h, &heading.content);
            append(parent, h);
        }

        Block::Quote(quote) => {
            let blockquote = create_element("blockquote", vec![]);
            let p = create_element("p", vec![]);
            add_inlines(&p, &quote.content);
            append(&blockquote, p);
            append(parent, blockquote);
        }

        Block::List(list) => append(parent, list_element(list)),

        Block::Checklist(container) => append(parent, checklist_element(container)),

        Block::CodeBlock(code) => {
            let pre = create_element("pre", vec![]);
            let attrs = match &code.language {
                Some(language) => vec![("data-language", language.as_str())],
                None => vec![],
            };
            let code_el = create_element("code", attrs);
            append(&code_el, create_text(&code.literal));
            append(&pre, code_el);
            append(parent, pre);
        }
    }
}

fn list_element(list: &List) -> Handle {
    let tag = if list.ordered { "ol" } else { "ul" };
    let list_el = create_element(tag, vec![]);
    for item in &list.items {
        let li = create_element("li", vec![]);
        add_inlines(&li, &item.content);
        for child in &item.children {
            add_block_to_node(&li, child);
        }
        append(&list_el, li);
    }
    list_el
}

fn checklist_element(container: &ChecklistContainer) -> Handle {
    let ul = create_element(
        "ul",
        vec![
            ("class", "checklist"),
            ("data-list-api-name", container.list_api_name.as_str()),
        ],
    );
    for item in &container.items {
        let mut attrs = vec![
            ("class", "checklist-item"),
            ("data-item-api-name", item.item_api_name.as_str()),
        ];
        if item.is_checked {
            attrs.push(("data-checked", "true"));
        }
        let li = create_element("li", attrs);
        add_inlines(&li, &item.paragraph.content);
        append(&ul, li);
    }
    ul
}

fn add_inlines(parent: &Handle, content: &[Inline]) {
    for inline in content {
        add_inline_to_node(parent, inline);
    }
}

fn add_inline_to_node(parent: &Handle, inline: &Inline) {
    match inline {
        Inline::Text { text } => append(parent, create_text(text)),

        Inline::Bold { children } => wrap_inlines(parent, "strong", children),
        Inline::Italic { children } => wrap_inlines(parent, "em", children),
        Inline::Strikethrough { children } => wrap_inlines(parent, "s", children),

        Inline::Code { literal } => {
            let code = create_element("code", vec![]);
            append(&code, create_text(literal));
            append(parent, code);
        }

        Inline::Link { url, children } => {
            let anchor = create_element("a", vec![("href", url.as_str())]);
            add_inlines(&anchor, children);
            append(parent, anchor);
        }

        Inline::LineBreak => append(parent, create_element("br", vec![])),

        Inline::Variable(token) => {
            let mut attrs = vec![
                ("class", "variable"),
                ("data-variable-api-name", token.api_name.as_str()),
            ];
            if let Some(subtitle) = &token.subtitle {
                attrs.push(("title", subtitle.as_str()));
            }
            let span = create_element("span", attrs);
            append(&span, create_text(&token.title));
            append(parent, span);
        }

        Inline::Mention(token) => {
            let id = token.id.to_string();
            let span = create_element(
                "span",
                vec![("class", "mention"), ("data-mention-id", id.as_str())],
            );
            let label = format!("@{}", token.name);
            match &token.link {
                Some(link) => {
                    let anchor = create_element("a", vec![("href", link.as_str())]);
                    append(&anchor, create_text(&label));
                    append(&span, anchor);
                }
                None => append(&span, create_text(&label)),
            }
            append(parent, span);
        }
    }
}

fn wrap_inlines(parent: &Handle, tag: &str, children: &[Inline]) {
    let element = create_element(tag, vec![]);
    add_inlines(&element, children);
    append(parent, element);
}

fn append(parent: &Handle, child: Handle) {
    parent.children.borrow_mut().push(child);
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Serialize the children of the document container.
fn serialize_dom(dom: &RcDom) -> Result<String, EditorError> {
    let mut output = Vec::new();

    let container = dom
        .document
        .children
        .borrow()
        .first()
        .ok_or_else(|| EditorError::SerializationError("Empty document".to_string()))?
        .clone();

    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for child in container.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            EditorError::SerializationError(format!("HTML serialization failed: {e}"))
        })?;
    }

    String::from_utf8(output)
        .map_err(|e| EditorError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}

fn wrap_in_document(body_html: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<div class=\"pneumatic-document\">\n{body_html}\n</div>\n</body>\n</html>\n",
        html_escape(title)
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
