//! Core data structures of the rich-text document tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Root of an editable document: an ordered sequence of blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Paragraph(Paragraph),
    Heading(Heading),
    Quote(Quote),
    List(List),
    Checklist(ChecklistContainer),
    CodeBlock(CodeBlock),
}

/// A paragraph of inline content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: Vec<Inline>,
}

/// A heading with a level between 1 and 6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub content: Vec<Inline>,
}

/// A block quote. Quotes hold a single run of inline content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub content: Vec<Inline>,
}

/// An ordered or bulleted list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

/// An item of a [`List`], optionally carrying nested blocks (sub-lists).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub content: Vec<Inline>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

/// A fenced code block. The literal is never scanned for tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub literal: String,
}

/// One checklist group. All items share the container's `list_api_name`.
///
/// A container without items is structurally invalid; see
/// [`Document::normalize_checklists`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistContainer {
    pub list_api_name: String,
    pub items: Vec<ChecklistItem>,
}

/// A checklist entry holding a single paragraph of inline content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub list_api_name: String,
    pub item_api_name: String,
    #[serde(default)]
    pub is_checked: bool,
    pub paragraph: Paragraph,
}

/// Inline content. Variables and mentions are atomic leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Inline {
    Text { text: String },
    Bold { children: Vec<Inline> },
    Italic { children: Vec<Inline> },
    Strikethrough { children: Vec<Inline> },
    Code { literal: String },
    Link { url: String, children: Vec<Inline> },
    LineBreak,
    Variable(VariableToken),
    Mention(MentionToken),
}

/// Reference to a template variable, rendered as `{{api_name}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableToken {
    pub api_name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// Reference to a user, rendered as `[name|id]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionToken {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }

    /// Whether this node is an indivisible token.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Inline::Variable(_) | Inline::Mention(_))
    }
}

impl VariableToken {
    pub fn new(api_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            title: title.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

impl MentionToken {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            link: None,
        }
    }
}

impl Paragraph {
    pub fn new(content: Vec<Inline>) -> Self {
        Self { content }
    }

    pub fn is_empty(&self) -> bool {
        super::inline::is_empty_content(&self.content)
    }
}

impl ChecklistItem {
    pub fn new(
        list_api_name: impl Into<String>,
        item_api_name: impl Into<String>,
        content: Vec<Inline>,
    ) -> Self {
        Self {
            list_api_name: list_api_name.into(),
            item_api_name: item_api_name.into(),
            is_checked: false,
            paragraph: Paragraph::new(content),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraph.is_empty()
    }
}

impl ChecklistContainer {
    pub fn new(list_api_name: impl Into<String>, items: Vec<ChecklistItem>) -> Self {
        Self {
            list_api_name: list_api_name.into(),
            items,
        }
    }
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Block::Paragraph(Paragraph::new(content))
    }

    pub fn empty_paragraph() -> Self {
        Block::Paragraph(Paragraph::default())
    }

    pub fn is_empty_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(p) if p.content.is_empty())
    }

    /// Inline content of text-bearing leaf blocks.
    pub fn inline_content(&self) -> Option<&Vec<Inline>> {
        match self {
            Block::Paragraph(p) => Some(&p.content),
            Block::Heading(h) => Some(&h.content),
            Block::Quote(q) => Some(&q.content),
            _ => None,
        }
    }

    pub fn inline_content_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            Block::Paragraph(p) => Some(&mut p.content),
            Block::Heading(h) => Some(&mut h.content),
            Block::Quote(q) => Some(&mut q.content),
            _ => None,
        }
    }
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_empty_paragraph)
    }

    /// All checklist list and item api names present in the document.
    pub fn api_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for block in &self.blocks {
            if let Block::Checklist(container) = block {
                names.insert(container.list_api_name.clone());
                for item in &container.items {
                    names.insert(item.list_api_name.clone());
                    names.insert(item.item_api_name.clone());
                }
            }
        }
        names
    }

    /// Iterate over checklist containers in document order.
    pub fn checklists(&self) -> impl Iterator<Item = &ChecklistContainer> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Checklist(container) => Some(container),
            _ => None,
        })
    }

    /// Drop empty containers and point every item back at its container.
    ///
    /// Returns true when anything changed.
    pub fn normalize_checklists(&mut self) -> bool {
        let before = self.blocks.len();
        self.blocks
            .retain(|block| !matches!(block, Block::Checklist(c) if c.items.is_empty()));
        let mut changed = before != self.blocks.len();

        for block in &mut self.blocks {
            if let Block::Checklist(container) = block {
                for item in &mut container.items {
                    if item.list_api_name != container.list_api_name {
                        item.list_api_name = container.list_api_name.clone();
                        changed = true;
                    }
                }
            }
        }
        changed
    }
}
