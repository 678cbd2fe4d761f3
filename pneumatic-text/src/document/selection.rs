//! Editor snapshots and caret positions.

use super::inline::inline_len;
use super::nodes::{Block, Document, Inline};
use serde::{Deserialize, Serialize};

/// Address of a run of inline content inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BlockPath {
    /// A paragraph, heading or quote at the document root.
    Block { block: usize },
    ChecklistItem { block: usize, item: usize },
    ListItem { block: usize, item: usize },
}

impl BlockPath {
    pub fn block_index(&self) -> usize {
        match *self {
            BlockPath::Block { block }
            | BlockPath::ChecklistItem { block, .. }
            | BlockPath::ListItem { block, .. } => block,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub path: BlockPath,
    pub offset: usize,
}

impl Point {
    pub fn new(path: BlockPath, offset: usize) -> Self {
        Self { path, offset }
    }

    pub fn in_block(block: usize, offset: usize) -> Self {
        Self::new(BlockPath::Block { block }, offset)
    }

    pub fn in_item(block: usize, item: usize, offset: usize) -> Self {
        Self::new(BlockPath::ChecklistItem { block, item }, offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    pub fn range(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The caret, if the selection is collapsed.
    pub fn caret(&self) -> Option<Point> {
        self.is_collapsed().then_some(self.anchor)
    }
}

/// Immutable view of the editor: the document plus the current selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    pub document: Document,
    pub selection: Option<Selection>,
}

impl EditorState {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_caret(self, point: Point) -> Self {
        self.with_selection(Selection::collapsed(point))
    }

    /// Inline content addressed by `path`, if the path resolves.
    pub fn content_at(&self, path: BlockPath) -> Option<&Vec<Inline>> {
        content_at(&self.document, path)
    }

    pub fn content_at_mut(&mut self, path: BlockPath) -> Option<&mut Vec<Inline>> {
        content_at_mut(&mut self.document, path)
    }

    /// Whether `point` addresses existing content at a valid offset.
    pub fn is_valid_point(&self, point: Point) -> bool {
        self.content_at(point.path)
            .is_some_and(|content| point.offset <= inline_len(content))
    }
}

pub fn content_at(document: &Document, path: BlockPath) -> Option<&Vec<Inline>> {
    match path {
        BlockPath::Block { block } => document.blocks.get(block)?.inline_content(),
        BlockPath::ChecklistItem { block, item } => match document.blocks.get(block)? {
            Block::Checklist(container) => Some(&container.items.get(item)?.paragraph.content),
            _ => None,
        },
        BlockPath::ListItem { block, item } => match document.blocks.get(block)? {
            Block::List(list) => Some(&list.items.get(item)?.content),
            _ => None,
        },
    }
}

pub fn content_at_mut(document: &mut Document, path: BlockPath) -> Option<&mut Vec<Inline>> {
    match path {
        BlockPath::Block { block } => document.blocks.get_mut(block)?.inline_content_mut(),
        BlockPath::ChecklistItem { block, item } => match document.blocks.get_mut(block)? {
            Block::Checklist(container) => {
                Some(&mut container.items.get_mut(item)?.paragraph.content)
            }
            _ => None,
        },
        BlockPath::ListItem { block, item } => match document.blocks.get_mut(block)? {
            Block::List(list) => Some(&mut list.items.get_mut(item)?.content),
            _ => None,
        },
    }
}

/// The last caret position inside `block`, if it holds inline content.
pub fn end_of_block(document: &Document, block: usize) -> Option<Point> {
    match document.blocks.get(block)? {
        Block::Checklist(container) => {
            let item = container.items.len().checked_sub(1)?;
            let len = inline_len(&container.items[item].paragraph.content);
            Some(Point::in_item(block, item, len))
        }
        Block::List(list) => {
            let item = list.items.len().checked_sub(1)?;
            let len = inline_len(&list.items[item].content);
            Some(Point::new(BlockPath::ListItem { block, item }, len))
        }
        other => other
            .inline_content()
            .map(|content| Point::in_block(block, inline_len(content))),
    }
}
