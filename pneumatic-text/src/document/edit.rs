//! Default editing behaviour applied when no structural handler claims an
//! event: typing, deleting backwards and splitting blocks on Enter.
//!
//! Every operation returns `false` and leaves the state untouched when its
//! preconditions do not hold.

use super::inline::{
    concat_inlines, delete_range, inline_len, insert_inlines, insert_text as insert_into,
    split_inlines,
};
use super::nodes::{Block, Inline, ListItem, Paragraph};
use super::selection::{content_at, end_of_block, BlockPath, EditorState, Point, Selection};

/// Collapse a single-path range selection by deleting its contents.
/// Returns the caret it leaves behind.
fn collapse_selection(state: &mut EditorState) -> Option<Point> {
    let selection = state.selection?;
    if selection.is_collapsed() {
        return state.is_valid_point(selection.anchor).then_some(selection.anchor);
    }
    if selection.anchor.path != selection.focus.path {
        return None;
    }
    let path = selection.anchor.path;
    let start = selection.anchor.offset.min(selection.focus.offset);
    let end = selection.anchor.offset.max(selection.focus.offset);
    let content = state.content_at_mut(path)?;
    if end > inline_len(content) {
        return None;
    }
    *content = delete_range(content, start, end);
    let caret = Point::new(path, start);
    state.selection = Some(Selection::collapsed(caret));
    Some(caret)
}

/// Delete a selected range, leaving the caret at its start. `false` for a
/// collapsed selection or one that spans blocks.
pub fn delete_selection(state: &mut EditorState) -> bool {
    match state.selection {
        Some(selection) if !selection.is_collapsed() => collapse_selection(state).is_some(),
        _ => false,
    }
}

/// Type `text` at the caret, replacing a selected range first.
pub fn insert_text(state: &mut EditorState, text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let Some(caret) = collapse_selection(state) else {
        return false;
    };
    let Some(content) = state.content_at_mut(caret.path) else {
        return false;
    };
    *content = insert_into(content, caret.offset, text);
    let moved = Point::new(caret.path, caret.offset + text.chars().count());
    state.selection = Some(Selection::collapsed(moved));
    true
}

/// Insert an inline node at the caret and place the caret after it.
pub fn insert_inline(state: &mut EditorState, node: Inline) -> bool {
    let Some(caret) = collapse_selection(state) else {
        return false;
    };
    let Some(content) = state.content_at_mut(caret.path) else {
        return false;
    };
    let width = inline_len(std::slice::from_ref(&node));
    *content = insert_inlines(content, caret.offset, vec![node]);
    state.selection = Some(Selection::collapsed(Point::new(
        caret.path,
        caret.offset + width,
    )));
    true
}

/// Backspace. Deletes one unit (a whole token when the caret follows one),
/// a selected range, or merges with the previous block at offset zero.
pub fn delete_backward(state: &mut EditorState) -> bool {
    let Some(selection) = state.selection else {
        return false;
    };
    if !selection.is_collapsed() {
        return collapse_selection(state).is_some();
    }
    let caret = selection.anchor;
    if !state.is_valid_point(caret) {
        return false;
    }

    if caret.offset > 0 {
        let Some(content) = state.content_at_mut(caret.path) else {
            return false;
        };
        *content = delete_range(content, caret.offset - 1, caret.offset);
        state.selection = Some(Selection::collapsed(Point::new(
            caret.path,
            caret.offset - 1,
        )));
        return true;
    }

    merge_with_previous(state, caret.path)
}

fn merge_with_previous(state: &mut EditorState, path: BlockPath) -> bool {
    match path {
        BlockPath::ChecklistItem { block, item } if item > 0 => {
            let Some(Block::Checklist(container)) = state.document.blocks.get_mut(block) else {
                return false;
            };
            let removed = container.items.remove(item);
            let previous = &mut container.items[item - 1];
            let join_at = inline_len(&previous.paragraph.content);
            previous.paragraph.content = concat_inlines(
                std::mem::take(&mut previous.paragraph.content),
                removed.paragraph.content,
            );
            state.selection = Some(Selection::collapsed(Point::in_item(
                block,
                item - 1,
                join_at,
            )));
            true
        }
        BlockPath::ListItem { block, item } if item > 0 => {
            let Some(Block::List(list)) = state.document.blocks.get_mut(block) else {
                return false;
            };
            let removed = list.items.remove(item);
            let previous = &mut list.items[item - 1];
            let join_at = inline_len(&previous.content);
            previous.content =
                concat_inlines(std::mem::take(&mut previous.content), removed.content);
            previous.children.extend(removed.children);
            state.selection = Some(Selection::collapsed(Point::new(
                BlockPath::ListItem {
                    block,
                    item: item - 1,
                },
                join_at,
            )));
            true
        }
        BlockPath::Block { block } if block > 0 => {
            let Some(current) = state.document.blocks.get(block) else {
                return false;
            };
            let current_content = current.inline_content().cloned().unwrap_or_default();
            let previous = &state.document.blocks[block - 1];

            if previous.inline_content().is_some() {
                let removed = state.document.blocks.remove(block);
                let Some(target) = state.document.blocks[block - 1].inline_content_mut() else {
                    state.document.blocks.insert(block, removed);
                    return false;
                };
                let join_at = inline_len(target);
                *target = concat_inlines(std::mem::take(target), current_content);
                state.selection = Some(Selection::collapsed(Point::in_block(block - 1, join_at)));
                true
            } else if current_content.is_empty() {
                state.document.blocks.remove(block);
                state.selection = end_of_block(&state.document, block - 1).map(Selection::collapsed);
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Enter outside checklists: split the caret's block in two.
pub fn split_block(state: &mut EditorState) -> bool {
    let Some(selection) = state.selection else {
        return false;
    };
    if matches!(selection.anchor.path, BlockPath::ChecklistItem { .. }) {
        return false;
    }
    let Some(caret) = collapse_selection(state) else {
        return false;
    };
    let Some(content) = content_at(&state.document, caret.path) else {
        return false;
    };
    let (head, tail) = split_inlines(content, caret.offset);

    match caret.path {
        BlockPath::Block { block } => {
            let Some(target) = state.document.blocks[block].inline_content_mut() else {
                return false;
            };
            *target = head;
            state
                .document
                .blocks
                .insert(block + 1, Block::Paragraph(Paragraph::new(tail)));
            state.selection = Some(Selection::collapsed(Point::in_block(block + 1, 0)));
            true
        }
        BlockPath::ListItem { block, item } => {
            let Some(Block::List(list)) = state.document.blocks.get_mut(block) else {
                return false;
            };
            list.items[item].content = head;
            list.items.insert(
                item + 1,
                ListItem {
                    content: tail,
                    children: Vec::new(),
                },
            );
            state.selection = Some(Selection::collapsed(Point::new(
                BlockPath::ListItem {
                    block,
                    item: item + 1,
                },
                0,
            )));
            true
        }
        BlockPath::ChecklistItem { .. } => false,
    }
}
