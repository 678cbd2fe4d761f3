//! Keyboard and toolbar commands on checklists.
//!
//! Queries inspect a snapshot and describe the edit; [`apply`] performs it on
//! a copy. A query that returns `None` means the event is not handled and the
//! default editing behaviour should run.

use super::paste::{apply_paste, PreparedPaste};
use crate::document::ids::IdGenerator;
use crate::document::inline::{inline_len, split_inlines};
use crate::document::nodes::{Block, ChecklistContainer, ChecklistItem, Inline, Paragraph};
use crate::document::selection::{end_of_block, BlockPath, EditorState, Point, Selection};

/// A structural edit computed by one of the `query_*` functions.
#[derive(Debug, Clone, PartialEq)]
pub enum ChecklistCommand {
    /// Replace a container holding one empty item with an empty paragraph.
    ExitList { block: usize },
    /// Drop the empty last item and continue in a paragraph after the
    /// container.
    ExitAfterLastItem { block: usize, item: usize },
    /// Split an item at `offset`; the text after the caret moves into a new
    /// item placed right after it.
    SplitItem {
        block: usize,
        item: usize,
        offset: usize,
    },
    /// Turn a text block into a one-item checklist keeping its content.
    ConvertToChecklist { block: usize },
    /// Insert an empty checklist after `block`.
    InsertChecklistAfter { block: usize },
    /// Backspace in an empty item.
    RemoveEmptyItem { block: usize, item: usize },
    Paste(PreparedPaste),
}

/// The collapsed caret inside a checklist item, with the item itself.
fn caret_in_item(state: &EditorState) -> Option<(usize, usize, usize, &ChecklistContainer)> {
    let caret = state.selection?.caret()?;
    let BlockPath::ChecklistItem { block, item } = caret.path else {
        return None;
    };
    let Block::Checklist(container) = state.document.blocks.get(block)? else {
        return None;
    };
    let current = container.items.get(item)?;
    if caret.offset > inline_len(&current.paragraph.content) {
        return None;
    }
    Some((block, item, caret.offset, container))
}

/// Enter in the only item of a container when that item is empty.
pub fn query_exit_list(state: &EditorState) -> Option<ChecklistCommand> {
    let (block, item, _, container) = caret_in_item(state)?;
    if !container.items[item].is_empty() {
        return None;
    }
    match container.items.len() {
        1 => Some(ChecklistCommand::ExitList { block }),
        len if item + 1 == len => Some(ChecklistCommand::ExitAfterLastItem { block, item }),
        _ => None,
    }
}

/// Enter anywhere else inside an item.
pub fn query_new_item(state: &EditorState) -> Option<ChecklistCommand> {
    let (block, item, offset, _) = caret_in_item(state)?;
    Some(ChecklistCommand::SplitItem {
        block,
        item,
        offset,
    })
}

/// Enter: leaving the list takes priority over creating an item.
pub fn query_enter(state: &EditorState) -> Option<ChecklistCommand> {
    query_exit_list(state).or_else(|| query_new_item(state))
}

/// Toolbar "insert checklist". Needs a selection; a range uses its anchor.
pub fn query_insert_checklist(state: &EditorState) -> Option<ChecklistCommand> {
    let selection = state.selection?;
    let block = selection.anchor.path.block_index();
    match state.document.blocks.get(block)? {
        Block::Paragraph(_) | Block::Heading(_) | Block::Quote(_) => {
            Some(ChecklistCommand::ConvertToChecklist { block })
        }
        Block::Checklist(_) | Block::List(_) | Block::CodeBlock(_) => {
            Some(ChecklistCommand::InsertChecklistAfter { block })
        }
    }
}

/// Backspace at the start of an empty item.
pub fn query_backspace(state: &EditorState) -> Option<ChecklistCommand> {
    let (block, item, offset, container) = caret_in_item(state)?;
    if offset != 0 || !container.items[item].is_empty() {
        return None;
    }
    Some(ChecklistCommand::RemoveEmptyItem { block, item })
}

/// Apply `command` to a copy of `state`. `ids` supplies api names for new
/// lists and items; they never collide with names already in the document.
pub fn apply(
    state: &EditorState,
    command: ChecklistCommand,
    ids: &mut dyn IdGenerator,
) -> EditorState {
    let mut next = state.clone();
    let applied = match command {
        ChecklistCommand::ExitList { block } => exit_list(&mut next, block),
        ChecklistCommand::ExitAfterLastItem { block, item } => {
            exit_after_last_item(&mut next, block, item)
        }
        ChecklistCommand::SplitItem {
            block,
            item,
            offset,
        } => split_item(&mut next, block, item, offset, ids),
        ChecklistCommand::ConvertToChecklist { block } => {
            convert_to_checklist(&mut next, block, ids)
        }
        ChecklistCommand::InsertChecklistAfter { block } => {
            insert_checklist_after(&mut next, block, ids)
        }
        ChecklistCommand::RemoveEmptyItem { block, item } => {
            remove_empty_item(&mut next, block, item)
        }
        ChecklistCommand::Paste(prepared) => apply_paste(&mut next, prepared, ids),
    };
    if applied {
        next
    } else {
        tracing::debug!("checklist command no longer matches the document");
        state.clone()
    }
}

fn place_caret(state: &mut EditorState, point: Point) {
    state.selection = Some(Selection::collapsed(point));
}

fn exit_list(state: &mut EditorState, block: usize) -> bool {
    let Some(slot) = state.document.blocks.get_mut(block) else {
        return false;
    };
    *slot = Block::empty_paragraph();
    place_caret(state, Point::in_block(block, 0));
    true
}

fn exit_after_last_item(state: &mut EditorState, block: usize, item: usize) -> bool {
    let Some(Block::Checklist(container)) = state.document.blocks.get_mut(block) else {
        return false;
    };
    if item >= container.items.len() {
        return false;
    }
    container.items.remove(item);
    state
        .document
        .blocks
        .insert(block + 1, Block::empty_paragraph());
    place_caret(state, Point::in_block(block + 1, 0));
    true
}

fn split_item(
    state: &mut EditorState,
    block: usize,
    item: usize,
    offset: usize,
    ids: &mut dyn IdGenerator,
) -> bool {
    let taken = state.document.api_names();
    let Some(Block::Checklist(container)) = state.document.blocks.get_mut(block) else {
        return false;
    };
    let Some(current) = container.items.get_mut(item) else {
        return false;
    };
    let (head, tail) = split_inlines(&current.paragraph.content, offset);
    current.paragraph.content = head;

    let list_api_name = container.list_api_name.clone();
    let new_item = ChecklistItem::new(list_api_name, ids.fresh_item_id(&taken), tail);
    container.items.insert(item + 1, new_item);
    place_caret(state, Point::in_item(block, item + 1, 0));
    true
}

fn new_checklist(
    state: &EditorState,
    ids: &mut dyn IdGenerator,
    content: Vec<Inline>,
) -> Block {
    let taken = state.document.api_names();
    let list_api_name = ids.fresh_list_id(&taken);
    let item_api_name = ids.fresh_item_id(&taken);
    let item = ChecklistItem::new(list_api_name.clone(), item_api_name, content);
    Block::Checklist(ChecklistContainer::new(list_api_name, vec![item]))
}

fn convert_to_checklist(state: &mut EditorState, block: usize, ids: &mut dyn IdGenerator) -> bool {
    let Some(content) = state
        .document
        .blocks
        .get(block)
        .and_then(Block::inline_content)
        .cloned()
    else {
        return false;
    };
    let checklist = new_checklist(state, ids, content);
    state.document.blocks[block] = checklist;
    place_caret(state, Point::in_item(block, 0, 0));
    true
}

fn insert_checklist_after(
    state: &mut EditorState,
    block: usize,
    ids: &mut dyn IdGenerator,
) -> bool {
    if block >= state.document.blocks.len() {
        return false;
    }
    let checklist = new_checklist(state, ids, Vec::new());
    state.document.blocks.insert(block + 1, checklist);
    place_caret(state, Point::in_item(block + 1, 0, 0));
    true
}

fn remove_empty_item(state: &mut EditorState, block: usize, item: usize) -> bool {
    let Some(Block::Checklist(container)) = state.document.blocks.get_mut(block) else {
        return false;
    };
    if item >= container.items.len() {
        return false;
    }

    if item > 0 {
        container.items.remove(item);
        let len = inline_len(&container.items[item - 1].paragraph.content);
        place_caret(state, Point::in_item(block, item - 1, len));
        return true;
    }

    // First item: the container goes away entirely when it was the only one.
    if container.items.len() == 1 {
        state.document.blocks.remove(block);
    } else {
        container.items.remove(0);
    }

    let previous = block
        .checked_sub(1)
        .and_then(|prev| end_of_block(&state.document, prev));
    match previous {
        Some(point) => place_caret(state, point),
        None => {
            state
                .document
                .blocks
                .insert(block, Block::Paragraph(Paragraph::default()));
            place_caret(state, Point::in_block(block, 0));
        }
    }
    true
}
