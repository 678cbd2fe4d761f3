//! Pasting fragments that carry checklists.
//!
//! Pasted checklists always get new list and item names, so a paste never
//! merges into an unrelated list that happens to share an id. Trailing empty
//! paragraphs that the paste source tends to append are dropped.

use super::commands::ChecklistCommand;
use crate::document::fragment::Fragment;
use crate::document::ids::IdGenerator;
use crate::document::nodes::{Block, Document};
use crate::document::selection::{end_of_block, EditorState, Selection};
use std::collections::BTreeSet;

/// A fragment ready for insertion, before ids are reassigned.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPaste {
    pub blocks: Vec<Block>,
    /// Top-level block the selection sits in.
    pub at: usize,
    /// The block at `at` is an empty paragraph and is replaced.
    pub replace: bool,
}

/// Handle the paste only when it contains checklists or had trailing empty
/// paragraphs to drop. Otherwise default paste handling applies.
pub fn query_paste(state: &EditorState, fragment: &Fragment) -> Option<ChecklistCommand> {
    let selection = state.selection?;
    let at = selection.anchor.path.block_index();
    let current = state.document.blocks.get(at)?;

    let mut blocks = fragment.clone().into_blocks();
    blocks.retain(|block| !matches!(block, Block::Checklist(c) if c.items.is_empty()));
    let trimmed = trim_trailing_empty_paragraphs(&mut blocks);
    let has_checklists = blocks.iter().any(|block| matches!(block, Block::Checklist(_)));

    if trimmed == 0 && !has_checklists {
        return None;
    }
    tracing::debug!(
        blocks = blocks.len(),
        trimmed,
        "pasting fragment through the checklist handler"
    );
    Some(ChecklistCommand::Paste(PreparedPaste {
        blocks,
        at,
        replace: current.is_empty_paragraph(),
    }))
}

/// Remove empty paragraphs from the end of `blocks`, returning how many.
pub fn trim_trailing_empty_paragraphs(blocks: &mut Vec<Block>) -> usize {
    let before = blocks.len();
    while blocks.last().is_some_and(Block::is_empty_paragraph) {
        blocks.pop();
    }
    before - blocks.len()
}

/// Give every checklist in `blocks` fresh names absent from `taken`. New
/// names are added to `taken` as they are handed out.
pub fn reassign_ids(
    blocks: &mut [Block],
    taken: &mut BTreeSet<String>,
    ids: &mut dyn IdGenerator,
) {
    for block in blocks {
        match block {
            Block::Checklist(container) => {
                let list_api_name = ids.fresh_list_id(taken);
                taken.insert(list_api_name.clone());
                for item in &mut container.items {
                    let item_api_name = ids.fresh_item_id(taken);
                    taken.insert(item_api_name.clone());
                    item.item_api_name = item_api_name;
                    item.list_api_name = list_api_name.clone();
                }
                container.list_api_name = list_api_name;
            }
            Block::List(list) => {
                for item in &mut list.items {
                    reassign_ids(&mut item.children, taken, ids);
                }
            }
            _ => {}
        }
    }
}

pub(crate) fn apply_paste(
    state: &mut EditorState,
    prepared: PreparedPaste,
    ids: &mut dyn IdGenerator,
) -> bool {
    let PreparedPaste {
        mut blocks,
        at,
        replace,
    } = prepared;
    if at >= state.document.blocks.len() {
        return false;
    }
    if blocks.is_empty() {
        return true;
    }

    // Neither the document's names nor the originals may be reused.
    let mut taken = state.document.api_names();
    taken.extend(Document::new(blocks.clone()).api_names());
    reassign_ids(&mut blocks, &mut taken, ids);

    let insert_at = if replace {
        state.document.blocks.remove(at);
        at
    } else {
        at + 1
    };
    let last = insert_at + blocks.len() - 1;
    state.document.blocks.splice(insert_at..insert_at, blocks);
    state.selection = end_of_block(&state.document, last)
        .map(Selection::collapsed)
        .or(state.selection);
    true
}
