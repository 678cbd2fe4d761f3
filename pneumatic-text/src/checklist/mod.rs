//! Checklist structural editing
//!
//! Each handler is split into a read-only query and an [`apply`] step:
//!
//!     query_*(&EditorState) -> Option<ChecklistCommand>
//!     apply(&EditorState, ChecklistCommand, &mut dyn IdGenerator) -> EditorState
//!
//! A query runs first and may run speculatively; `None` means the event is
//! not handled. `apply` works on a copy, so a caller either swaps in the whole
//! new state or keeps the old one.
//!
//! Handlers never assume a selection exists. Enter and Backspace only act on
//! a collapsed caret inside a checklist item.
//!
//! Handler priority for Enter is [`query_exit_list`] before
//! [`query_new_item`]; [`query_enter`] combines the two.

pub mod commands;
pub mod paste;

pub use commands::{
    apply, query_backspace, query_enter, query_exit_list, query_insert_checklist,
    query_new_item, ChecklistCommand,
};
pub use paste::{query_paste, reassign_ids, trim_trailing_empty_paragraphs, PreparedPaste};
