//! Editing session tests
//!
//! Drive a [`RichEditor`](pneumatic_text::RichEditor) through key events,
//! commands and pastes and check the persisted markdown. The clipboard tests
//! copy from the flat legacy content model.

mod checklist;
mod clipboard;
