//! Selection and clipboard support for the older flat content model
//!
//!     Comments and the plain-text renderer still store content as blocks of
//!     text with entity ranges (see [`content`]). Variables and mentions are
//!     atomic there too, so a copied selection is first widened until neither
//!     edge falls inside an entity ([`selection`]), then written to the
//!     clipboard in three flavours ([`clipboard`]).
//!
//!     The Safari caret workaround lives behind [`PlatformQuirks`] so it can be
//!     exercised with a fake platform.

pub mod clipboard;
pub mod content;
pub mod selection;

pub use clipboard::{
    clipboard_payload, copy_selection, copy_selection_with, selected_fragment, ClipboardOptions,
    ClipboardPayload, ClipboardSink,
};
pub use content::{ContentBlock, Entity, EntityKind, EntityMap, EntityRange, LegacyDocument};
pub use selection::{
    expand_selection_to_entity_boundaries, get_selection_extended_for_safari, BrowserQuirks,
    LegacyEditorState, LegacySelection, PlatformQuirks, SelectionOffsets,
};
