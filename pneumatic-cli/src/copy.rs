//! The `copy` subcommand: what a copy of a legacy comment snapshot would put
//! on the clipboard, printed as one JSON object.
//!
//!     {"text": "...", "html": "<p>..</p>", "json": "{\"blocks\":..}"}
//!
//! A flavour the clipboard options turn off, or one that failed to build, is
//! `null`.

use pneumatic_text::legacy::{
    copy_selection_with, BrowserQuirks, ClipboardOptions, ClipboardPayload, ClipboardSink,
    LegacyDocument, LegacyEditorState, LegacySelection,
};
use pneumatic_text::EditorError;
use serde_json::json;

/// A position written as `<block key>:<offset>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub key: String,
    pub offset: usize,
}

pub fn parse_position(raw: &str) -> Result<Position, String> {
    let (key, offset) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected <block key>:<offset>, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing block key in '{raw}'"));
    }
    let offset = offset
        .parse()
        .map_err(|_| format!("invalid offset '{offset}' in '{raw}'"))?;
    Ok(Position {
        key: key.to_string(),
        offset,
    })
}

/// The terminal has no clipboard; every write is accepted as is.
struct AcceptingSink;

impl ClipboardSink for AcceptingSink {
    fn write(&mut self, _payload: &ClipboardPayload) -> Result<(), EditorError> {
        Ok(())
    }
}

pub fn copy_payload(
    document: LegacyDocument,
    anchor: Position,
    focus: Option<Position>,
    options: &ClipboardOptions,
    quirks: &BrowserQuirks,
) -> Option<ClipboardPayload> {
    let selection = match focus {
        Some(focus) => {
            LegacySelection::range(anchor.key, anchor.offset, focus.key, focus.offset)
        }
        None => LegacySelection::collapsed(anchor.key, anchor.offset),
    };
    let state = LegacyEditorState::new(document, selection);
    copy_selection_with(&state, &mut AcceptingSink, options, quirks)
}

pub fn payload_to_json(payload: &ClipboardPayload) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json!({
        "text": payload.text,
        "html": payload.html,
        "json": payload.json,
    }))
}
