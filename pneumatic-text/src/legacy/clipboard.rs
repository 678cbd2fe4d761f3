//! Copying a legacy selection to the clipboard.
//!
//! Plain text, HTML and a JSON snapshot of the selection are each computed on
//! their own. Any flavour that fails is left out, and when the sink rejects
//! the full payload a plain-text-only write is tried last. Nothing here
//! returns an error to the caller.

use super::content::{ContentBlock, LegacyDocument};
use super::selection::{
    expand_selection_to_entity_boundaries, get_selection_extended_for_safari, LegacyEditorState,
    PlatformQuirks,
};
use crate::error::EditorError;
use crate::formats::html::serialize_to_html;

/// What gets written on copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub text: String,
    pub html: Option<String>,
    pub json: Option<String>,
}

impl ClipboardPayload {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn is_plain(&self) -> bool {
        self.html.is_none() && self.json.is_none()
    }
}

pub trait ClipboardSink {
    fn write(&mut self, payload: &ClipboardPayload) -> Result<(), EditorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardOptions {
    pub write_html: bool,
    pub write_json: bool,
}

impl Default for ClipboardOptions {
    fn default() -> Self {
        Self {
            write_html: true,
            write_json: true,
        }
    }
}

/// The selected part of the document, with edges moved off any entity.
pub fn selected_fragment(state: &LegacyEditorState) -> LegacyDocument {
    let doc = &state.document;
    let (start_key, start, end_key, end) = state.selection.ordered(doc);
    let offsets = expand_selection_to_entity_boundaries(doc, start_key, end_key, start, end);

    let (Some(first), Some(last)) = (doc.block_index(start_key), doc.block_index(end_key)) else {
        return LegacyDocument::default();
    };
    let blocks: Vec<ContentBlock> = doc.blocks[first..=last]
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let from = if index == 0 { offsets.start } else { 0 };
            let to = if first + index == last {
                offsets.end
            } else {
                block.len()
            };
            block.slice(from, to)
        })
        .collect();

    let entity_map = blocks
        .iter()
        .flat_map(|block| &block.entity_ranges)
        .filter_map(|range| {
            doc.entity(&range.key)
                .map(|entity| (range.key.clone(), entity.clone()))
        })
        .collect();
    LegacyDocument { blocks, entity_map }
}

/// Build the payload for the current selection.
pub fn clipboard_payload(state: &LegacyEditorState, options: &ClipboardOptions) -> ClipboardPayload {
    let fragment = selected_fragment(state);
    let text = fragment.plain_text();

    let html = options
        .write_html
        .then(|| fragment.to_document().and_then(|doc| serialize_to_html(&doc)))
        .and_then(|result| {
            result
                .map_err(|error| tracing::warn!(%error, "html clipboard flavour dropped"))
                .ok()
        });
    let json = options
        .write_json
        .then(|| serde_json::to_string(&fragment).map_err(EditorError::from))
        .and_then(|result| {
            result
                .map_err(|error| tracing::warn!(%error, "json clipboard flavour dropped"))
                .ok()
        });

    ClipboardPayload { text, html, json }
}

/// Copy the selection into `sink` and return what was written, or `None` if
/// even the plain-text write failed.
pub fn copy_selection(
    state: &LegacyEditorState,
    sink: &mut dyn ClipboardSink,
    options: &ClipboardOptions,
) -> Option<ClipboardPayload> {
    let payload = clipboard_payload(state, options);
    match sink.write(&payload) {
        Ok(()) => return Some(payload),
        Err(error) if payload.is_plain() => {
            tracing::error!(%error, "clipboard write failed");
            return None;
        }
        Err(error) => tracing::warn!(%error, "rich clipboard write failed, retrying as plain text"),
    }

    let plain = ClipboardPayload::plain(payload.text);
    match sink.write(&plain) {
        Ok(()) => Some(plain),
        Err(error) => {
            tracing::error!(%error, "clipboard write failed");
            None
        }
    }
}

/// [`copy_selection`] from the selection the platform actually copies.
pub fn copy_selection_with(
    state: &LegacyEditorState,
    sink: &mut dyn ClipboardSink,
    options: &ClipboardOptions,
    quirks: &dyn PlatformQuirks,
) -> Option<ClipboardPayload> {
    let selection = get_selection_extended_for_safari(state, quirks);
    if selection == state.selection {
        return copy_selection(state, sink, options);
    }
    let extended = LegacyEditorState::new(state.document.clone(), selection);
    copy_selection(&extended, sink, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::content::{Entity, EntityKind};
    use crate::legacy::selection::{BrowserQuirks, LegacySelection};

    #[derive(Default)]
    struct MemorySink {
        reject_rich: bool,
        reject_all: bool,
        written: Vec<ClipboardPayload>,
    }

    impl ClipboardSink for MemorySink {
        fn write(&mut self, payload: &ClipboardPayload) -> Result<(), EditorError> {
            if self.reject_all || (self.reject_rich && !payload.is_plain()) {
                return Err(EditorError::Clipboard("denied".to_string()));
            }
            self.written.push(payload.clone());
            Ok(())
        }
    }

    fn state(selection: LegacySelection) -> LegacyEditorState {
        let doc = LegacyDocument::new(vec![
            ContentBlock::new("b1", "Hello xy").with_entity(6, 2, "0"),
            ContentBlock::new("b2", "second line"),
        ])
        .with_entity(
            "0",
            Entity::new(EntityKind::Variable)
                .with("apiName", "xy")
                .with("title", "xy"),
        );
        LegacyEditorState::new(doc, selection)
    }

    #[test]
    fn copy_expands_to_whole_entity() {
        let mut sink = MemorySink::default();
        let written = copy_selection(
            &state(LegacySelection::range("b1", 4, "b1", 7)),
            &mut sink,
            &ClipboardOptions::default(),
        )
        .unwrap();
        assert_eq!(written.text, "o xy");
        assert_eq!(
            written.html.as_deref(),
            Some(r#"<p>o <span class="variable" data-variable-api-name="xy">xy</span></p>"#)
        );
        assert!(written.json.unwrap().contains(r#""entityMap":{"0""#));
        assert_eq!(sink.written.len(), 1);
    }

    #[test]
    fn multi_block_selection_joins_with_newlines() {
        let payload = clipboard_payload(
            &state(LegacySelection::range("b2", 6, "b1", 7)),
            &ClipboardOptions {
                write_html: false,
                write_json: false,
            },
        );
        assert_eq!(payload, ClipboardPayload::plain("xy\nsecond"));
    }

    #[test]
    fn rejected_rich_write_falls_back_to_plain_text() {
        let mut sink = MemorySink {
            reject_rich: true,
            ..MemorySink::default()
        };
        let written = copy_selection(
            &state(LegacySelection::range("b1", 0, "b1", 5)),
            &mut sink,
            &ClipboardOptions::default(),
        );
        assert_eq!(written, Some(ClipboardPayload::plain("Hello")));
    }

    #[test]
    fn broken_entity_drops_only_the_html_flavour() {
        let mut state = state(LegacySelection::range("b1", 0, "b1", 8));
        state
            .document
            .entity_map
            .insert("0".to_string(), Entity::new(EntityKind::Link));
        let payload = clipboard_payload(&state, &ClipboardOptions::default());
        assert_eq!(payload.text, "Hello xy");
        assert_eq!(payload.html, None);
        assert!(payload.json.is_some());
    }

    #[test]
    fn failed_copy_never_panics() {
        let mut sink = MemorySink {
            reject_all: true,
            ..MemorySink::default()
        };
        let written = copy_selection(
            &state(LegacySelection::collapsed("b1", 0)),
            &mut sink,
            &ClipboardOptions::default(),
        );
        assert_eq!(written, None);
    }

    #[test]
    fn safari_copy_at_trailing_variable_takes_the_block() {
        let caret = state(LegacySelection::collapsed("b1", 8));
        let options = ClipboardOptions {
            write_html: false,
            write_json: false,
        };

        let mut sink = MemorySink::default();
        let safari = BrowserQuirks { safari: true };
        let written = copy_selection_with(&caret, &mut sink, &options, &safari);
        assert_eq!(written, Some(ClipboardPayload::plain("Hello xy")));

        let mut sink = MemorySink::default();
        let written = copy_selection_with(&caret, &mut sink, &options, &BrowserQuirks::default());
        assert_eq!(written, Some(ClipboardPayload::plain("")));
    }
}
