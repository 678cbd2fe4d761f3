//! Selections over [`LegacyDocument`] that never bisect an entity.

use super::content::{EntityKind, LegacyDocument};
use serde::{Deserialize, Serialize};

/// Start and end offsets after boundary expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOffsets {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySelection {
    pub anchor_key: String,
    pub anchor_offset: usize,
    pub focus_key: String,
    pub focus_offset: usize,
}

impl LegacySelection {
    pub fn collapsed(key: impl Into<String>, offset: usize) -> Self {
        let key = key.into();
        Self {
            anchor_key: key.clone(),
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
        }
    }

    pub fn range(
        anchor_key: impl Into<String>,
        anchor_offset: usize,
        focus_key: impl Into<String>,
        focus_offset: usize,
    ) -> Self {
        Self {
            anchor_key: anchor_key.into(),
            anchor_offset,
            focus_key: focus_key.into(),
            focus_offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    /// `(start_key, start_offset, end_key, end_offset)` in document order.
    pub fn ordered<'a>(&'a self, doc: &LegacyDocument) -> (&'a str, usize, &'a str, usize) {
        let anchor = doc.block_index(&self.anchor_key);
        let focus = doc.block_index(&self.focus_key);
        let backward = match (anchor, focus) {
            (Some(a), Some(f)) if a != f => f < a,
            _ => self.focus_offset < self.anchor_offset,
        };
        if backward {
            (&self.focus_key, self.focus_offset, &self.anchor_key, self.anchor_offset)
        } else {
            (&self.anchor_key, self.anchor_offset, &self.focus_key, self.focus_offset)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyEditorState {
    pub document: LegacyDocument,
    pub selection: LegacySelection,
}

impl LegacyEditorState {
    pub fn new(document: LegacyDocument, selection: LegacySelection) -> Self {
        Self {
            document,
            selection,
        }
    }
}

/// Widen `[start, end)` so that neither edge falls inside an entity. Unknown
/// block keys leave the matching edge where it is.
pub fn expand_selection_to_entity_boundaries(
    doc: &LegacyDocument,
    start_key: &str,
    end_key: &str,
    start: usize,
    end: usize,
) -> SelectionOffsets {
    let mut expanded = SelectionOffsets { start, end };

    if let Some(block) = doc.block(start_key) {
        if let Some(entity) = block.entity_at(start) {
            while expanded.start > 0 && block.entity_at(expanded.start - 1) == Some(entity) {
                expanded.start -= 1;
            }
        }
    }

    if let Some(block) = doc.block(end_key) {
        if let Some(entity) = end.checked_sub(1).and_then(|last| block.entity_at(last)) {
            let len = block.len();
            while expanded.end < len && block.entity_at(expanded.end) == Some(entity) {
                expanded.end += 1;
            }
        }
    }

    expanded
}

/// Platform capability checks consulted before applying selection workarounds.
pub trait PlatformQuirks {
    fn is_safari(&self) -> bool;

    /// Safari drops a trailing variable widget from a copy made with a bare
    /// caret at the end of its block.
    fn needs_selection_extension(&self, selection: &LegacySelection, doc: &LegacyDocument) -> bool {
        if !self.is_safari() || !selection.is_collapsed() {
            return false;
        }
        let Some(block) = doc.block(&selection.anchor_key) else {
            return false;
        };
        let len = block.len();
        if len == 0 || selection.anchor_offset != len {
            return false;
        }
        block
            .entity_at(len - 1)
            .and_then(|key| doc.entity(key))
            .is_some_and(|entity| entity.kind == EntityKind::Variable)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserQuirks {
    pub safari: bool,
}

impl BrowserQuirks {
    /// Detect from a user agent string. Chrome and Android browsers also
    /// advertise "Safari".
    pub fn from_user_agent(user_agent: &str) -> Self {
        let safari = user_agent.contains("Safari")
            && !["Chrome", "Chromium", "CriOS", "Android"]
                .iter()
                .any(|engine| user_agent.contains(engine));
        Self { safari }
    }
}

impl PlatformQuirks for BrowserQuirks {
    fn is_safari(&self) -> bool {
        self.safari
    }
}

pub fn get_selection_extended_for_safari(
    state: &LegacyEditorState,
    quirks: &dyn PlatformQuirks,
) -> LegacySelection {
    let selection = &state.selection;
    if !quirks.needs_selection_extension(selection, &state.document) {
        return selection.clone();
    }
    let len = state
        .document
        .block(&selection.anchor_key)
        .map_or(selection.anchor_offset, |block| block.len());
    tracing::debug!(block = %selection.anchor_key, "extending caret selection over the block");
    LegacySelection::range(selection.anchor_key.clone(), 0, selection.anchor_key.clone(), len)
}
