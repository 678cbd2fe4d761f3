//! Editing session
//!
//! [`RichEditor`] owns the live [`EditorState`] and routes key events and
//! commands to the checklist handlers first, falling back to the default
//! editing operations in [`crate::document::edit`]. Every mutation happens in
//! an update pass on a copy of the state that is swapped in whole, so a
//! reader never sees a half-applied edit. A pass that declines is discarded.
//!
//! [`EditorHandle`] is the imperative surface a host holds before and after
//! the editor is mounted.

use crate::checklist::{self, ChecklistCommand};
use crate::document::edit;
use crate::document::fragment::Fragment;
use crate::document::ids::{IdGenerator, UuidIdGenerator};
use crate::document::nodes::{Block, Document, Inline};
use crate::document::selection::{EditorState, Selection};
use crate::formats::markdown::{decode, encode, is_writable_variable_name, DecodeOptions};
use crate::inline::{resolve_variable, VariableCatalog};
use std::collections::VecDeque;

/// A key event the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    /// Typed text (a character or an IME commit).
    Text(String),
}

/// Toolbar commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    InsertChecklist,
}

/// A file picked through the toolbar attachment button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub size: u64,
}

/// The contents of one file-input change event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    pub files: Vec<SelectedFile>,
}

/// Host-supplied upload handler. The editor only decides when it runs; the
/// transport and its completion are the host's business.
pub trait AttachmentUploader {
    fn upload(&mut self, selection: FileSelection);
}

/// Work deferred until the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    Focus,
}

/// Queue drained by [`RichEditor::run_frame`] once the host has rendered.
#[derive(Debug, Default)]
pub struct FrameQueue {
    tasks: VecDeque<FrameTask>,
}

impl FrameQueue {
    pub fn schedule(&mut self, task: FrameTask) {
        if !self.tasks.contains(&task) {
            self.tasks.push_back(task);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn drain(&mut self) -> Vec<FrameTask> {
        self.tasks.drain(..).collect()
    }
}

type ChangeListener = Box<dyn FnMut(&str)>;

pub struct RichEditor {
    state: EditorState,
    catalog: VariableCatalog,
    ids: Box<dyn IdGenerator>,
    on_change: Option<ChangeListener>,
    uploader: Option<Box<dyn AttachmentUploader>>,
    frames: FrameQueue,
    focused: bool,
}

impl RichEditor {
    /// Open `markdown` for editing with the caret at the end of the document.
    /// Empty content opens as one empty paragraph.
    pub fn open(markdown: &str, options: &DecodeOptions) -> Self {
        let mut document = decode(markdown, options);
        if document.blocks.is_empty() {
            document.blocks.push(Block::empty_paragraph());
        }
        let caret = document
            .blocks
            .len()
            .checked_sub(1)
            .and_then(|last| crate::document::selection::end_of_block(&document, last));
        let mut state = EditorState::new(document);
        state.selection = caret.map(Selection::collapsed);
        let mut editor = Self::from_state(state);
        editor.catalog = options.template_variables.clone();
        editor
    }

    pub fn from_state(state: EditorState) -> Self {
        Self {
            state,
            catalog: VariableCatalog::new(),
            ids: Box::new(UuidIdGenerator::default()),
            on_change: None,
            uploader: None,
            frames: FrameQueue::default(),
            focused: false,
        }
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_catalog(mut self, catalog: VariableCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Called with the encoded markdown after every update that changed the
    /// document.
    pub fn on_change(mut self, listener: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn with_uploader(mut self, uploader: impl AttachmentUploader + 'static) -> Self {
        self.uploader = Some(Box::new(uploader));
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn pending_frames(&self) -> &FrameQueue {
        &self.frames
    }

    pub fn markdown(&self) -> String {
        encode(&self.state.document)
    }

    /// Read pass.
    pub fn read<R>(&self, f: impl FnOnce(&EditorState) -> R) -> R {
        f(&self.state)
    }

    /// Update pass. `f` edits a copy that replaces the live state only when
    /// `f` reports the edit as done; a declined edit leaves nothing behind.
    pub fn update(&mut self, f: impl FnOnce(&mut EditorState) -> bool) -> bool {
        let mut next = self.state.clone();
        if !f(&mut next) {
            return false;
        }
        self.commit(next);
        true
    }

    pub fn select(&mut self, selection: Option<Selection>) {
        self.state.selection = selection;
    }

    fn commit(&mut self, next: EditorState) {
        let changed = next.document != self.state.document;
        self.state = next;
        if changed {
            self.notify();
        }
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            let markdown = encode(&self.state.document);
            listener(&markdown);
        }
    }

    fn run_command(&mut self, command: ChecklistCommand) {
        let next = checklist::apply(&self.state, command, self.ids.as_mut());
        self.commit(next);
        self.frames.schedule(FrameTask::Focus);
    }

    /// Enter over a range inside a checklist item: the range is deleted and
    /// the checklist Enter runs on the caret it leaves, in one update.
    fn enter_over_range(&mut self) -> bool {
        let mut collapsed = self.state.clone();
        if !edit::delete_selection(&mut collapsed) {
            return false;
        }
        let Some(command) = checklist::query_enter(&collapsed) else {
            return false;
        };
        let next = checklist::apply(&collapsed, command, self.ids.as_mut());
        self.commit(next);
        self.frames.schedule(FrameTask::Focus);
        true
    }

    /// Route a key event. Returns whether anything handled it.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter => {
                if let Some(command) = self.read(checklist::query_enter) {
                    self.run_command(command);
                    return true;
                }
                self.enter_over_range() || self.update(edit::split_block)
            }
            Key::Backspace => {
                if let Some(command) = self.read(checklist::query_backspace) {
                    self.run_command(command);
                    return true;
                }
                self.update(edit::delete_backward)
            }
            Key::Text(text) => self.update(|state| edit::insert_text(state, &text)),
        }
    }

    pub fn dispatch(&mut self, command: EditorCommand) -> bool {
        match command {
            EditorCommand::InsertChecklist => {
                match self.read(checklist::query_insert_checklist) {
                    Some(command) => {
                        self.run_command(command);
                        true
                    }
                    None => {
                        tracing::debug!("insert checklist ignored without a selection");
                        false
                    }
                }
            }
        }
    }

    /// Paste through the checklist handler. `false` leaves the paste to the
    /// host's default handling.
    pub fn paste(&mut self, fragment: &Fragment) -> bool {
        match self.read(|state| checklist::query_paste(state, fragment)) {
            Some(command) => {
                self.run_command(command);
                true
            }
            None => false,
        }
    }

    /// Insert a variable token at the caret, resolving its display text from
    /// the catalog when the caller gives none. Names that could not be
    /// written back as `{{name}}` are refused.
    pub fn insert_variable(&mut self, api_name: &str, title: &str, subtitle: &str) -> bool {
        let api_name = api_name.trim();
        if !is_writable_variable_name(api_name) {
            tracing::debug!(api_name, "refusing variable that cannot be encoded");
            return false;
        }
        let mut token = resolve_variable(api_name, &self.catalog);
        if !title.is_empty() {
            token.title = title.to_string();
        }
        if !subtitle.is_empty() {
            token.subtitle = Some(subtitle.to_string());
        }
        self.update(|state| edit::insert_inline(state, Inline::Variable(token)))
    }

    pub fn request_focus(&mut self) {
        self.frames.schedule(FrameTask::Focus);
    }

    /// Run the work deferred to this frame.
    pub fn run_frame(&mut self) {
        for task in self.frames.drain() {
            match task {
                FrameTask::Focus => self.focused = true,
            }
        }
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn attachment_selected(&mut self, selection: FileSelection) {
        match self.uploader.as_mut() {
            Some(uploader) => uploader.upload(selection),
            None => tracing::warn!(
                files = selection.files.len(),
                "attachment selected but no uploader is configured"
            ),
        }
    }
}

/// What the host holds: empty until an editor is mounted.
#[derive(Default)]
pub struct EditorHandle {
    editor: Option<RichEditor>,
}

impl EditorHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, editor: RichEditor) {
        self.editor = Some(editor);
    }

    pub fn unmount(&mut self) -> Option<RichEditor> {
        self.editor.take()
    }

    pub fn get_editor(&self) -> Option<&RichEditor> {
        self.editor.as_ref()
    }

    pub fn get_editor_mut(&mut self) -> Option<&mut RichEditor> {
        self.editor.as_mut()
    }

    /// Focus on the next frame.
    pub fn focus(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.request_focus();
        }
    }

    /// Insert a variable. Silently ignored when any argument is blank, the
    /// name cannot be encoded or no editor is mounted.
    pub fn insert_variable(&mut self, api_name: &str, title: &str, subtitle: &str) -> bool {
        if [api_name, title, subtitle]
            .iter()
            .any(|value| value.trim().is_empty())
        {
            return false;
        }
        match self.editor.as_mut() {
            Some(editor) => editor.insert_variable(api_name, title, subtitle),
            None => false,
        }
    }

    pub fn on_attachment_selected(&mut self, selection: FileSelection) {
        if let Some(editor) = self.editor.as_mut() {
            editor.attachment_selected(selection);
        }
    }
}
