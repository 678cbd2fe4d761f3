//! Rich-text core for Pneumatic task descriptions and comments
//!
//!     This crate holds the document model behind the rich text editor, the markdown codec that
//!     persists it, the checklist editing rules and the inline token resolver. It also carries the
//!     selection and clipboard helpers of the older flat content model, which is still shipped.
//!
//!     This is a pure lib: nothing here reads the environment, touches stdio or assumes a shell.
//!     The pneumatic cli and the editor host call into it.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── document                # Document model, offsets, selections, default edits
//!     ├── inline                  # Variable / mention tokenization
//!     ├── checklist               # Enter / Backspace / insert / paste handlers
//!     ├── editor.rs               # Editing session and host handle
//!     ├── legacy                  # Flat content model selection + clipboard
//!     ├── formats
//!     │   ├── markdown            # decode / encode, the persisted format
//!     │   ├── html                # export, clipboard flavour
//!     │   └── json                # structural snapshot
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     └── <area>
//!         ├── mod.rs
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Data Flow
//!
//!     text from the API -> decode -> Document -> edits (checklist handlers, token insertion,
//!     default editing) -> encode -> text back to the API.
//!
//!     encode runs on every change event, so it never fails: an internal error is logged and
//!     reduced to an empty string. decode never fails either: malformed markers stay literal text.
//!
//! The Wire Format
//!
//!     Standard markdown (headings, quotes, lists, emphasis, links, code) plus three custom
//!     constructs:
//!
//!     - `[clist:<list>|<item>]content[/clist]`, one line group per checklist item
//!     - `{{api_name}}`, a template variable
//!     - `[name|id]`, a user mention with an integer id
//!
//!     Standard constructs are parsed by comrak. The checklist construct is a line-level
//!     transformer that runs before it, see ./formats/markdown/transformers.rs.
//!
//! Editing Model
//!
//!     Every structural edit is a read-only query followed by an apply step on a copy of the
//!     state (see ./checklist/mod.rs). The editor swaps the new state in whole, so a read never
//!     observes a partial edit.
//!
pub mod checklist;
pub mod document;
pub mod editor;
pub mod error;
pub mod format;
pub mod formats;
pub mod inline;
pub mod legacy;
pub mod registry;

pub use document::{Document, EditorState, Fragment};
pub use editor::{EditorHandle, RichEditor};
pub use error::EditorError;
pub use format::Format;
pub use formats::markdown::{decode, encode, DecodeOptions};
pub use inline::{parse_inline_tokens, VariableCatalog, VariableCatalogEntry};
pub use registry::FormatRegistry;
