//! The in-memory rich-text tree.
//!
//! Blocks hold inline content; checklists group items under a shared
//! `list_api_name`; variables and mentions are atomic inline leaves. Nothing
//! here is persisted directly, only its markdown serialization.

pub mod edit;
pub mod fragment;
pub mod ids;
pub mod inline;
pub mod nodes;
pub mod selection;

pub use fragment::{Fragment, FragmentNode};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use nodes::{
    Block, ChecklistContainer, ChecklistItem, CodeBlock, Document, Heading, Inline, List,
    ListItem, MentionToken, Paragraph, Quote, VariableToken,
};
pub use selection::{BlockPath, EditorState, Point, Selection};
