//! Line-level block transformers that run before CommonMark parsing.
//!
//! Standard constructs are delegated to comrak. Constructs comrak knows
//! nothing about (checklists) are claimed here, line by line, and the lines
//! they do not claim are handed to comrak in between.

use crate::document::nodes::{Block, ChecklistContainer, ChecklistItem, Document};
use crate::inline::VariableCatalog;
use once_cell::sync::Lazy;
use regex::Regex;

/// `[clist:<list>|<item>]` anywhere in a line.
pub static CHECKLIST_START_ANYWHERE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[clist:([^|\[\]\s\\]+)\|([^|\[\]\s\\]+)\]").unwrap());
/// `[clist:<list>|<item>]` at the start of a line (leading blanks allowed).
pub static CHECKLIST_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\[clist:([^|\[\]\s\\]+)\|([^|\[\]\s\\]+)\]").unwrap());
pub const CHECKLIST_END: &str = "[/clist]";

/// What a transformer produced for the lines it consumed.
#[derive(Debug, Clone, PartialEq)]
pub enum Imported {
    Block(Block),
    ChecklistItem(ChecklistItem),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockImport {
    pub imported: Imported,
    /// Index of the first line not consumed.
    pub next_line: usize,
    /// Text left on the last consumed line after the end marker.
    pub remainder: Option<String>,
}

pub struct ImportContext<'a> {
    pub catalog: &'a VariableCatalog,
}

/// A multi-line construct recognised by start and end markers.
pub trait BlockTransformer: Send + Sync {
    fn name(&self) -> &str;

    /// Try to consume a block beginning at `lines[index]`. Returning `None`
    /// leaves the lines as literal markdown.
    fn import(
        &self,
        lines: &[String],
        index: usize,
        ctx: &ImportContext<'_>,
    ) -> Option<BlockImport>;
}

/// `[clist:list|item]content[/clist]`, content possibly spanning lines.
pub struct ChecklistTransformer;

impl BlockTransformer for ChecklistTransformer {
    fn name(&self) -> &str {
        "checklist"
    }

    fn import(
        &self,
        lines: &[String],
        index: usize,
        ctx: &ImportContext<'_>,
    ) -> Option<BlockImport> {
        let first = lines.get(index)?;
        let captures = CHECKLIST_START.captures(first)?;
        let start = captures.get(0)?;
        let list_api_name = captures.get(1)?.as_str().to_string();
        let item_api_name = captures.get(2)?.as_str().to_string();

        let mut interior: Vec<&str> = Vec::new();
        let mut line_index = index;
        let mut rest = &first[start.end()..];

        loop {
            if let Some(end) = rest.find(CHECKLIST_END) {
                interior.push(&rest[..end]);
                let after = rest[end + CHECKLIST_END.len()..].to_string();
                let content =
                    super::parser::parse_inline_markdown(&interior.join("\n"), ctx.catalog);
                return Some(BlockImport {
                    imported: Imported::ChecklistItem(ChecklistItem::new(
                        list_api_name,
                        item_api_name,
                        content,
                    )),
                    next_line: line_index + 1,
                    remainder: (!after.trim().is_empty()).then_some(after),
                });
            }
            interior.push(rest);
            line_index += 1;
            let next = lines.get(line_index)?;
            // Another item opening first means this one was never closed.
            if CHECKLIST_START.is_match(next) {
                return None;
            }
            rest = next.as_str();
        }
    }
}

static DEFAULT_BLOCK_TRANSFORMERS: [&dyn BlockTransformer; 1] = [&ChecklistTransformer];

pub fn default_block_transformers() -> &'static [&'static dyn BlockTransformer] {
    &DEFAULT_BLOCK_TRANSFORMERS
}

/// Append `item` to the trailing container when the list names match,
/// otherwise open a new container at the end of the document.
///
/// Items of one list are assumed to be contiguous in the source. If two
/// lists interleave, the second run of a list becomes a separate container
/// that carries the same `list_api_name`.
pub fn append_checklist_item(document: &mut Document, item: ChecklistItem) {
    if let Some(Block::Checklist(container)) = document.blocks.last_mut() {
        if container.list_api_name == item.list_api_name {
            container.items.push(item);
            return;
        }
    }
    let list_api_name = item.list_api_name.clone();
    document
        .blocks
        .push(Block::Checklist(ChecklistContainer::new(list_api_name, vec![item])));
}
