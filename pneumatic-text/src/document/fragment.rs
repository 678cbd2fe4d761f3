//! Detached document pieces: clipboard contents and paste payloads.
//!
//! A fragment may carry checklist items without their container (a copy
//! that started inside a list). Such orphans are re-wrapped before they
//! reach a document.

use super::nodes::{Block, ChecklistContainer, ChecklistItem};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub nodes: Vec<FragmentNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FragmentNode {
    Block { block: Block },
    OrphanItem { item: ChecklistItem },
}

impl Fragment {
    pub fn new(nodes: Vec<FragmentNode>) -> Self {
        Self { nodes }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            nodes: blocks
                .into_iter()
                .map(|block| FragmentNode::Block { block })
                .collect(),
        }
    }

    /// Convert to blocks, wrapping orphaned items in containers named after
    /// their own `list_api_name`. Consecutive orphans of one list share a
    /// container.
    pub fn into_blocks(self) -> Vec<Block> {
        let mut blocks: Vec<Block> = Vec::with_capacity(self.nodes.len());
        let mut last_was_orphan = false;

        for node in self.nodes {
            match node {
                FragmentNode::Block { block } => {
                    blocks.push(block);
                    last_was_orphan = false;
                }
                FragmentNode::OrphanItem { item } => {
                    if last_was_orphan {
                        if let Some(Block::Checklist(container)) = blocks.last_mut() {
                            if container.list_api_name == item.list_api_name {
                                container.items.push(item);
                                continue;
                            }
                        }
                    }
                    blocks.push(Block::Checklist(ChecklistContainer::new(
                        item.list_api_name.clone(),
                        vec![item],
                    )));
                    last_was_orphan = true;
                }
            }
        }
        blocks
    }
}
