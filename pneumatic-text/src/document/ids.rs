//! Generation of checklist api names.

use std::collections::BTreeSet;
use uuid::Uuid;

/// Source of fresh checklist identifiers.
pub trait IdGenerator {
    fn next_list_id(&mut self) -> String;
    fn next_item_id(&mut self) -> String;

    /// A list id absent from `taken`.
    fn fresh_list_id(&mut self, taken: &BTreeSet<String>) -> String {
        loop {
            let id = self.next_list_id();
            if !taken.contains(&id) {
                return id;
            }
        }
    }

    /// An item id absent from `taken`.
    fn fresh_item_id(&mut self, taken: &BTreeSet<String>) -> String {
        loop {
            let id = self.next_item_id();
            if !taken.contains(&id) {
                return id;
            }
        }
    }
}

/// Random v4 uuids with a readable prefix, e.g. `clist-3f2a...`.
#[derive(Debug, Clone)]
pub struct UuidIdGenerator {
    pub list_prefix: String,
    pub item_prefix: String,
}

impl UuidIdGenerator {
    pub fn new(list_prefix: impl Into<String>, item_prefix: impl Into<String>) -> Self {
        Self {
            list_prefix: list_prefix.into(),
            item_prefix: item_prefix.into(),
        }
    }

    fn make(prefix: &str) -> String {
        let id = Uuid::new_v4().simple().to_string();
        if prefix.is_empty() {
            id
        } else {
            format!("{prefix}-{id}")
        }
    }
}

impl Default for UuidIdGenerator {
    fn default() -> Self {
        Self::new("clist", "citem")
    }
}

impl IdGenerator for UuidIdGenerator {
    fn next_list_id(&mut self) -> String {
        Self::make(&self.list_prefix)
    }

    fn next_item_id(&mut self) -> String {
        Self::make(&self.item_prefix)
    }
}

/// Deterministic counter-based ids (`list-1`, `item-1`, ...).
#[derive(Debug, Clone, Default)]
pub struct SequentialIdGenerator {
    lists: usize,
    items: usize,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_list_id(&mut self) -> String {
        self.lists += 1;
        format!("list-{}", self.lists)
    }

    fn next_item_id(&mut self) -> String {
        self.items += 1;
        format!("item-{}", self.items)
    }
}
