//! The older flat content model: blocks of plain text with entity ranges
//! pointing into a shared entity map.

use crate::document::nodes::{Block, Document, Inline, MentionToken, VariableToken};
use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub type EntityMap = BTreeMap<String, Entity>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDocument {
    pub blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub entity_map: EntityMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub entity_ranges: Vec<EntityRange>,
}

/// `length` chars starting at `offset` belong to entity `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: String,
}

impl EntityRange {
    /// Exclusive end offset, saturating.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Variable,
    Mention,
    Link,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Entity {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            data: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    fn required(&self, key: &str) -> Result<&str, EditorError> {
        self.str_field(key).ok_or_else(|| {
            EditorError::SerializationError(format!("{:?} entity is missing '{key}'", self.kind))
        })
    }
}

impl ContentBlock {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            entity_ranges: Vec::new(),
        }
    }

    pub fn with_entity(mut self, offset: usize, length: usize, key: impl Into<String>) -> Self {
        self.entity_ranges.push(EntityRange {
            offset,
            length,
            key: key.into(),
        });
        self
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Entity key covering the char at `offset`.
    pub fn entity_at(&self, offset: usize) -> Option<&str> {
        self.entity_ranges
            .iter()
            .find(|range| range.offset <= offset && offset < range.end())
            .map(|range| range.key.as_str())
    }

    /// The chars in `[start, end)` with entity ranges clipped to match.
    pub fn slice(&self, start: usize, end: usize) -> ContentBlock {
        let end = end.min(self.len());
        let start = start.min(end);
        let text = self.text.chars().skip(start).take(end - start).collect();
        let entity_ranges = self
            .entity_ranges
            .iter()
            .filter_map(|range| {
                let from = range.offset.max(start);
                let to = range.end().min(end);
                (from < to).then(|| EntityRange {
                    offset: from - start,
                    length: to - from,
                    key: range.key.clone(),
                })
            })
            .collect();
        ContentBlock {
            key: self.key.clone(),
            text,
            entity_ranges,
        }
    }
}

impl LegacyDocument {
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        Self {
            blocks,
            entity_map: EntityMap::new(),
        }
    }

    pub fn with_entity(mut self, key: impl Into<String>, entity: Entity) -> Self {
        self.entity_map.insert(key.into(), entity);
        self
    }

    pub fn block_index(&self, key: &str) -> Option<usize> {
        self.blocks.iter().position(|block| block.key == key)
    }

    pub fn block(&self, key: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|block| block.key == key)
    }

    pub fn entity(&self, key: &str) -> Option<&Entity> {
        self.entity_map.get(key)
    }

    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Convert to the rich document model, one paragraph per block. Variable
    /// and mention ranges become tokens; link ranges wrap their text.
    pub fn to_document(&self) -> Result<Document, EditorError> {
        let blocks = self
            .blocks
            .iter()
            .map(|block| self.block_to_paragraph(block))
            .collect::<Result<_, _>>()?;
        Ok(Document::new(blocks))
    }

    fn block_to_paragraph(&self, block: &ContentBlock) -> Result<Block, EditorError> {
        let chars: Vec<char> = block.text.chars().collect();
        let mut ranges: Vec<&EntityRange> = block.entity_ranges.iter().collect();
        ranges.sort_by_key(|range| range.offset);

        let mut content = Vec::new();
        let mut cursor = 0;
        for range in ranges {
            let start = range.offset.min(chars.len());
            let end = range.end().min(chars.len());
            if start < cursor || start >= end {
                continue;
            }
            if cursor < start {
                content.push(Inline::text(chars[cursor..start].iter().collect::<String>()));
            }
            let covered: String = chars[start..end].iter().collect();
            let entity = self.entity(&range.key).ok_or_else(|| {
                EditorError::SerializationError(format!("unknown entity '{}'", range.key))
            })?;
            content.push(entity_inline(entity, covered)?);
            cursor = end;
        }
        if cursor < chars.len() {
            content.push(Inline::text(chars[cursor..].iter().collect::<String>()));
        }
        Ok(Block::paragraph(content))
    }
}

fn entity_inline(entity: &Entity, covered: String) -> Result<Inline, EditorError> {
    match entity.kind {
        EntityKind::Variable => {
            let api_name = entity.required("apiName")?;
            let title = entity.str_field("title").unwrap_or(api_name);
            let mut token = VariableToken::new(api_name, title);
            token.subtitle = entity.str_field("subtitle").map(str::to_string);
            Ok(Inline::Variable(token))
        }
        EntityKind::Mention => {
            let id = match entity.data.get("id") {
                Some(Value::Number(number)) => number.as_i64(),
                Some(Value::String(text)) => text.parse().ok(),
                _ => None,
            }
            .ok_or_else(|| EditorError::SerializationError("mention id is not an integer".into()))?;
            let name = covered.trim_start_matches('@');
            let mut token = MentionToken::new(id, entity.str_field("name").unwrap_or(name));
            token.link = entity.str_field("link").map(str::to_string);
            Ok(Inline::Mention(token))
        }
        EntityKind::Link => Ok(Inline::Link {
            url: entity.required("url")?.to_string(),
            children: vec![Inline::text(covered)],
        }),
    }
}
