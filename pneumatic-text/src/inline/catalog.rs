//! Template variable catalog supplied by the host application.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableCatalogEntry {
    #[serde(alias = "apiName")]
    pub api_name: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
}

impl VariableCatalogEntry {
    pub fn new(api_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            title: title.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

/// Lookup table keyed by exact `api_name`.
#[derive(Debug, Clone, Default)]
pub struct VariableCatalog {
    entries: HashMap<String, VariableCatalogEntry>,
}

impl VariableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, api_name: &str) -> Option<&VariableCatalogEntry> {
        self.entries.get(api_name)
    }

    pub fn insert(&mut self, entry: VariableCatalogEntry) {
        self.entries.insert(entry.api_name.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<VariableCatalogEntry> for VariableCatalog {
    fn from_iter<T: IntoIterator<Item = VariableCatalogEntry>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}

impl From<Vec<VariableCatalogEntry>> for VariableCatalog {
    fn from(entries: Vec<VariableCatalogEntry>) -> Self {
        entries.into_iter().collect()
    }
}
