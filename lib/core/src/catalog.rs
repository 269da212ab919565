//! Metric catalog
//!
//! Two static lookups loaded once at startup: metric name to description,
//! and category label to its ordered list of metrics. Name lookups are
//! case-insensitive through a lowercase-keyed table built at construction.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A recommendable metric and its description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub name: String,
    pub description: String,
}

/// Catalog document as stored on disk.
///
/// Category lists are kept as raw JSON values: the source spreadsheet has
/// empty cells that arrive as `null` or numbers, and those entries are
/// dropped rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub descriptions: Vec<MetricEntry>,
    #[serde(default)]
    pub categories: HashMap<String, Vec<Value>>,
}

#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    by_name: AHashMap<String, MetricEntry>,
    categories: AHashMap<String, Vec<Option<String>>>,
}

impl MetricCatalog {
    /// Build a catalog. When two entries share a name (ignoring case) the
    /// first one wins.
    pub fn new<D, C>(descriptions: D, categories: C) -> Self
    where
        D: IntoIterator<Item = MetricEntry>,
        C: IntoIterator<Item = (String, Vec<Option<String>>)>,
    {
        let mut by_name = AHashMap::new();
        for entry in descriptions {
            by_name.entry(entry.name.to_lowercase()).or_insert(entry);
        }

        Self {
            by_name,
            categories: categories.into_iter().collect(),
        }
    }

    pub fn from_document(doc: CatalogDocument) -> Self {
        let categories = doc.categories.into_iter().map(|(label, entries)| {
            let metrics: Vec<Option<String>> = entries
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            let dropped = metrics.iter().filter(|m| m.is_none()).count();
            if dropped > 0 {
                tracing::warn!("Category '{}' has {} non-text metric entries", label, dropped);
            }
            (label, metrics)
        });

        Self::new(doc.descriptions, categories)
    }

    /// Case-insensitive exact-name lookup
    pub fn lookup(&self, name: &str) -> Option<&MetricEntry> {
        self.by_name.get(&name.to_lowercase())
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|e| e.description.as_str())
    }

    /// Ordered metrics for a category label. Unknown labels yield an empty slice.
    pub fn metrics_for(&self, label: &str) -> &[Option<String>] {
        self.categories.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
