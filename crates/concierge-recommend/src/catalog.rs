use anyhow::{Context, Result};
use std::path::Path;

use concierge_core::types::CatalogItem;

/// Ordered, immutable set of recommendable items.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// The three built-in demo products.
    pub fn seeded() -> Self {
        Self::new(vec![
            CatalogItem::new(1, "Noise-cancelling headphones", "over-ear bluetooth travel ANC wireless"),
            CatalogItem::new(2, "Running shoes", "lightweight breathable daily trainer cushioned"),
            CatalogItem::new(3, "Mechanical keyboard", "tactile switches compact rgb quiet office"),
        ])
    }

    /// Load a JSON array of `{id, title, description}` records.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
        let items: Vec<CatalogItem> =
            serde_json::from_str(&raw).with_context(|| format!("parsing catalog {}", path.display()))?;
        Ok(Self::new(items))
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// One indexable text per item, in catalog order.
    pub fn corpus(&self) -> Vec<String> {
        self.items.iter().map(|it| format!("{} {}", it.title, it.description)).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}
