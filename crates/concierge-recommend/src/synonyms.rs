//! Domain synonym table for bridging vocabulary gaps between queries and the catalog.

use std::collections::HashMap;

use crate::normalize::normalize;

/// Built-in expansions, keyed by normalized token.
pub const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    ("headphone", &["headphones", "over-ear", "anc", "noise cancelling", "bluetooth", "wireless"]),
    ("headphones", &["headphone", "over-ear", "anc", "noise cancelling", "bluetooth", "wireless"]),
    ("earphone", &["earbuds", "in-ear"]),
    ("shoes", &["running", "trainer", "sneakers", "breathable", "lightweight"]),
    ("keyboard", &["mechanical", "tactile", "compact", "rgb", "quiet"]),
];

/// Token → ordered expansions. Expansions are applied one level deep only.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: HashMap<String, Vec<String>>,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in product-domain table.
    pub fn seeded() -> Self {
        DEFAULT_SYNONYMS
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    pub fn insert<I, S>(&mut self, token: &str, expansions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.insert(token.to_string(), expansions.into_iter().map(Into::into).collect());
    }

    pub fn get(&self, token: &str) -> Option<&[String]> {
        self.entries.get(token).map(Vec::as_slice)
    }

    /// Normalize `query`, then emit each token followed by its expansions.
    pub fn expand(&self, query: &str) -> String {
        let normalized = normalize(query);
        let mut expanded: Vec<&str> = Vec::new();
        for tok in normalized.split_whitespace() {
            expanded.push(tok);
            if let Some(extra) = self.entries.get(tok) {
                expanded.extend(extra.iter().map(String::as_str));
            }
        }
        expanded.join(" ")
    }
}

impl FromIterator<(String, Vec<String>)> for SynonymTable {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headphone_expands() {
        let expanded = SynonymTable::seeded().expand("headphone");
        assert!(expanded.starts_with("headphone headphones"));
        assert!(expanded.contains("anc"));
        assert!(expanded.contains("bluetooth"));
    }

    #[test]
    fn expansion_follows_token_order() {
        let expanded = SynonymTable::seeded().expand("Shoes for my keyboard");
        assert_eq!(
            expanded,
            "shoes running trainer sneakers breathable lightweight for my keyboard mechanical tactile compact rgb quiet"
        );
    }

    #[test]
    fn expansions_are_not_recursive() {
        let mut table = SynonymTable::new();
        table.insert("a1", ["b1"]);
        table.insert("b1", ["c1"]);
        assert_eq!(table.expand("a1"), "a1 b1");
    }

    #[test]
    fn empty_query_expands_to_empty() {
        assert_eq!(SynonymTable::seeded().expand("  \t "), "");
    }
}
